use crate::*;
use crate::slot::Slot;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }
}

/// Records every call so tests can assert on what the pager asked for.
#[derive(Clone, Debug, Default)]
struct PageAdapter {
    widths: Vec<f32>,
    next_view: u32,
    token: u32,
    instantiated: Vec<usize>,
    destroyed: Vec<usize>,
    primary: Vec<usize>,
    batches: usize,
    unfocusable: Vec<usize>,
}

impl PageAdapter {
    fn uniform(count: usize) -> Self {
        Self::with_widths(vec![1.0; count])
    }

    fn with_widths(widths: Vec<f32>) -> Self {
        Self {
            widths,
            ..Self::default()
        }
    }
}

impl PagerAdapter for PageAdapter {
    type View = u32;
    type Item = (usize, u32);
    type State = u32;

    fn count(&self) -> usize {
        self.widths.len()
    }

    fn page_width(&self, position: usize) -> f32 {
        self.widths[position]
    }

    fn instantiate_item(&mut self, container: &mut Container<u32>, position: usize) -> (usize, u32) {
        assert!(position < self.widths.len(), "instantiate out of range: {position}");
        self.next_view += 1;
        let view = self.next_view;
        if self.unfocusable.contains(&position) {
            container.add_unfocusable_view(view);
        } else {
            container.add_view(view);
        }
        self.instantiated.push(position);
        (position, view)
    }

    fn destroy_item(&mut self, container: &mut Container<u32>, position: usize, item: (usize, u32)) {
        assert_eq!(position, item.0);
        container.remove_view(&item.1);
        self.destroyed.push(position);
    }

    fn is_view_from_item(&self, view: &u32, item: &(usize, u32)) -> bool {
        *view == item.1
    }

    fn start_update(&mut self, _container: &mut Container<u32>) {
        self.batches += 1;
    }

    fn set_primary_item(
        &mut self,
        _container: &mut Container<u32>,
        position: usize,
        _item: Option<&(usize, u32)>,
    ) {
        self.primary.push(position);
    }

    fn save_state(&self) -> Option<u32> {
        Some(self.token)
    }

    fn restore_state(&mut self, state: u32) {
        self.token = state;
    }
}

fn laid_out(adapter: PageAdapter, options: PagerOptions) -> ViewPager<PageAdapter> {
    let mut pager = ViewPager::new(options);
    pager.attach_to_window();
    pager.set_size(100, 0, 0);
    pager.set_adapter(adapter);
    pager.layout();
    pager
}

fn adapter(pager: &ViewPager<PageAdapter>) -> &PageAdapter {
    pager.adapter().unwrap()
}

fn positions(pager: &ViewPager<PageAdapter>) -> Vec<usize> {
    pager.items().map(|ii| ii.position).collect()
}

fn settle(pager: &mut ViewPager<PageAdapter>, now_ms: &mut u64) {
    *now_ms += 1_000;
    pager.tick(*now_ms);
    assert_eq!(pager.scroll_state(), ScrollState::Idle);
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn assert_window_consistent(pager: &ViewPager<PageAdapter>) {
    let items: Vec<PageLayout> = pager.items().collect();
    for w in items.windows(2) {
        assert!(w[0].position < w[1].position, "positions not ascending: {items:?}");
        assert!(w[0].offset < w[1].offset, "offsets not ascending: {items:?}");
    }
    assert_eq!(pager.container().child_count(), items.len());
}

#[test]
fn loop_adapter_maps_virtual_positions_to_real_ones() {
    let mut wrapper = LoopAdapter::new(PageAdapter::uniform(5));
    let mut container = Container::new();
    assert_eq!(wrapper.count(), VIRTUAL_COUNT);
    assert_eq!(wrapper.real_count(), 5);
    assert_eq!(wrapper.to_real(12), Some(2));

    let item = wrapper.instantiate_item(&mut container, 12);
    assert_eq!(item.map(|i| i.0), Some(2));
    assert_eq!(wrapper.get_ref().instantiated, vec![2]);
    assert_eq!(container.child_count(), 1);

    wrapper.destroy_item(&mut container, 12, item);
    assert_eq!(wrapper.get_ref().destroyed, vec![2]);
    assert_eq!(container.child_count(), 0);
}

#[test]
fn loop_adapter_with_empty_delegate_never_calls_it() {
    let mut wrapper = LoopAdapter::new(PageAdapter::uniform(0));
    let mut container = Container::new();
    assert_eq!(wrapper.to_real(7), None);
    assert_eq!(wrapper.page_width(7), 1.0);

    let item = wrapper.instantiate_item(&mut container, 7);
    assert!(item.is_none());
    wrapper.destroy_item(&mut container, 7, item);
    wrapper.set_primary_item(&mut container, 7, None);

    let inner = wrapper.into_inner();
    assert!(inner.instantiated.is_empty());
    assert!(inner.destroyed.is_empty());
    assert!(inner.primary.is_empty());
}

#[test]
fn loop_adapter_delegates_identity_and_state_without_translation() {
    let mut wrapper = LoopAdapter::new(PageAdapter::uniform(3));
    let mut container = Container::new();
    let item = wrapper.instantiate_item(&mut container, 4);
    let view = item.unwrap().1;
    assert!(wrapper.is_view_from_item(&view, &item));
    assert!(!wrapper.is_view_from_item(&(view + 1), &item));
    assert!(!wrapper.is_view_from_item(&view, &None));

    wrapper.restore_state(9);
    assert_eq!(wrapper.save_state(), Some(9));
}

#[test]
fn centered_positions_are_congruent_and_near_the_middle() {
    for real in 1..=9usize {
        let wrapper = LoopAdapter::new(PageAdapter::uniform(real));
        for logical in 0..real {
            let v = wrapper.centered(logical);
            assert_eq!(v % real, logical);
            assert!(v.abs_diff(VIRTUAL_COUNT / 2) < real);
        }
        // Not a real index: passed through as a raw virtual position.
        assert_eq!(wrapper.centered(real + 1), real + 1);
    }
}

#[test]
fn current_item_roundtrips_through_the_virtual_bias() {
    for real in 1..=7usize {
        let mut pager = laid_out(PageAdapter::uniform(real), PagerOptions::new());
        for logical in 0..real {
            pager.set_current_item_smooth(logical, false);
            assert_eq!(pager.current_item(), logical, "real={real}");
            assert!(pager.virtual_current_item() >= real);
        }
    }
}

#[test]
fn three_pages_wrap_forward_by_modulo() {
    let mut pager = laid_out(PageAdapter::uniform(3), PagerOptions::new());
    assert!(pager.is_loop_scroll());
    assert_eq!(pager.current_item(), 0);

    pager.set_current_item(2);
    assert_eq!(pager.current_item(), 2);
    let before = pager.virtual_current_item();

    let mut now = 0;
    settle(&mut pager, &mut now);
    assert!(pager.page_right());
    assert_eq!(pager.current_item(), 0);
    assert_eq!(pager.virtual_current_item(), before + 1);
    settle(&mut pager, &mut now);

    // Only real indexes ever reach the adapter.
    assert!(adapter(&pager).instantiated.iter().all(|&p| p < 3));
    assert_window_consistent(&pager);
}

#[test]
fn empty_adapter_is_tolerated() {
    let mut pager = laid_out(PageAdapter::uniform(0), PagerOptions::new());
    assert_eq!(pager.current_item(), 0);
    assert_eq!(pager.item_count(), 0);

    pager.set_current_item(0);
    pager.populate();
    pager.page_right();
    assert_eq!(pager.current_item(), 0);
    assert!(adapter(&pager).instantiated.is_empty());
    assert_eq!(pager.container().child_count(), 0);
}

#[test]
fn disabling_loop_reinstalls_the_raw_adapter_at_index_zero() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.set_current_item_smooth(3, false);
    assert_eq!(pager.current_item(), 3);

    pager.set_loop_scroll(false);
    assert!(!pager.is_loop_scroll());
    assert_eq!(pager.current_item(), 0);
    assert_eq!(pager.virtual_current_item(), 0);
    assert_eq!(pager.page_count(), 5);
    assert_eq!(positions(&pager), vec![0, 1]);

    // Nothing from the looping window survives the swap.
    let a = adapter(&pager);
    assert_eq!(a.instantiated.len() - a.destroyed.len(), 2);
    assert_window_consistent(&pager);

    pager.set_loop_scroll(true);
    assert_eq!(pager.current_item(), 0);
    assert_eq!(pager.page_count(), VIRTUAL_COUNT);
    assert_eq!(
        pager.virtual_current_item(),
        LoopAdapter::new(PageAdapter::uniform(5)).centered(0)
    );
}

#[test]
fn direct_mode_stops_at_both_ends() {
    let mut pager = laid_out(
        PageAdapter::uniform(3),
        PagerOptions::new().with_loop_scroll(false),
    );
    assert!(!pager.page_left());
    assert_eq!(pager.first_offset(), 0.0);

    pager.set_current_item_smooth(2, false);
    assert_eq!(pager.current_item(), 2);
    assert!(!pager.page_right());
    assert!(approx(pager.last_offset(), 2.0));
}

#[test]
fn populate_twice_is_idempotent() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let instantiated = adapter(&pager).instantiated.len();
    let destroyed = adapter(&pager).destroyed.len();

    pager.populate();
    pager.populate();
    assert_eq!(adapter(&pager).instantiated.len(), instantiated);
    assert_eq!(adapter(&pager).destroyed.len(), destroyed);
}

#[test]
fn window_never_exceeds_twice_the_limit_plus_one() {
    let limit = 2;
    let mut pager = laid_out(
        PageAdapter::uniform(5),
        PagerOptions::new().with_offscreen_page_limit(limit),
    );
    assert_eq!(pager.item_count(), 2 * limit + 1);

    let mut now = 0;
    for _ in 0..12 {
        assert!(pager.page_right());
        settle(&mut pager, &mut now);
        let cur = pager.virtual_current_item();
        assert_eq!(positions(&pager), (cur - limit..=cur + limit).collect::<Vec<_>>());
    }
    for _ in 0..4 {
        assert!(pager.page_left());
        settle(&mut pager, &mut now);
        assert!(pager.item_count() <= 2 * limit + 1);
    }
    assert_window_consistent(&pager);
}

#[test]
fn offsets_carry_over_when_stepping_one_page() {
    let mut pager = laid_out(
        PageAdapter::uniform(4),
        PagerOptions::new().with_page_margin(10),
    );
    let cur = pager.virtual_current_item();
    let old = pager.info_for_position(cur).unwrap();

    pager.page_right();
    let new = pager.info_for_position(cur + 1).unwrap();
    assert!(approx(new.offset, old.offset + old.width_factor + 0.1));
    assert_window_consistent(&pager);

    pager.page_left();
    let back = pager.info_for_position(cur).unwrap();
    assert!(approx(back.offset, old.offset));
}

#[test]
fn offsets_follow_uneven_page_widths() {
    let mut pager = laid_out(
        PageAdapter::with_widths(vec![1.0, 0.5, 0.8]),
        PagerOptions::new(),
    );
    assert_window_consistent(&pager);
    let items: Vec<PageLayout> = pager.items().collect();
    for w in items.windows(2) {
        assert!(approx(w[1].offset, w[0].offset + w[0].width_factor));
    }

    let mut now = 0;
    for _ in 0..5 {
        pager.page_right();
        settle(&mut pager, &mut now);
        assert_window_consistent(&pager);
    }
}

#[test]
fn page_margin_changes_apply_at_next_layout() {
    let mut pager = laid_out(PageAdapter::uniform(4), PagerOptions::new());
    let cur = pager.virtual_current_item();
    pager.set_page_margin(20);
    assert!(pager.needs_layout());
    pager.layout();

    let next = pager.info_for_position(cur + 1).unwrap();
    let here = pager.info_for_position(cur).unwrap();
    assert!(approx(next.offset - here.offset, 1.2));
}

#[test]
#[should_panic(expected = "notify_data_set_changed")]
fn changing_the_adapter_without_notifying_is_fatal() {
    let mut pager = laid_out(PageAdapter::uniform(3), PagerOptions::new().with_id(7));
    pager.adapter_mut().unwrap().widths.push(1.0);
    pager.populate();
}

#[test]
fn notify_data_set_changed_keeps_the_logical_index() {
    let mut pager = laid_out(PageAdapter::uniform(3), PagerOptions::new());
    pager.set_current_item_smooth(2, false);

    pager.adapter_mut().unwrap().widths.push(1.0);
    pager.notify_data_set_changed();
    pager.layout();
    assert_eq!(pager.current_item(), 2);
    assert_window_consistent(&pager);

    pager.adapter_mut().unwrap().widths.truncate(1);
    pager.notify_data_set_changed();
    pager.layout();
    assert_eq!(pager.current_item(), 0);
    assert_window_consistent(&pager);
}

#[test]
fn nothing_is_materialized_before_attach() {
    let mut pager = ViewPager::new(PagerOptions::new());
    pager.set_size(100, 0, 0);
    pager.set_adapter(PageAdapter::uniform(3));
    pager.layout();
    assert_eq!(pager.item_count(), 0);
    assert!(adapter(&pager).instantiated.is_empty());

    pager.attach_to_window();
    pager.layout();
    assert_eq!(pager.item_count(), 3);
    assert_eq!(pager.current_item(), 0);
}

#[test]
fn primary_item_is_announced_with_a_real_index() {
    let mut pager = laid_out(PageAdapter::uniform(4), PagerOptions::new());
    pager.set_current_item_smooth(3, false);
    assert_eq!(adapter(&pager).primary.last(), Some(&3));
    assert!(adapter(&pager).batches > 0);
}

#[test]
fn release_defers_population_until_the_settle_completes() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let cur = pager.virtual_current_item();
    let instantiated = adapter(&pager).instantiated.len();

    assert!(pager.begin_drag());
    assert_eq!(pager.scroll_state(), ScrollState::Dragging);
    pager.drag_by(70.0);
    assert!(approx(pager.scroll_x(), 70.0));
    pager.end_drag(0.0);

    assert_eq!(pager.scroll_state(), ScrollState::Settling);
    assert!(pager.populate_pending());
    assert_eq!(pager.virtual_current_item(), cur + 1);
    assert_eq!(pager.current_item(), 1);
    assert_eq!(adapter(&pager).instantiated.len(), instantiated);

    let mut now = 0;
    settle(&mut pager, &mut now);
    assert!(!pager.populate_pending());
    assert!(approx(pager.scroll_x(), 100.0));
    assert_eq!(positions(&pager), vec![cur, cur + 1, cur + 2]);
    assert_window_consistent(&pager);
}

#[test]
fn short_drag_snaps_back() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let cur = pager.virtual_current_item();
    pager.begin_drag();
    pager.drag_by(20.0);
    pager.end_drag(0.0);
    let mut now = 0;
    settle(&mut pager, &mut now);
    assert_eq!(pager.virtual_current_item(), cur);
    assert!(approx(pager.scroll_x(), 0.0));
}

#[test]
fn fling_moves_to_the_neighbouring_page() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let cur = pager.virtual_current_item();
    pager.begin_drag();
    pager.drag_by(30.0);
    pager.end_drag(1_000.0);
    assert_eq!(pager.virtual_current_item(), cur + 1);

    let mut now = 0;
    settle(&mut pager, &mut now);
    pager.begin_drag();
    pager.drag_by(-30.0);
    pager.end_drag(-1_000.0);
    assert_eq!(pager.virtual_current_item(), cur);
}

#[test]
fn drag_is_clamped_to_the_materialized_window() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.begin_drag();
    pager.drag_by(1_000.0);
    assert!(approx(pager.scroll_x(), 100.0));
    pager.drag_by(-5_000.0);
    assert!(approx(pager.scroll_x(), -100.0));
}

#[test]
fn far_jump_keeps_visible_pages_until_the_settle_ends() {
    let mut pager = laid_out(PageAdapter::uniform(9), PagerOptions::new());
    let start = pager.virtual_current_item();
    pager.set_current_item(5);

    assert_eq!(pager.scroll_state(), ScrollState::Settling);
    assert!(pager.items().any(|ii| ii.position == start && ii.scrolling));

    let mut now = 0;
    settle(&mut pager, &mut now);
    let cur = pager.virtual_current_item();
    assert!(pager.items().all(|ii| !ii.scrolling));
    assert_eq!(positions(&pager), vec![cur - 1, cur, cur + 1]);
    assert_window_consistent(&pager);
}

#[test]
fn focus_moves_to_the_new_current_page() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let cur = pager.virtual_current_item();
    let child = (0..pager.container().child_count())
        .find(|&i| pager.info_for_child(i).map(|ii| ii.position) == Some(cur))
        .unwrap();
    assert!(
        pager
            .container_mut()
            .request_child_focus(child, FocusDirection::Forward)
    );

    pager.set_current_item_smooth(1, false);
    let focused = pager.container().focused_child().unwrap();
    assert_eq!(pager.info_for_child(focused).unwrap().position, cur + 1);
    assert_eq!(
        pager.container().last_focus_direction(),
        Some(FocusDirection::Right)
    );
}

#[test]
fn focus_stays_put_when_the_new_page_cannot_take_it() {
    let mut adapter = PageAdapter::uniform(5);
    adapter.unfocusable = vec![1];
    let mut pager = laid_out(adapter, PagerOptions::new());
    let cur = pager.virtual_current_item();
    let child = (0..pager.container().child_count())
        .find(|&i| pager.info_for_child(i).map(|ii| ii.position) == Some(cur))
        .unwrap();
    assert!(
        pager
            .container_mut()
            .request_child_focus(child, FocusDirection::Forward)
    );

    pager.set_current_item_smooth(1, false);
    assert!(pager.container().has_focus());
    let focused = pager.container().focused_child().unwrap();
    assert_eq!(pager.info_for_child(focused).unwrap().position, cur);
    assert_eq!(
        pager.container().last_focus_direction(),
        Some(FocusDirection::Forward)
    );

    pager.container_mut().clear_focus();
    assert!(!pager.container().has_focus());
}

#[test]
fn container_focus_skips_decor_and_unfocusable_children() {
    let mut container = Container::new();
    container.add_decor_view(0u32);
    container.add_view(1);
    container.add_unfocusable_view(2);

    assert!(!container.request_child_focus(0, FocusDirection::Forward));
    assert!(!container.request_child_focus(2, FocusDirection::Forward));
    assert!(!container.request_child_focus(7, FocusDirection::Forward));
    assert!(!container.has_focus());

    assert!(container.request_child_focus(1, FocusDirection::Left));
    assert!(container.has_focus());
    assert_eq!(container.last_focus_direction(), Some(FocusDirection::Left));

    // Removing an earlier child shifts the focused index with it.
    assert_eq!(container.remove_view(&0), Some(0));
    assert_eq!(container.focused_child(), Some(0));
    assert_eq!(container.remove_view(&1), Some(1));
    assert!(!container.has_focus());
    assert!(container.contains(&2));
    assert!(!container.contains(&1));
    assert_eq!(container.remove_view(&1), None);
}

#[test]
fn drawing_order_sorts_decor_first_then_by_position() {
    let mut pager: ViewPager<PageAdapter> =
        ViewPager::new(PagerOptions::new().with_drawing_order(DrawingOrder::Forward));
    pager.container_mut().add_decor_view(999);
    pager.attach_to_window();
    pager.set_size(100, 0, 0);
    pager.set_adapter(PageAdapter::uniform(5));
    pager.layout();

    let order: Vec<usize> = (0..4).map(|i| pager.child_drawing_order(i)).collect();
    let children = pager.container().children();
    assert_eq!(children[order[0]].view, 999);
    let drawn: Vec<usize> = order[1..]
        .iter()
        .map(|&i| children[i].params.position)
        .collect();
    assert!(drawn.windows(2).all(|w| w[0] < w[1]));

    pager.set_drawing_order(DrawingOrder::Reverse);
    assert_eq!(pager.child_drawing_order(3), order[0]);
    assert_eq!(pager.child_drawing_order(0), order[3]);

    pager.set_drawing_order(DrawingOrder::Default);
    assert_eq!(pager.child_drawing_order(2), 2);
}

#[test]
fn layout_params_are_filled_in_for_new_children() {
    let pager = laid_out(PageAdapter::with_widths(vec![1.0, 0.5]), PagerOptions::new());
    for (i, child) in pager.container().children().iter().enumerate() {
        assert_eq!(child.params.child_index, i);
        let ii = pager.info_for_child(i).unwrap();
        assert_eq!(child.params.position, ii.position);
        assert_eq!(child.params.width_factor, ii.width_factor);
    }
}

#[test]
fn saved_state_restores_the_exact_virtual_page() {
    let mut pager = laid_out(PageAdapter::uniform(6), PagerOptions::new());
    pager.set_current_item_smooth(4, false);
    pager.adapter_mut().unwrap().token = 42;
    let state = pager.save_state();
    assert_eq!(state.adapter_state, Some(42));

    let mut restored = ViewPager::new(PagerOptions::new());
    restored.restore_state(state.clone());
    restored.attach_to_window();
    restored.set_size(100, 0, 0);
    restored.set_adapter(PageAdapter::uniform(6));
    restored.layout();

    assert_eq!(restored.virtual_current_item(), state.position);
    assert_eq!(restored.current_item(), 4);
    assert_eq!(adapter(&restored).token, 42);
}

#[test]
fn restoring_state_on_a_live_pager_applies_immediately() {
    let mut source = laid_out(PageAdapter::uniform(6), PagerOptions::new());
    source.set_current_item_smooth(4, false);
    source.adapter_mut().unwrap().token = 42;
    let state = source.save_state();

    let mut pager = laid_out(PageAdapter::uniform(6), PagerOptions::new());
    pager.restore_state(state.clone());

    assert_eq!(pager.virtual_current_item(), state.position);
    assert_eq!(pager.current_item(), 4);
    assert_eq!(adapter(&pager).token, 42);
    assert_eq!(pager.scroll_state(), ScrollState::Idle);
    let cur = state.position;
    assert_eq!(positions(&pager), vec![cur - 1, cur, cur + 1]);
    assert_window_consistent(&pager);
}

#[test]
fn raw_virtual_jump_far_from_the_middle_stays_local() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.set_current_item_smooth(7, false);

    assert_eq!(pager.virtual_current_item(), 7);
    assert_eq!(pager.current_item(), 2);
    assert_eq!(positions(&pager), vec![6, 7, 8]);
    let cur = pager.info_for_position(7).unwrap();
    assert!(approx(pager.scroll_x(), 100.0 * cur.offset));
    assert_window_consistent(&pager);

    pager.page_right();
    let mut now = 0;
    settle(&mut pager, &mut now);
    assert_eq!(pager.current_item(), 3);
    assert_eq!(positions(&pager), vec![7, 8, 9]);
}

#[test]
fn state_saved_without_looping_restores_as_a_raw_position() {
    let mut source = laid_out(
        PageAdapter::uniform(6),
        PagerOptions::new().with_loop_scroll(false),
    );
    source.set_current_item_smooth(3, false);
    let state = source.save_state();
    assert_eq!(state.position, 3);

    let mut pager = laid_out(PageAdapter::uniform(6), PagerOptions::new());
    pager.restore_state(state);
    assert_eq!(pager.virtual_current_item(), 3);
    assert_eq!(pager.current_item(), 3);
    assert_eq!(positions(&pager), vec![2, 3, 4]);
    assert_window_consistent(&pager);
}

#[test]
fn looping_span_width_is_computed_per_cycle() {
    let slot = Slot::new(PageAdapter::with_widths(vec![1.0, 0.5, 0.25]), true);
    let cycle = 1.1 + 0.6 + 0.35;
    let far = slot.span_width(1, 1 + 3 * 100_000 + 2, 0.1);
    assert!((far - (100_000.0 * cycle + 0.6 + 0.35)).abs() < 1.0);
    assert!(approx(slot.span_width(4, 6, 0.0), 0.75));
    assert_eq!(slot.span_width(6, 6, 0.1), 0.0);

    let direct = Slot::new(PageAdapter::with_widths(vec![1.0, 0.5, 0.25]), false);
    assert!(approx(direct.span_width(0, 3, 0.0), 1.75));
}

#[test]
fn detaching_finishes_the_settle_at_its_destination() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    let cur = pager.virtual_current_item();
    pager.page_right();
    assert_eq!(pager.scroll_state(), ScrollState::Settling);
    pager.tick(10);
    let target = 100.0 * pager.info_for_position(cur + 1).unwrap().offset;
    assert!(!approx(pager.scroll_x(), target));

    pager.detach_from_window();
    assert!(!pager.is_attached());
    assert_eq!(pager.scroll_state(), ScrollState::Idle);
    assert!(approx(pager.scroll_x(), target));
    assert_eq!(pager.tick(2_000), None);
}

#[test]
fn callbacks_report_logical_pages_and_scroll_states() {
    let selected = Arc::new(AtomicUsize::new(usize::MAX));
    let states = Arc::new(Mutex::new(Vec::new()));
    let options = PagerOptions::new()
        .with_on_page_selected(Some({
            let selected = Arc::clone(&selected);
            move |i| selected.store(i, Ordering::SeqCst)
        }))
        .with_on_scroll_state_changed(Some({
            let states = Arc::clone(&states);
            move |s| states.lock().unwrap().push(s)
        }));
    let mut pager = laid_out(PageAdapter::uniform(4), options);

    pager.set_current_item(3);
    assert_eq!(selected.load(Ordering::SeqCst), 3);
    let mut now = 0;
    settle(&mut pager, &mut now);
    pager.page_right();
    assert_eq!(selected.load(Ordering::SeqCst), 0);
    settle(&mut pager, &mut now);

    assert_eq!(
        *states.lock().unwrap(),
        vec![
            ScrollState::Settling,
            ScrollState::Idle,
            ScrollState::Settling,
            ScrollState::Idle
        ]
    );
}

#[test]
fn replacing_the_adapter_destroys_every_page_of_the_old_one() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.page_right();
    let old = pager.take_adapter().unwrap();
    assert_eq!(old.instantiated.len(), old.destroyed.len());
    assert_eq!(pager.item_count(), 0);
    assert_eq!(pager.container().child_count(), 0);
    assert_eq!(pager.scroll_state(), ScrollState::Idle);

    pager.set_adapter(PageAdapter::uniform(2));
    pager.layout();
    assert_eq!(pager.current_item(), 0);
    assert_window_consistent(&pager);
}

#[test]
fn resizing_keeps_the_current_page_in_view() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.set_current_item_smooth(1, false);
    let offset = pager
        .info_for_position(pager.virtual_current_item())
        .unwrap()
        .offset;
    pager.set_size(300, 0, 0);
    pager.layout();
    assert!(approx(pager.scroll_x(), 300.0 * offset));
}

#[test]
fn options_can_be_updated_in_place() {
    let mut pager = laid_out(PageAdapter::uniform(5), PagerOptions::new());
    pager.update_options(|o| {
        o.offscreen_page_limit = 2;
        o.loop_scroll = false;
    });
    assert!(!pager.is_loop_scroll());
    assert_eq!(pager.offscreen_page_limit(), 2);
    assert_eq!(positions(&pager), vec![0, 1, 2]);

    pager.set_offscreen_page_limit(0);
    assert_eq!(pager.offscreen_page_limit(), DEFAULT_OFFSCREEN_PAGES);
}

#[test]
fn randomized_paging_keeps_the_window_consistent() {
    let mut rng = Lcg::new(0x5eed);
    for real in [1usize, 2, 3, 5, 8] {
        let mut pager = laid_out(PageAdapter::uniform(real), PagerOptions::new());
        let mut now = 0;
        for _ in 0..200 {
            match rng.gen_range_u64(0, 4) {
                0 => {
                    pager.page_left();
                }
                1 => {
                    pager.page_right();
                }
                2 => {
                    pager.begin_drag();
                    pager.drag_by(rng.gen_range_f32(-150.0, 150.0));
                    pager.end_drag(rng.gen_range_f32(-2_000.0, 2_000.0));
                }
                _ => {
                    let logical = rng.gen_range_u64(0, real as u64) as usize;
                    pager.set_current_item(logical);
                }
            }
            settle(&mut pager, &mut now);

            let cur = pager.virtual_current_item();
            assert_eq!(pager.current_item(), cur % real);
            assert!(pager.items().all(|ii| !ii.scrolling));
            assert!(pager.item_count() <= 3, "real={real} items={:?}", positions(&pager));
            assert!(pager.info_for_position(cur).is_some());
            assert!(adapter(&pager).instantiated.iter().all(|&p| p < real));
            assert_window_consistent(&pager);
        }
    }
}
