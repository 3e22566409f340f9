use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::settle::Settle;
use crate::slot::Slot;
use crate::{
    Container, DEFAULT_OFFSCREEN_PAGES, DrawingOrder, FocusDirection, ItemInfo, MAX_SETTLE_DURATION_MS,
    PageLayout, PagerAdapter, PagerOptions, PagerState, ScrollState,
};

/// Settle duration per page travelled, before the cap.
const SETTLE_MS_PER_PAGE: f32 = 100.0;

/// A headless, optionally looping pager.
///
/// The pager owns the container the adapter adds views to, the installed adapter, and the ordered
/// window of materialized pages around the current position. It holds no UI objects; the host
/// drives it:
/// - `attach_to_window` / `set_size` / `layout` when the host view is attached and measured
/// - `begin_drag` / `drag_by` / `end_drag` for touch input
/// - `tick(now_ms)` every frame while [`ViewPager::scroll_state`] is `Settling`
///
/// With loop scrolling on (the default), the adapter is wrapped in a [`crate::LoopAdapter`] and the
/// pager works in virtual positions centered in a huge range; callers only ever see logical
/// indexes through [`ViewPager::current_item`] and [`ViewPager::set_current_item`].
pub struct ViewPager<A: PagerAdapter> {
    options: PagerOptions,
    container: Container<A::View>,
    adapter: Option<Slot<A>>,
    items: Vec<ItemInfo<Option<A::Item>>>,

    cur_item: usize,
    restored: Option<PagerState<A::State>>,
    populate_pending: bool,
    expected_adapter_count: usize,
    expected_real_count: usize,

    first_offset: f32,
    last_offset: f32,
    need_calculate_page_offsets: bool,
    drawing_ordered_children: Vec<usize>,

    first_layout: bool,
    layout_requested: bool,
    attached: bool,
    width: u32,
    padding_left: u32,
    padding_right: u32,

    scroll_x: f32,
    scroll_state: ScrollState,
    settle: Option<Settle>,
    drag_start_x: f32,
    now_ms: u64,
}

impl<A: PagerAdapter> ViewPager<A> {
    pub fn new(options: PagerOptions) -> Self {
        pdebug!(
            loop_scroll = options.loop_scroll,
            offscreen_page_limit = options.offscreen_page_limit,
            "ViewPager::new"
        );
        Self {
            options,
            container: Container::new(),
            adapter: None,
            items: Vec::new(),
            cur_item: 0,
            restored: None,
            populate_pending: false,
            expected_adapter_count: 0,
            expected_real_count: 0,
            first_offset: f32::MIN,
            last_offset: f32::MAX,
            need_calculate_page_offsets: false,
            drawing_ordered_children: Vec::new(),
            first_layout: true,
            layout_requested: false,
            attached: false,
            width: 0,
            padding_left: 0,
            padding_right: 0,
            scroll_x: 0.0,
            scroll_state: ScrollState::Idle,
            settle: None,
            drag_start_x: 0.0,
            now_ms: 0,
        }
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    /// Applies new options. Switching `loop_scroll` reinstalls the adapter.
    pub fn set_options(&mut self, options: PagerOptions) {
        let loop_scroll = options.loop_scroll;
        let limit = options.offscreen_page_limit.max(DEFAULT_OFFSCREEN_PAGES);
        let margin = options.page_margin;
        let drawing_order = options.drawing_order;
        self.options = PagerOptions {
            loop_scroll: self.options.loop_scroll,
            offscreen_page_limit: self.options.offscreen_page_limit,
            page_margin: self.options.page_margin,
            drawing_order: self.options.drawing_order,
            ..options
        };
        self.set_loop_scroll(loop_scroll);
        self.set_page_margin(margin);
        self.set_drawing_order(drawing_order);
        self.set_offscreen_page_limit(limit);
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut PagerOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_page_selected(
        &mut self,
        on_page_selected: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) {
        self.options.on_page_selected = on_page_selected.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_scroll_state_changed(
        &mut self,
        on_scroll_state_changed: Option<impl Fn(ScrollState) + Send + Sync + 'static>,
    ) {
        self.options.on_scroll_state_changed = on_scroll_state_changed.map(|f| Arc::new(f) as _);
    }

    /// Installs a new adapter, destroying every page of the previous one.
    ///
    /// When looping, the current position jumps to logical index 0 in the middle of the virtual
    /// range. Pending saved state (see [`ViewPager::restore_state`]) is applied instead, if any.
    pub fn set_adapter(&mut self, adapter: A) {
        self.take_adapter();
        self.install(adapter);
    }

    /// Removes the adapter after destroying every page it produced.
    pub fn take_adapter(&mut self) -> Option<A> {
        self.abort_settle();
        self.set_scroll_state(ScrollState::Idle);
        self.populate_pending = false;

        let mut slot = self.adapter.take()?;
        slot.start_update(&mut self.container);
        for ii in self.items.drain(..) {
            slot.destroy_item(&mut self.container, ii.position, ii.item);
        }
        slot.finish_update(&mut self.container);
        self.container.remove_page_views();
        self.drawing_ordered_children.clear();
        self.cur_item = 0;
        self.scroll_x = 0.0;
        Some(slot.into_inner())
    }

    fn install(&mut self, adapter: A) {
        let was_first_layout = self.first_layout;
        let slot = Slot::new(adapter, self.options.loop_scroll);
        pdebug!(
            looping = matches!(slot, Slot::Looping(_)),
            real_count = slot.real_count(),
            adapter = slot.type_name(),
            "install adapter"
        );
        self.expected_adapter_count = slot.count();
        self.expected_real_count = slot.real_count();
        self.first_layout = true;
        self.adapter = Some(slot);

        if let Some(state) = self.restored.take() {
            if let (Some(slot), Some(adapter_state)) = (self.adapter.as_mut(), state.adapter_state)
            {
                slot.restore_state(adapter_state);
            }
            self.set_current_item_internal(state.position, false, true, 0.0);
            return;
        }

        if let Some(slot) = &self.adapter {
            self.cur_item = slot.centered(0);
        }
        if was_first_layout {
            self.request_layout();
        } else {
            self.populate();
        }
    }

    /// The caller's adapter, never the loop wrapper.
    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref().map(Slot::get_ref)
    }

    pub fn adapter_mut(&mut self) -> Option<&mut A> {
        self.adapter.as_mut().map(Slot::get_mut)
    }

    /// Number of positions the pager pages through: the virtual count when looping.
    pub fn page_count(&self) -> usize {
        self.adapter.as_ref().map_or(0, Slot::count)
    }

    pub fn is_loop_scroll(&self) -> bool {
        self.options.loop_scroll
    }

    /// Turns looping on or off. An installed adapter is reinstalled (wrapped or unwrapped) and the
    /// pager returns to logical index 0.
    pub fn set_loop_scroll(&mut self, loop_scroll: bool) {
        if self.options.loop_scroll == loop_scroll {
            return;
        }
        pdebug!(loop_scroll, "set_loop_scroll");
        self.options.loop_scroll = loop_scroll;
        if let Some(adapter) = self.take_adapter() {
            self.install(adapter);
        }
    }

    /// Call after the adapter's content changed. Every page is rebuilt; the logical index is kept
    /// when still valid and clamped otherwise.
    pub fn notify_data_set_changed(&mut self) {
        let Some(mut slot) = self.adapter.take() else {
            return;
        };
        let old_logical = match &slot {
            Slot::Looping(_) if self.expected_real_count > 0 => {
                self.cur_item % self.expected_real_count
            }
            Slot::Looping(_) => 0,
            Slot::Direct(_) => self.cur_item,
        };

        self.expected_adapter_count = slot.count();
        self.expected_real_count = slot.real_count();
        pdebug!(
            count = self.expected_adapter_count,
            real_count = self.expected_real_count,
            "notify_data_set_changed"
        );

        slot.start_update(&mut self.container);
        for ii in self.items.drain(..) {
            slot.destroy_item(&mut self.container, ii.position, ii.item);
        }
        slot.finish_update(&mut self.container);

        let logical = old_logical.min(self.expected_real_count.saturating_sub(1));
        let target = slot.centered(logical);
        self.adapter = Some(slot);

        self.sort_child_drawing_order();
        if self.page_count() == 0 {
            self.cur_item = 0;
        }
        self.set_current_item_internal(target, false, true, 0.0);
        self.request_layout();
    }

    /// The logical (real-adapter) index of the current page.
    ///
    /// Reads as 0 for an empty looping adapter.
    pub fn current_item(&self) -> usize {
        match &self.adapter {
            Some(slot) => slot.logical(self.cur_item),
            None => self.cur_item,
        }
    }

    /// The raw position the pager works in (virtual when looping).
    pub fn virtual_current_item(&self) -> usize {
        self.cur_item
    }

    /// Selects a page, smoothly when the pager has already been laid out.
    pub fn set_current_item(&mut self, item: usize) {
        let smooth = !self.first_layout;
        self.set_current_item_smooth(item, smooth);
    }

    /// Selects a page.
    ///
    /// When looping, an index below the real count is biased to the matching virtual position
    /// near the middle of the range; larger values are taken as raw virtual positions.
    pub fn set_current_item_smooth(&mut self, item: usize, smooth: bool) {
        self.populate_pending = false;
        let target = match &self.adapter {
            Some(slot) => slot.centered(item),
            None => item,
        };
        self.set_current_item_internal(target, smooth, false, 0.0);
    }

    /// Smoothly pages one position back. Returns `false` at the first page.
    pub fn page_left(&mut self) -> bool {
        if self.adapter.is_none() || self.cur_item == 0 {
            return false;
        }
        self.populate_pending = false;
        self.set_current_item_internal(self.cur_item - 1, true, false, 0.0);
        true
    }

    /// Smoothly pages one position forward. Returns `false` at the last page.
    pub fn page_right(&mut self) -> bool {
        if self.cur_item.saturating_add(1) >= self.page_count() {
            return false;
        }
        self.populate_pending = false;
        self.set_current_item_internal(self.cur_item + 1, true, false, 0.0);
        true
    }

    fn set_current_item_internal(&mut self, item: usize, smooth: bool, always: bool, velocity: f32) {
        let count = self.page_count();
        if count == 0 {
            return;
        }
        if !always && self.cur_item == item && !self.items.is_empty() {
            return;
        }

        let item = item.min(count - 1);
        let limit = self.options.offscreen_page_limit;
        if item > self.cur_item.saturating_add(limit) || item.saturating_add(limit) < self.cur_item {
            // Everything on screen now may still be visible during the jump.
            for ii in &mut self.items {
                ii.scrolling = true;
            }
        }
        let dispatch_selected = self.cur_item != item;
        ptrace!(item, smooth, always, dispatch_selected, "set_current_item_internal");

        if self.first_layout {
            self.cur_item = item;
            if dispatch_selected {
                self.dispatch_page_selected(item);
            }
            self.request_layout();
        } else {
            self.populate_to(item);
            self.scroll_to_item(item, smooth, velocity, dispatch_selected);
        }
    }

    fn dispatch_page_selected(&self, position: usize) {
        let logical = match &self.adapter {
            Some(slot) => slot.logical(position),
            None => position,
        };
        if let Some(cb) = &self.options.on_page_selected {
            cb(logical);
        }
    }

    pub fn offscreen_page_limit(&self) -> usize {
        self.options.offscreen_page_limit
    }

    /// Pages kept on each side of the current one. Values below 1 are raised to 1.
    pub fn set_offscreen_page_limit(&mut self, limit: usize) {
        let limit = limit.max(DEFAULT_OFFSCREEN_PAGES);
        if self.options.offscreen_page_limit == limit {
            return;
        }
        self.options.offscreen_page_limit = limit;
        self.populate();
    }

    pub fn page_margin(&self) -> u32 {
        self.options.page_margin
    }

    /// Sets the gap between pages in pixels. Offsets are recomputed at the next layout.
    pub fn set_page_margin(&mut self, margin: u32) {
        if self.options.page_margin == margin {
            return;
        }
        self.options.page_margin = margin;
        self.need_calculate_page_offsets = true;
        self.request_layout();
    }

    pub fn drawing_order(&self) -> DrawingOrder {
        self.options.drawing_order
    }

    pub fn set_drawing_order(&mut self, drawing_order: DrawingOrder) {
        if self.options.drawing_order == drawing_order {
            return;
        }
        self.options.drawing_order = drawing_order;
        self.populate();
    }

    /// Maps a draw pass index to the container child to draw at that step.
    pub fn child_drawing_order(&self, i: usize) -> usize {
        let child_count = self.container.child_count();
        let index = match self.options.drawing_order {
            DrawingOrder::Default => return i,
            DrawingOrder::Forward => i,
            DrawingOrder::Reverse => child_count.saturating_sub(1).saturating_sub(i),
        };
        self.drawing_ordered_children
            .get(index)
            .copied()
            .unwrap_or(index)
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach_to_window(&mut self) {
        self.attached = true;
        self.first_layout = true;
        self.request_layout();
    }

    /// Detaching finishes any settle animation at its destination.
    pub fn detach_from_window(&mut self) {
        self.attached = false;
        self.complete_scroll();
        self.set_scroll_state(ScrollState::Idle);
    }

    /// Updates the measured width and horizontal padding, in pixels.
    pub fn set_size(&mut self, width: u32, padding_left: u32, padding_right: u32) {
        if self.width == width
            && self.padding_left == padding_left
            && self.padding_right == padding_right
        {
            return;
        }
        let old_client_width = self.client_width();
        self.width = width;
        self.padding_left = padding_left;
        self.padding_right = padding_right;
        if self.client_width() != old_client_width {
            self.recompute_scroll_position(old_client_width);
        }
        self.request_layout();
    }

    pub fn client_width(&self) -> u32 {
        self.width
            .saturating_sub(self.padding_left)
            .saturating_sub(self.padding_right)
    }

    pub fn needs_layout(&self) -> bool {
        self.layout_requested
    }

    fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    /// Runs a measure + layout pass: populates the window, applies pending offset
    /// recomputation and, on the first layout, jumps to the current page.
    pub fn layout(&mut self) {
        self.layout_requested = false;
        self.populate();

        if self.need_calculate_page_offsets {
            let cur = self.cur_item;
            let recalculated = self.with_slot(|this, slot| {
                let Some(cur_index) = this.items.iter().position(|ii| ii.position == cur) else {
                    return false;
                };
                this.calculate_page_offsets(slot, cur_index, None);
                true
            });
            if recalculated == Some(true) && self.settle.is_none() {
                self.scroll_x = self.dest_x_for(cur);
            }
        }

        if self.first_layout {
            self.scroll_to_item(self.cur_item, false, 0.0, false);
        }
        self.first_layout = false;
    }

    fn recompute_scroll_position(&mut self, old_client_width: u32) {
        if old_client_width == 0 || self.items.is_empty() {
            return;
        }
        self.abort_settle();
        if self.scroll_state == ScrollState::Settling {
            self.complete_scroll();
        }
        self.scroll_x = self.dest_x_for(self.cur_item);
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    fn set_scroll_state(&mut self, state: ScrollState) {
        if self.scroll_state == state {
            return;
        }
        ptrace!(?state, "scroll state");
        self.scroll_state = state;
        if let Some(cb) = &self.options.on_scroll_state_changed {
            cb(state);
        }
    }

    fn margin_offset(&self) -> f32 {
        let width = self.client_width();
        if width > 0 {
            self.options.page_margin as f32 / width as f32
        } else {
            0.0
        }
    }

    /// Scroll position that shows `position`, clamped by the first/last offsets.
    fn dest_x_for(&self, position: usize) -> f32 {
        let Some(ii) = self.items.iter().find(|ii| ii.position == position) else {
            return 0.0;
        };
        let offset = ii.offset.min(self.last_offset).max(self.first_offset);
        self.client_width() as f32 * offset
    }

    fn scroll_to_item(&mut self, item: usize, smooth: bool, velocity: f32, dispatch_selected: bool) {
        let dest_x = self.dest_x_for(item);
        if smooth {
            self.smooth_scroll_to(dest_x, velocity);
            if dispatch_selected {
                self.dispatch_page_selected(item);
            }
        } else {
            if dispatch_selected {
                self.dispatch_page_selected(item);
            }
            self.complete_scroll();
            self.scroll_x = dest_x;
        }
    }

    fn smooth_scroll_to(&mut self, x: f32, velocity: f32) {
        let dx = x - self.scroll_x;
        if abs(dx) < 0.5 {
            self.abort_settle();
            self.complete_scroll();
            self.populate();
            self.set_scroll_state(ScrollState::Idle);
            return;
        }

        let width = self.client_width() as f32;
        let duration = if abs(velocity) > 0.0 {
            4.0 * 1000.0 * abs(dx / velocity)
        } else {
            let page_width = width * self.page_width_at(self.cur_item);
            let page_delta = abs(dx) / (page_width + self.options.page_margin as f32).max(1.0);
            (page_delta + 1.0) * SETTLE_MS_PER_PAGE
        };
        let duration_ms = (duration as u64).min(MAX_SETTLE_DURATION_MS);

        self.set_scroll_state(ScrollState::Settling);
        self.settle = Some(Settle::new(
            self.scroll_x,
            x,
            self.now_ms,
            duration_ms,
            self.options.settle_easing,
        ));
    }

    fn page_width_at(&self, position: usize) -> f32 {
        self.adapter
            .as_ref()
            .map_or(1.0, |slot| slot.page_width(position))
    }

    /// Advances an in-flight settle animation.
    ///
    /// Returns the new scroll position while settling, `None` otherwise. When the animation ends
    /// the window is rebuilt around the final page.
    pub fn tick(&mut self, now_ms: u64) -> Option<f32> {
        self.now_ms = now_ms;
        let settle = self.settle?;
        self.scroll_x = settle.sample(now_ms);
        if settle.is_done(now_ms) {
            self.complete_scroll();
        }
        Some(self.scroll_x)
    }

    fn abort_settle(&mut self) {
        if let Some(settle) = self.settle.take() {
            self.scroll_x = settle.to;
        }
    }

    fn complete_scroll(&mut self) {
        let was_settling = self.scroll_state == ScrollState::Settling;
        self.abort_settle();
        self.populate_pending = false;

        let mut need_populate = was_settling;
        for ii in &mut self.items {
            if ii.scrolling {
                need_populate = true;
                ii.scrolling = false;
            }
        }
        if need_populate {
            self.populate();
        }
        if was_settling {
            self.set_scroll_state(ScrollState::Idle);
        }
    }

    /// Starts a drag gesture. Grabbing a settling pager stops it where it is.
    pub fn begin_drag(&mut self) -> bool {
        if self.adapter.is_none() {
            return false;
        }
        if self.scroll_state == ScrollState::Settling {
            self.settle = None;
            self.populate_pending = false;
            self.populate();
        }
        self.drag_start_x = self.scroll_x;
        self.set_scroll_state(ScrollState::Dragging);
        true
    }

    /// Moves the content by `dx` pixels; positive values reveal later pages.
    ///
    /// The scroll position never leaves the materialized window.
    pub fn drag_by(&mut self, dx: f32) {
        if self.scroll_state != ScrollState::Dragging {
            return;
        }
        let (Some(first), Some(last)) = (self.items.first(), self.items.last()) else {
            return;
        };
        let count = self.page_count();
        let width = self.client_width() as f32;
        let left = if first.position == 0 {
            self.first_offset
        } else {
            first.offset
        };
        let right = if last.position + 1 == count {
            self.last_offset
        } else {
            last.offset
        };
        self.scroll_x = (self.scroll_x + dx).min(width * right).max(width * left);
    }

    /// Ends a drag. `velocity` is in pixels per second, positive toward later pages.
    ///
    /// The pager picks a target page (the neighbour on a fling, otherwise whichever page covers
    /// most of the viewport), then settles on it. The window is not rebuilt until the settle
    /// completes.
    pub fn end_drag(&mut self, velocity: f32) {
        if self.scroll_state != ScrollState::Dragging {
            return;
        }
        let Some(ii) = self.info_for_current_scroll_position() else {
            self.set_scroll_state(ScrollState::Idle);
            return;
        };
        let width = self.client_width() as f32;
        let page_offset = if width > 0.0 {
            (self.scroll_x / width - ii.offset) / (ii.width_factor + self.margin_offset())
        } else {
            0.0
        };
        let total_delta = self.scroll_x - self.drag_start_x;
        let target = self.determine_target_page(ii.position, page_offset, velocity, total_delta);
        pdebug!(current_page = ii.position, target, velocity, "end_drag");

        self.populate_pending = true;
        self.set_current_item_internal(target, true, true, velocity);
        if self.scroll_state == ScrollState::Dragging {
            self.set_scroll_state(ScrollState::Idle);
        }
    }

    fn determine_target_page(
        &self,
        current_page: usize,
        page_offset: f32,
        velocity: f32,
        delta_x: f32,
    ) -> usize {
        let target = if abs(delta_x) > self.options.fling_distance
            && abs(velocity) > self.options.min_fling_velocity
        {
            if velocity > 0.0 {
                current_page + 1
            } else {
                current_page
            }
        } else {
            let truncator = if current_page >= self.cur_item { 0.4 } else { 0.6 };
            current_page + (page_offset + truncator) as usize
        };

        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => target.min(last.position).max(first.position),
            _ => target,
        }
    }

    /// The page under the left edge of the viewport, including pages not materialized yet
    /// (their layout is derived from the adapter's page width).
    pub fn info_for_current_scroll_position(&self) -> Option<PageLayout> {
        let width = self.client_width();
        let scroll_offset = if width > 0 {
            self.scroll_x / width as f32
        } else {
            0.0
        };
        let margin_offset = self.margin_offset();

        let mut last: Option<PageLayout> = None;
        let mut i = 0;
        while i < self.items.len() {
            let mut ii = self.items[i].layout();
            if let Some(prev) = last {
                if ii.position != prev.position + 1 {
                    let position = prev.position + 1;
                    ii = PageLayout {
                        position,
                        offset: prev.offset + prev.width_factor + margin_offset,
                        width_factor: self.page_width_at(position),
                        scrolling: false,
                    };
                } else {
                    i += 1;
                }
            } else {
                i += 1;
            }

            let left_bound = ii.offset;
            let right_bound = ii.offset + ii.width_factor + margin_offset;
            if last.is_none() || scroll_offset >= left_bound {
                if scroll_offset < right_bound || i == self.items.len() {
                    return Some(ii);
                }
            } else {
                return last;
            }
            last = Some(ii);
        }
        last
    }

    /// Layout snapshots of the materialized pages, ascending by position.
    pub fn items(&self) -> impl Iterator<Item = PageLayout> + '_ {
        self.items.iter().map(ItemInfo::layout)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn info_for_position(&self, position: usize) -> Option<PageLayout> {
        self.items
            .iter()
            .find(|ii| ii.position == position)
            .map(ItemInfo::layout)
    }

    /// The page a container child belongs to.
    pub fn info_for_child(&self, child: usize) -> Option<PageLayout> {
        let slot = self.adapter.as_ref()?;
        let view = &self.container.child(child)?.view;
        self.items
            .iter()
            .find(|ii| slot.is_view_from_item(view, &ii.item))
            .map(ItemInfo::layout)
    }

    /// Offset of virtual position 0, or `f32::MIN` when it is not materialized.
    pub fn first_offset(&self) -> f32 {
        self.first_offset
    }

    /// Offset at which the last page ends, or `f32::MAX` when it is not materialized.
    pub fn last_offset(&self) -> f32 {
        self.last_offset
    }

    pub fn populate_pending(&self) -> bool {
        self.populate_pending
    }

    pub fn container(&self) -> &Container<A::View> {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container<A::View> {
        &mut self.container
    }

    pub fn save_state(&self) -> PagerState<A::State> {
        PagerState {
            position: self.cur_item,
            adapter_state: self.adapter.as_ref().and_then(Slot::save_state),
        }
    }

    /// Restores a snapshot now, or at the next `set_adapter` when no adapter is installed.
    pub fn restore_state(&mut self, state: PagerState<A::State>) {
        let Some(slot) = self.adapter.as_mut() else {
            self.restored = Some(state);
            return;
        };
        if let Some(adapter_state) = state.adapter_state {
            slot.restore_state(adapter_state);
        }
        self.set_current_item_internal(state.position, false, true, 0.0);
    }

    fn with_slot<R>(&mut self, f: impl FnOnce(&mut Self, &mut Slot<A>) -> R) -> Option<R> {
        let mut slot = self.adapter.take()?;
        let out = f(self, &mut slot);
        self.adapter = Some(slot);
        Some(out)
    }

    /// Rebuilds the window of materialized pages around the current position.
    pub fn populate(&mut self) {
        self.populate_to(self.cur_item);
    }

    fn populate_to(&mut self, new_current: usize) {
        let mut old_cur = None;
        let mut focus_direction = FocusDirection::Forward;
        if self.cur_item != new_current {
            focus_direction = if self.cur_item < new_current {
                FocusDirection::Right
            } else {
                FocusDirection::Left
            };
            old_cur = self.info_for_position(self.cur_item);
            self.cur_item = new_current;
        }

        if self.adapter.is_none() {
            self.sort_child_drawing_order();
            return;
        }

        // Hold off creating pages between a release and the end of its settle, so the pages that
        // are sliding in are not rebuilt under the finger.
        if self.populate_pending {
            ptrace!(new_current, "populate deferred: settle pending");
            self.sort_child_drawing_order();
            return;
        }

        // Nothing is materialized before the host is attached, so restored state is not raced.
        if !self.attached {
            return;
        }

        self.with_slot(|this, slot| this.populate_window(slot, old_cur, focus_direction));
    }

    fn populate_window(
        &mut self,
        slot: &mut Slot<A>,
        old_cur: Option<PageLayout>,
        focus_direction: FocusDirection,
    ) {
        let count = slot.count();
        let real_count = slot.real_count();
        if count != self.expected_adapter_count || real_count != self.expected_real_count {
            panic!(
                "the adapter changed its contents without calling ViewPager::notify_data_set_changed! \
                 expected count: {}, found: {} (real: expected {}, found {}); pager id: {:?}; \
                 problematic adapter: {}",
                self.expected_adapter_count,
                count,
                self.expected_real_count,
                real_count,
                self.options.id,
                slot.type_name(),
            );
        }

        let cur = self.cur_item;
        let (check_start, check_end) = slot.walk_bounds(cur);
        ptrace!(cur, check_start, check_end, items = self.items.len(), "populate");

        slot.start_update(&mut self.container);

        // Pages left behind by a far jump lie outside both walks below.
        let mut i = 0;
        while i < self.items.len() {
            let ii = &self.items[i];
            if !ii.scrolling && (ii.position < check_start || ii.position >= check_end) {
                let ii = self.items.remove(i);
                slot.destroy_item(&mut self.container, ii.position, ii.item);
            } else {
                i += 1;
            }
        }

        let mut cur_index = self
            .items
            .iter()
            .position(|ii| ii.position >= cur)
            .unwrap_or(self.items.len());
        let mut has_cur = self
            .items
            .get(cur_index)
            .is_some_and(|ii| ii.position == cur);
        if !has_cur && real_count > 0 {
            self.add_new_item(slot, cur, cur_index);
            has_cur = true;
        }

        if has_cur {
            let limit = self.options.offscreen_page_limit;
            let start_pos = cur.saturating_sub(limit);
            let end_pos = cur.saturating_add(limit).min(count - 1);
            let client_width = self.client_width() as f32;

            // Fill to the left: two viewports' worth, or `limit` pages, whichever is more.
            let mut extra_width_left = 0.0;
            let mut item_index = cur_index.checked_sub(1);
            let left_width_needed = if client_width <= 0.0 {
                0.0
            } else {
                2.0 - self.items[cur_index].width_factor + self.padding_left as f32 / client_width
            };
            for pos in (check_start..cur).rev() {
                if extra_width_left >= left_width_needed && pos < start_pos {
                    let Some(idx) = item_index else {
                        break;
                    };
                    if self.items[idx].position == pos && !self.items[idx].scrolling {
                        let ii = self.items.remove(idx);
                        slot.destroy_item(&mut self.container, pos, ii.item);
                        item_index = idx.checked_sub(1);
                        cur_index -= 1;
                    }
                } else if let Some(idx) = item_index.filter(|&idx| self.items[idx].position == pos)
                {
                    extra_width_left += self.items[idx].width_factor;
                    item_index = idx.checked_sub(1);
                } else {
                    let at = item_index.map_or(0, |idx| idx + 1);
                    extra_width_left += self.add_new_item(slot, pos, at);
                    cur_index += 1;
                }
            }

            // Then to the right.
            let mut extra_width_right = self.items[cur_index].width_factor;
            let mut item_index = cur_index + 1;
            if extra_width_right < 2.0 {
                let right_width_needed = if client_width <= 0.0 {
                    0.0
                } else {
                    self.padding_right as f32 / client_width + 2.0
                };
                for pos in (cur + 1)..check_end {
                    let existing = self.items.get(item_index).map(|ii| (ii.position, ii.scrolling));
                    if extra_width_right >= right_width_needed && pos > end_pos {
                        let Some((position, scrolling)) = existing else {
                            break;
                        };
                        if position == pos && !scrolling {
                            let ii = self.items.remove(item_index);
                            slot.destroy_item(&mut self.container, pos, ii.item);
                        }
                    } else if existing.is_some_and(|(position, _)| position == pos) {
                        extra_width_right += self.items[item_index].width_factor;
                        item_index += 1;
                    } else {
                        extra_width_right += self.add_new_item(slot, pos, item_index);
                        item_index += 1;
                    }
                }
            }

            self.calculate_page_offsets(slot, cur_index, old_cur);
        }

        let primary = self.items.iter().find(|ii| ii.position == cur).map(|ii| &ii.item);
        slot.set_primary_item(&mut self.container, cur, primary);
        slot.finish_update(&mut self.container);

        // Fill in layout params for children added by this pass.
        for i in 0..self.container.child_count() {
            let Some(child) = self.container.child_mut(i) else {
                break;
            };
            child.params.child_index = i;
            if child.params.is_decor || child.params.width_factor != 0.0 {
                continue;
            }
            if let Some(ii) = self
                .items
                .iter()
                .find(|ii| slot.is_view_from_item(&child.view, &ii.item))
            {
                child.params.width_factor = ii.width_factor;
                child.params.position = ii.position;
            }
        }
        self.sort_child_drawing_order();

        self.restore_focus(slot, cur, focus_direction);
    }

    fn add_new_item(&mut self, slot: &mut Slot<A>, position: usize, index: usize) -> f32 {
        let item = slot.instantiate_item(&mut self.container, position);
        let width_factor = slot.page_width(position);
        self.items.insert(
            index,
            ItemInfo {
                position,
                item,
                offset: 0.0,
                width_factor,
                scrolling: false,
            },
        );
        width_factor
    }

    fn restore_focus(&mut self, slot: &Slot<A>, cur: usize, direction: FocusDirection) {
        let Some(focused) = self.container.focused_child() else {
            return;
        };
        let owner = |this: &Self, child: usize| {
            let view = &this.container.child(child)?.view;
            this.items
                .iter()
                .find(|ii| slot.is_view_from_item(view, &ii.item))
                .map(|ii| ii.position)
        };
        if owner(self, focused) == Some(cur) {
            return;
        }
        for i in 0..self.container.child_count() {
            if owner(self, i) == Some(cur) && self.container.request_child_focus(i, direction) {
                break;
            }
        }
    }

    fn sort_child_drawing_order(&mut self) {
        if self.options.drawing_order == DrawingOrder::Default {
            return;
        }
        self.drawing_ordered_children.clear();
        self.drawing_ordered_children
            .extend(0..self.container.child_count());
        let children = self.container.children();
        self.drawing_ordered_children.sort_by(|&a, &b| {
            let (a, b) = (&children[a].params, &children[b].params);
            match (a.is_decor, b.is_decor) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a.position.cmp(&b.position),
            }
        });
    }

    fn calculate_page_offsets(
        &mut self,
        slot: &Slot<A>,
        cur_index: usize,
        old_cur: Option<PageLayout>,
    ) {
        let count = slot.count();
        let margin_offset = self.margin_offset();
        let cur_position = self.items[cur_index].position;

        // Carry offsets over from the previous current page so the visible content stays put.
        // A page outside the walk bounds is too far away for its offset to matter.
        let (near_start, near_end) = slot.walk_bounds(cur_position);
        let old_cur = old_cur.filter(|old| (near_start..near_end).contains(&old.position));
        if let Some(old) = old_cur {
            if old.position < cur_position {
                let mut offset = old.offset + old.width_factor + margin_offset;
                let mut pos = old.position + 1;
                for ii in self
                    .items
                    .iter_mut()
                    .filter(|ii| ii.position > old.position && ii.position <= cur_position)
                {
                    offset += slot.span_width(pos, ii.position, margin_offset);
                    ii.offset = offset;
                    offset += ii.width_factor + margin_offset;
                    pos = ii.position + 1;
                }
            } else if old.position > cur_position {
                let mut offset = old.offset;
                let mut pos = old.position;
                for ii in self
                    .items
                    .iter_mut()
                    .rev()
                    .filter(|ii| ii.position >= cur_position && ii.position < old.position)
                {
                    offset -= slot.span_width(ii.position + 1, pos, margin_offset);
                    offset -= ii.width_factor + margin_offset;
                    ii.offset = offset;
                    pos = ii.position;
                }
            }
        }

        // Rebuild every offset from the current page outward.
        let cur = self.items[cur_index].layout();
        self.first_offset = if cur.position == 0 {
            cur.offset
        } else {
            f32::MIN
        };
        self.last_offset = if cur.position + 1 == count {
            cur.offset + cur.width_factor - 1.0
        } else {
            f32::MAX
        };

        let mut offset = cur.offset;
        let mut pos = cur.position;
        for ii in self.items[..cur_index].iter_mut().rev() {
            offset -= slot.span_width(ii.position + 1, pos, margin_offset);
            offset -= ii.width_factor + margin_offset;
            ii.offset = offset;
            if ii.position == 0 {
                self.first_offset = offset;
            }
            pos = ii.position;
        }

        offset = cur.offset + cur.width_factor + margin_offset;
        pos = cur.position + 1;
        for ii in &mut self.items[cur_index + 1..] {
            offset += slot.span_width(pos, ii.position, margin_offset);
            if ii.position + 1 == count {
                self.last_offset = offset + ii.width_factor - 1.0;
            }
            ii.offset = offset;
            offset += ii.width_factor + margin_offset;
            pos = ii.position + 1;
        }

        self.need_calculate_page_offsets = false;
    }
}

impl<A: PagerAdapter> core::fmt::Debug for ViewPager<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewPager")
            .field("options", &self.options)
            .field("has_adapter", &self.adapter.is_some())
            .field("cur_item", &self.cur_item)
            .field("items", &self.items.len())
            .field("populate_pending", &self.populate_pending)
            .field("first_layout", &self.first_layout)
            .field("attached", &self.attached)
            .field("width", &self.width)
            .field("scroll_x", &self.scroll_x)
            .field("scroll_state", &self.scroll_state)
            .finish_non_exhaustive()
    }
}

fn abs(v: f32) -> f32 {
    if v < 0.0 { -v } else { v }
}
