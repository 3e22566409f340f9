use alloc::sync::Arc;

use crate::{DrawingOrder, Easing, ScrollState};

/// A callback fired when a new page becomes selected. Receives the logical (real-adapter) index.
pub type OnPageSelectedCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// A callback fired when the pager moves between idle, dragging and settling.
pub type OnScrollStateChangedCallback = Arc<dyn Fn(ScrollState) + Send + Sync>;

/// Minimum offscreen page limit; the pager always keeps one neighbour on each side.
pub const DEFAULT_OFFSCREEN_PAGES: usize = 1;

/// Longest settle animation, in milliseconds.
pub const MAX_SETTLE_DURATION_MS: u64 = 600;

/// Configuration for [`crate::ViewPager`].
///
/// Callbacks are stored in `Arc`s so options stay cheap to clone and update.
pub struct PagerOptions {
    /// Wrap the adapter in a [`crate::LoopAdapter`] so paging never hits an end.
    pub loop_scroll: bool,
    /// Pages kept on each side of the current one, beyond what is needed to fill the viewport.
    pub offscreen_page_limit: usize,
    /// Gap between pages, in pixels.
    pub page_margin: u32,
    pub drawing_order: DrawingOrder,
    /// Host-defined identifier used in diagnostics.
    pub id: Option<u32>,

    /// Velocity (px/s) above which a release flings to the neighbouring page.
    pub min_fling_velocity: f32,
    /// Distance (px) a drag must cover before a fling is honoured.
    pub fling_distance: f32,
    pub settle_easing: Easing,

    pub on_page_selected: Option<OnPageSelectedCallback>,
    pub on_scroll_state_changed: Option<OnScrollStateChangedCallback>,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            loop_scroll: true,
            offscreen_page_limit: DEFAULT_OFFSCREEN_PAGES,
            page_margin: 0,
            drawing_order: DrawingOrder::Default,
            id: None,
            min_fling_velocity: 400.0,
            fling_distance: 25.0,
            settle_easing: Easing::default(),
            on_page_selected: None,
            on_scroll_state_changed: None,
        }
    }
}

impl Clone for PagerOptions {
    fn clone(&self) -> Self {
        Self {
            loop_scroll: self.loop_scroll,
            offscreen_page_limit: self.offscreen_page_limit,
            page_margin: self.page_margin,
            drawing_order: self.drawing_order,
            id: self.id,
            min_fling_velocity: self.min_fling_velocity,
            fling_distance: self.fling_distance,
            settle_easing: self.settle_easing,
            on_page_selected: self.on_page_selected.clone(),
            on_scroll_state_changed: self.on_scroll_state_changed.clone(),
        }
    }
}

impl PagerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loop_scroll(mut self, loop_scroll: bool) -> Self {
        self.loop_scroll = loop_scroll;
        self
    }

    /// Values below [`DEFAULT_OFFSCREEN_PAGES`] are raised to it.
    pub fn with_offscreen_page_limit(mut self, limit: usize) -> Self {
        self.offscreen_page_limit = limit.max(DEFAULT_OFFSCREEN_PAGES);
        self
    }

    pub fn with_page_margin(mut self, page_margin: u32) -> Self {
        self.page_margin = page_margin;
        self
    }

    pub fn with_drawing_order(mut self, drawing_order: DrawingOrder) -> Self {
        self.drawing_order = drawing_order;
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_fling(mut self, min_fling_velocity: f32, fling_distance: f32) -> Self {
        self.min_fling_velocity = min_fling_velocity;
        self.fling_distance = fling_distance;
        self
    }

    pub fn with_settle_easing(mut self, easing: Easing) -> Self {
        self.settle_easing = easing;
        self
    }

    pub fn with_on_page_selected(
        mut self,
        on_page_selected: Option<impl Fn(usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_page_selected = on_page_selected.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll_state_changed(
        mut self,
        on_scroll_state_changed: Option<impl Fn(ScrollState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll_state_changed = on_scroll_state_changed.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for PagerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagerOptions")
            .field("loop_scroll", &self.loop_scroll)
            .field("offscreen_page_limit", &self.offscreen_page_limit)
            .field("page_margin", &self.page_margin)
            .field("drawing_order", &self.drawing_order)
            .field("id", &self.id)
            .field("min_fling_velocity", &self.min_fling_velocity)
            .field("fling_distance", &self.fling_distance)
            .field("settle_easing", &self.settle_easing)
            .finish_non_exhaustive()
    }
}
