/// Which direction focus moved when the pager relocated it to the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusDirection {
    Forward,
    Left,
    Right,
}

/// Order in which the host should draw the container's children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawingOrder {
    /// Children are drawn in insertion order.
    #[default]
    Default,
    /// Children are drawn by ascending page position (decor views first).
    Forward,
    /// Children are drawn by descending page position.
    Reverse,
}

/// Gesture/animation state of the pager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollState {
    #[default]
    Idle,
    Dragging,
    Settling,
}

/// Per-child layout bookkeeping, kept next to each view in the [`crate::Container`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutParams {
    /// Decor views (indicators, tabs) are not pages and never get a position.
    pub is_decor: bool,
    /// Fraction of the client width. `0.0` means "not known yet, requery the pager".
    pub width_factor: f32,
    /// Virtual page position the view currently belongs to.
    pub position: usize,
    /// Index of the child in the container at the last populate.
    pub child_index: usize,
}

/// A materialized page tracked by the pager.
///
/// `offset` and `width_factor` are fractions of the client width; offsets are relative to the
/// page the pager first anchored on, not to virtual position 0.
#[derive(Clone, Debug)]
pub struct ItemInfo<T> {
    pub position: usize,
    pub item: T,
    pub offset: f32,
    pub width_factor: f32,
    /// Set while a drag/settle that may still show this page is in flight; such pages are never
    /// evicted.
    pub scrolling: bool,
}

/// Layout-only view of an [`ItemInfo`], without the adapter's handle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLayout {
    pub position: usize,
    pub offset: f32,
    pub width_factor: f32,
    pub scrolling: bool,
}

impl<T> ItemInfo<T> {
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            position: self.position,
            offset: self.offset,
            width_factor: self.width_factor,
            scrolling: self.scrolling,
        }
    }
}
