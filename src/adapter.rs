use crate::Container;

/// Supplies page content to a [`crate::ViewPager`].
///
/// The adapter owns its views: `instantiate_item` is expected to add the view for `position` to
/// the container (or reuse one already there) and return a handle the pager can hand back later;
/// `destroy_item` receives the same handle and must release it.
///
/// When the pager loops, every call that takes a position receives a real index in
/// `0..count()`; the virtual index space never leaks into adapter code.
pub trait PagerAdapter {
    /// What the adapter puts into the container.
    type View;
    /// Opaque handle returned from `instantiate_item`.
    type Item;
    /// Adapter-defined saved state.
    type State;

    fn count(&self) -> usize;

    /// Width of the page at `position` as a fraction of the client width, in `(0, 1]`.
    fn page_width(&self, _position: usize) -> f32 {
        1.0
    }

    fn instantiate_item(&mut self, container: &mut Container<Self::View>, position: usize)
    -> Self::Item;

    fn destroy_item(
        &mut self,
        container: &mut Container<Self::View>,
        position: usize,
        item: Self::Item,
    );

    /// Whether `view` is the page view belonging to `item`.
    fn is_view_from_item(&self, view: &Self::View, item: &Self::Item) -> bool;

    /// Called before a batch of instantiate/destroy calls.
    fn start_update(&mut self, _container: &mut Container<Self::View>) {}

    /// Called after a batch of instantiate/destroy calls.
    fn finish_update(&mut self, _container: &mut Container<Self::View>) {}

    /// Announces the page the pager considers current.
    fn set_primary_item(
        &mut self,
        _container: &mut Container<Self::View>,
        _position: usize,
        _item: Option<&Self::Item>,
    ) {
    }

    fn save_state(&self) -> Option<Self::State> {
        None
    }

    fn restore_state(&mut self, _state: Self::State) {}
}
