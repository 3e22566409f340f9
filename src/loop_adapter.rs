use crate::{Container, PagerAdapter};

/// Size of the virtual index space exposed by [`LoopAdapter`].
///
/// Even, so `VIRTUAL_COUNT / 2` is exact, and large enough that no realistic amount of paging
/// from the middle reaches either end.
pub const VIRTUAL_COUNT: usize = 1 << 31;

/// Wraps a bounded adapter in an effectively unbounded index space.
///
/// Virtual position `v` maps to real position `v % real_count()`. Every position-taking call is
/// translated before it reaches the wrapped adapter; identity checks and saved state pass through
/// untouched because they are keyed by content, not position.
///
/// An empty wrapped adapter is tolerated: nothing is instantiated (`instantiate_item` returns
/// `None`) and destroy/primary-item calls are dropped.
#[derive(Clone, Debug)]
pub struct LoopAdapter<A> {
    inner: A,
}

impl<A: PagerAdapter> LoopAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &A {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    /// The wrapped adapter's count.
    pub fn real_count(&self) -> usize {
        self.inner.count()
    }

    /// Maps a virtual position to a real one, or `None` when the wrapped adapter is empty.
    pub fn to_real(&self, virtual_position: usize) -> Option<usize> {
        let real_count = self.real_count();
        if real_count == 0 {
            return None;
        }
        Some(virtual_position % real_count)
    }

    /// The virtual position congruent to `logical` closest below the middle of the range.
    ///
    /// Returns `logical` unchanged when it is not a valid real index (including the empty case).
    pub fn centered(&self, logical: usize) -> usize {
        let real_count = self.real_count();
        if logical >= real_count {
            return logical;
        }
        let mid = VIRTUAL_COUNT / 2;
        mid - mid % real_count + logical
    }
}

impl<A: PagerAdapter> PagerAdapter for LoopAdapter<A> {
    type View = A::View;
    type Item = Option<A::Item>;
    type State = A::State;

    fn count(&self) -> usize {
        VIRTUAL_COUNT
    }

    fn page_width(&self, position: usize) -> f32 {
        match self.to_real(position) {
            Some(real) => self.inner.page_width(real),
            None => 1.0,
        }
    }

    fn instantiate_item(
        &mut self,
        container: &mut Container<Self::View>,
        position: usize,
    ) -> Self::Item {
        let Some(real) = self.to_real(position) else {
            pwarn!(position, "LoopAdapter::instantiate_item on an empty adapter");
            return None;
        };
        ptrace!(virtual_position = position, real, "instantiate_item");
        Some(self.inner.instantiate_item(container, real))
    }

    fn destroy_item(
        &mut self,
        container: &mut Container<Self::View>,
        position: usize,
        item: Self::Item,
    ) {
        let (Some(real), Some(item)) = (self.to_real(position), item) else {
            return;
        };
        ptrace!(virtual_position = position, real, "destroy_item");
        self.inner.destroy_item(container, real, item);
    }

    fn is_view_from_item(&self, view: &Self::View, item: &Self::Item) -> bool {
        item.as_ref()
            .is_some_and(|item| self.inner.is_view_from_item(view, item))
    }

    fn start_update(&mut self, container: &mut Container<Self::View>) {
        self.inner.start_update(container);
    }

    fn finish_update(&mut self, container: &mut Container<Self::View>) {
        self.inner.finish_update(container);
    }

    fn set_primary_item(
        &mut self,
        container: &mut Container<Self::View>,
        position: usize,
        item: Option<&Self::Item>,
    ) {
        let Some(real) = self.to_real(position) else {
            return;
        };
        self.inner
            .set_primary_item(container, real, item.and_then(Option::as_ref));
    }

    fn save_state(&self) -> Option<Self::State> {
        self.inner.save_state()
    }

    fn restore_state(&mut self, state: Self::State) {
        self.inner.restore_state(state);
    }
}
