use crate::{Container, LoopAdapter, PagerAdapter};

/// The adapter currently installed in a pager: either the caller's adapter as-is, or wrapped for
/// looping. Pages always carry `Option<A::Item>` so both modes share one window type.
#[derive(Clone, Debug)]
pub(crate) enum Slot<A> {
    Direct(A),
    Looping(LoopAdapter<A>),
}

impl<A: PagerAdapter> Slot<A> {
    pub(crate) fn new(adapter: A, looping: bool) -> Self {
        if looping {
            Self::Looping(LoopAdapter::new(adapter))
        } else {
            Self::Direct(adapter)
        }
    }

    pub(crate) fn get_ref(&self) -> &A {
        match self {
            Self::Direct(a) => a,
            Self::Looping(l) => l.get_ref(),
        }
    }

    pub(crate) fn get_mut(&mut self) -> &mut A {
        match self {
            Self::Direct(a) => a,
            Self::Looping(l) => l.get_mut(),
        }
    }

    pub(crate) fn into_inner(self) -> A {
        match self {
            Self::Direct(a) => a,
            Self::Looping(l) => l.into_inner(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Direct(_) => core::any::type_name::<A>(),
            Self::Looping(_) => core::any::type_name::<LoopAdapter<A>>(),
        }
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            Self::Direct(a) => a.count(),
            Self::Looping(l) => l.count(),
        }
    }

    pub(crate) fn real_count(&self) -> usize {
        self.get_ref().count()
    }

    /// Maps a pager position to the caller-facing index.
    pub(crate) fn logical(&self, position: usize) -> usize {
        match self {
            Self::Direct(_) => position,
            Self::Looping(l) => l.to_real(position).unwrap_or(0),
        }
    }

    /// Maps a caller-facing index to the pager position to jump to.
    pub(crate) fn centered(&self, logical: usize) -> usize {
        match self {
            Self::Direct(_) => logical,
            Self::Looping(l) => l.centered(logical),
        }
    }

    /// Positions populate may walk around `current`, as a half-open range.
    ///
    /// Looping content repeats every `real_count` positions, so there is never a reason to
    /// materialize more than one cycle on either side.
    pub(crate) fn walk_bounds(&self, current: usize) -> (usize, usize) {
        let count = self.count();
        match self {
            Self::Direct(_) => (0, count),
            Self::Looping(l) => {
                let real = l.real_count();
                (
                    current.saturating_sub(real),
                    count.min(current.saturating_add(real).saturating_add(1)),
                )
            }
        }
    }

    /// Total width of `start..end` with `margin` after each page.
    ///
    /// Looping widths repeat every `real_count` positions, so the cost is bounded by one cycle no
    /// matter how far apart the two positions are.
    pub(crate) fn span_width(&self, start: usize, end: usize, margin: f32) -> f32 {
        if end <= start {
            return 0.0;
        }
        let sum = |range: core::ops::Range<usize>| -> f32 {
            range.map(|pos| self.page_width(pos) + margin).sum()
        };
        match self {
            Self::Direct(_) => sum(start..end),
            Self::Looping(l) => {
                let real = l.real_count();
                let len = end - start;
                if real == 0 {
                    return len as f32 * (1.0 + margin);
                }
                let cycles = len / real;
                let rest = sum(start..start + len % real);
                if cycles == 0 {
                    rest
                } else {
                    cycles as f32 * sum(start..start + real) + rest
                }
            }
        }
    }

    pub(crate) fn page_width(&self, position: usize) -> f32 {
        match self {
            Self::Direct(a) => a.page_width(position),
            Self::Looping(l) => l.page_width(position),
        }
    }

    pub(crate) fn instantiate_item(
        &mut self,
        container: &mut Container<A::View>,
        position: usize,
    ) -> Option<A::Item> {
        match self {
            Self::Direct(a) => Some(a.instantiate_item(container, position)),
            Self::Looping(l) => l.instantiate_item(container, position),
        }
    }

    pub(crate) fn destroy_item(
        &mut self,
        container: &mut Container<A::View>,
        position: usize,
        item: Option<A::Item>,
    ) {
        match self {
            Self::Direct(a) => {
                if let Some(item) = item {
                    a.destroy_item(container, position, item);
                }
            }
            Self::Looping(l) => l.destroy_item(container, position, item),
        }
    }

    pub(crate) fn is_view_from_item(&self, view: &A::View, item: &Option<A::Item>) -> bool {
        match self {
            Self::Direct(a) => item.as_ref().is_some_and(|i| a.is_view_from_item(view, i)),
            Self::Looping(l) => l.is_view_from_item(view, item),
        }
    }

    pub(crate) fn start_update(&mut self, container: &mut Container<A::View>) {
        self.get_mut().start_update(container);
    }

    pub(crate) fn finish_update(&mut self, container: &mut Container<A::View>) {
        self.get_mut().finish_update(container);
    }

    pub(crate) fn set_primary_item(
        &mut self,
        container: &mut Container<A::View>,
        position: usize,
        item: Option<&Option<A::Item>>,
    ) {
        match self {
            Self::Direct(a) => a.set_primary_item(container, position, item.and_then(Option::as_ref)),
            Self::Looping(l) => l.set_primary_item(container, position, item),
        }
    }

    pub(crate) fn save_state(&self) -> Option<A::State> {
        self.get_ref().save_state()
    }

    pub(crate) fn restore_state(&mut self, state: A::State) {
        self.get_mut().restore_state(state);
    }
}
