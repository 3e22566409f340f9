use alloc::vec::Vec;

use crate::{FocusDirection, LayoutParams};

/// A view held by the [`Container`] together with its layout bookkeeping.
#[derive(Clone, Debug)]
pub struct Child<V> {
    pub view: V,
    pub params: LayoutParams,
    pub focusable: bool,
}

/// A headless stand-in for the host view group.
///
/// Adapters add and remove their page views here from `instantiate_item`/`destroy_item`; the pager
/// keeps per-child [`LayoutParams`], drawing order and focus in sync with the tracked pages.
/// The container never inspects views beyond equality.
#[derive(Clone, Debug)]
pub struct Container<V> {
    children: Vec<Child<V>>,
    focused: Option<usize>,
    last_focus_direction: Option<FocusDirection>,
}

impl<V> Default for Container<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Container<V> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            focused: None,
            last_focus_direction: None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&Child<V>> {
        self.children.get(index)
    }

    pub fn children(&self) -> &[Child<V>] {
        &self.children
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> Option<&mut Child<V>> {
        self.children.get_mut(index)
    }

    /// Adds a page view. Its layout params start with `width_factor == 0.0`, so the next populate
    /// fills them in from the tracked page.
    pub fn add_view(&mut self, view: V) {
        self.push(view, false, true);
    }

    /// Adds a page view that can never take focus.
    pub fn add_unfocusable_view(&mut self, view: V) {
        self.push(view, false, false);
    }

    /// Adds a decor view (indicator, title strip). Decor views are not pages.
    pub fn add_decor_view(&mut self, view: V) {
        self.push(view, true, false);
    }

    fn push(&mut self, view: V, is_decor: bool, focusable: bool) {
        let child_index = self.children.len();
        self.children.push(Child {
            view,
            params: LayoutParams {
                is_decor,
                width_factor: 0.0,
                position: 0,
                child_index,
            },
            focusable,
        });
    }

    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }

    pub fn focused_child(&self) -> Option<usize> {
        self.focused
    }

    /// Direction passed to the last successful [`Container::request_child_focus`].
    pub fn last_focus_direction(&self) -> Option<FocusDirection> {
        self.last_focus_direction
    }

    /// Moves focus to `index`. Fails for decor, unfocusable or missing children.
    pub fn request_child_focus(&mut self, index: usize, direction: FocusDirection) -> bool {
        match self.children.get(index) {
            Some(child) if child.focusable && !child.params.is_decor => {
                self.focused = Some(index);
                self.last_focus_direction = Some(direction);
                true
            }
            _ => false,
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn remove_at(&mut self, index: usize) -> V {
        let child = self.children.remove(index);
        self.focused = match self.focused {
            Some(f) if f == index => None,
            Some(f) if f > index => Some(f - 1),
            other => other,
        };
        child.view
    }

    /// Removes every non-decor child.
    pub(crate) fn remove_page_views(&mut self) {
        let mut i = 0;
        while i < self.children.len() {
            if self.children[i].params.is_decor {
                i += 1;
            } else {
                self.remove_at(i);
            }
        }
    }
}

impl<V: PartialEq> Container<V> {
    pub fn index_of(&self, view: &V) -> Option<usize> {
        self.children.iter().position(|c| &c.view == view)
    }

    pub fn contains(&self, view: &V) -> bool {
        self.index_of(view).is_some()
    }

    /// Removes `view` and returns it. Removing the focused child clears focus.
    pub fn remove_view(&mut self, view: &V) -> Option<V> {
        let index = self.index_of(view)?;
        Some(self.remove_at(index))
    }
}
