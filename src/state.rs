/// A lightweight, serializable snapshot of the pager's persistent state.
///
/// `position` is the raw (virtual when looping) current item, so restoring into a looping pager
/// lands on the exact same virtual page. Adapter state is opaque and owned by the adapter.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize` whenever `S` does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerState<S> {
    pub position: usize,
    pub adapter_state: Option<S>,
}
