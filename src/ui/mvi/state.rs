/// Marker for reducer-owned UI state.
///
/// `Default` is the state a surface starts in; `PartialEq` lets callers
/// skip work when a reduce step changed nothing.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
