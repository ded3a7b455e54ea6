use crate::ui::mvi::Reducer;
use crate::ui::panels::intent::PanelIntent;
use crate::ui::panels::state::PanelState;

pub struct PanelReducer;

impl Reducer for PanelReducer {
    type State = PanelState;
    type Intent = PanelIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PanelIntent::ToggleDelete => state.toggle_delete(),
            PanelIntent::OpenHistory => state.open_history(),
            PanelIntent::CloseHistory => state.close_history(),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_history_ends_closed() {
        for delete_open in [false, true] {
            let start = PanelState {
                history_open: false,
                delete_open,
            };
            let opened = PanelReducer::reduce(start, PanelIntent::OpenHistory);
            assert!(opened.history_open);
            let closed = PanelReducer::reduce(opened, PanelIntent::CloseHistory);
            assert!(!closed.history_open);
            assert_eq!(closed.delete_open, delete_open);
        }
    }

    #[test]
    fn toggle_delete_does_not_touch_history() {
        let start = PanelState {
            history_open: true,
            delete_open: false,
        };
        let state = PanelReducer::reduce(start, PanelIntent::ToggleDelete);
        assert_eq!(
            state,
            PanelState {
                history_open: true,
                delete_open: true,
            }
        );
    }
}
