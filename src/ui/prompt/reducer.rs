use crate::ui::mvi::Reducer;
use crate::ui::prompt::intent::PromptIntent;
use crate::ui::prompt::state::PromptState;

pub struct PromptReducer;

impl Reducer for PromptReducer {
    type State = PromptState;
    type Intent = PromptIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PromptIntent::Open => match state {
                // Reopening keeps what was typed.
                editing @ PromptState::Editing { .. } => editing,
                PromptState::Hidden => PromptState::Editing {
                    buffer: String::new(),
                },
            },
            PromptIntent::Close => PromptState::Hidden,
            PromptIntent::Input(ch) => match state {
                PromptState::Editing { mut buffer } => {
                    if !ch.is_control() {
                        buffer.push(ch);
                    }
                    PromptState::Editing { buffer }
                }
                other => other,
            },
            PromptIntent::InsertText(text) => match state {
                PromptState::Editing { mut buffer } => {
                    buffer.extend(text.chars().filter(|c| !c.is_control()));
                    PromptState::Editing { buffer }
                }
                other => other,
            },
            PromptIntent::Backspace => match state {
                PromptState::Editing { mut buffer } => {
                    buffer.pop();
                    PromptState::Editing { buffer }
                }
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(text: &str) -> PromptState {
        PromptState::Editing {
            buffer: text.to_string(),
        }
    }

    #[test]
    fn open_starts_empty() {
        let state = PromptReducer::reduce(PromptState::Hidden, PromptIntent::Open);
        assert_eq!(state.buffer(), Some(""));
    }

    #[test]
    fn input_ignored_when_hidden() {
        let state = PromptReducer::reduce(PromptState::Hidden, PromptIntent::Input('a'));
        assert_eq!(state, PromptState::Hidden);
    }

    #[test]
    fn typing_and_backspace() {
        let mut state = editing("fish.jp");
        state = PromptReducer::reduce(state, PromptIntent::Input('g'));
        assert_eq!(state.buffer(), Some("fish.jpg"));
        state = PromptReducer::reduce(state, PromptIntent::Backspace);
        state = PromptReducer::reduce(state, PromptIntent::Backspace);
        assert_eq!(state.buffer(), Some("fish.j"));
    }

    #[test]
    fn paste_drops_newlines() {
        let state = PromptReducer::reduce(
            editing("/tmp/"),
            PromptIntent::InsertText("reef.png\n".to_string()),
        );
        assert_eq!(state.buffer(), Some("/tmp/reef.png"));
    }

    #[test]
    fn close_hides() {
        let state = PromptReducer::reduce(editing("x"), PromptIntent::Close);
        assert!(!state.is_visible());
    }
}
