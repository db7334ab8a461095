use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::projector::UserAction;

/// A button that sends `action` to the intents coroutine, with a spinner
/// while that action is running.
#[component]
pub fn ActionButton(action: UserAction, #[props(default = false)] disabled: bool) -> Element {
    let intents = use_coroutine_handle::<UserAction>();
    let state = use_context::<AppStateMut>();
    let busy = action.is_running(*state.activity.read(), *state.fetching.read());
    let label = action.label();
    let (button_type, outline) = match action {
        UserAction::Refresh => (ButtonType::Secondary, true),
        _ => (ButtonType::Primary, false),
    };

    rsx! {
        Button {
            button_type,
            outline,
            disabled,
            busy,
            on_click: move |_| intents.send(action),
            "{label}"
        }
    }
}
