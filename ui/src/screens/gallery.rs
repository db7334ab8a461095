use api::Item;
use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::components::action_button::ActionButton;
use crate::components::item_grid::ItemGrid;
use crate::components::pico::Input;
use crate::projector::UserAction;

/// The link input and the list. Submit sits next to the input; any other
/// offered action goes below the grid.
#[component]
pub fn GalleryScreen(
    items: Vec<Item>,
    pending: String,
    can_submit: bool,
    actions: Vec<UserAction>,
) -> Element {
    let intents = use_coroutine_handle::<UserAction>();
    let mut state = use_context::<AppStateMut>();
    let writing = state.activity.read().is_writing();
    let (submit, others): (Vec<_>, Vec<_>) = actions
        .into_iter()
        .partition(|action| *action == UserAction::Submit);
    let submit_offered = !submit.is_empty();

    rsx! {
        div {
            role: "group",
            Input {
                name: "link".to_string(),
                placeholder: "Enter gif link!".to_string(),
                value: pending,
                disabled: writing,
                on_input: move |text: String| state.pending.set(text),
                on_enter: move |_| {
                    if submit_offered && can_submit {
                        intents.send(UserAction::Submit);
                    }
                },
            }
            for action in submit {
                ActionButton { key: "{action}", action, disabled: !can_submit }
            }
        }
        ItemGrid { items }
        div {
            class: "gallery-actions",
            for action in others {
                ActionButton { key: "{action}", action }
            }
        }
    }
}
