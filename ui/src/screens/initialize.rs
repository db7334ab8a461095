use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::components::action_button::ActionButton;
use crate::components::empty_state::EmptyState;
use crate::projector::UserAction;

/// Shown while signed in without a list. Creation is only offered once a read
/// has found the record missing.
#[component]
pub fn InitializeScreen(confirmed_absent: bool, actions: Vec<UserAction>) -> Element {
    let state = use_context::<AppStateMut>();
    let fetching = *state.fetching.read();

    let (title, description) = if confirmed_absent {
        (
            "The shared record does not exist yet",
            "Create it once and everyone can start adding links.",
        )
    } else if fetching {
        ("Loading the shared record…", "Reading it from the ledger.")
    } else {
        ("The shared record could not be loaded", "Check your connection and try again.")
    };

    rsx! {
        EmptyState {
            title: title.to_string(),
            description: description.to_string(),
            primary_action: rsx! {
                for action in actions {
                    ActionButton { key: "{action}", action }
                }
            },
        }
    }
}
