use dioxus::prelude::*;

use crate::components::action_button::ActionButton;
use crate::components::empty_state::EmptyState;
use crate::projector::UserAction;

#[component]
pub fn ConnectScreen(actions: Vec<UserAction>) -> Element {
    rsx! {
        EmptyState {
            title: "Connect a wallet to see the board".to_string(),
            description: "Links are stored on-chain and signed by the account that added them.".to_string(),
            icon: "🔑".to_string(),
            primary_action: rsx! {
                for action in actions {
                    ActionButton { key: "{action}", action }
                }
            },
        }
    }
}
