use api::Pubkey;
use dioxus::prelude::*;

/// The connected account, abbreviated, with the full key on hover.
#[component]
pub fn AccountBadge(account: Pubkey) -> Element {
    rsx! {
        span {
            class: "account-badge",
            title: "{account}",
            code { "{account.abbreviated()}" }
        }
    }
}
