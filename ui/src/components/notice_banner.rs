use dioxus::prelude::*;

use crate::app_state_mut::AppStateMut;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;

#[component]
pub fn NoticeBanner() -> Element {
    let mut state = use_context::<AppStateMut>();
    let Some(notice) = state.notice.read().clone() else {
        return rsx! {};
    };

    rsx! {
        article {
            class: "notice notice-{notice.level}",
            role: "status",
            p { "{notice.message}" }
            Button {
                button_type: ButtonType::Secondary,
                outline: true,
                on_click: move |_| state.notice.set(None),
                "Dismiss"
            }
        }
    }
}
