use api::Item;
use dioxus::prelude::*;

use crate::components::empty_state::EmptyState;

/// The shared links in record order. Duplicates are shown as often as they
/// were added.
#[component]
pub fn ItemGrid(items: Vec<Item>) -> Element {
    if items.is_empty() {
        return rsx! {
            EmptyState {
                title: "No links yet".to_string(),
                description: "Be the first to add one.".to_string(),
                icon: "🖼".to_string(),
            }
        };
    }

    rsx! {
        div {
            class: "gif-grid",
            for (index, item) in items.into_iter().enumerate() {
                figure {
                    key: "{index}",
                    class: "gif-item",
                    img { src: "{item.link}", alt: "{item.link}" }
                    figcaption {
                        small {
                            title: "{item.submitted_by}",
                            "added by {item.submitted_by.abbreviated()}"
                        }
                    }
                }
            }
        }
    }
}
