use dioxus::prelude::*;

#[derive(PartialEq, Clone, Props)]
pub struct EmptyStateProps {
    title: String,
    #[props(default)]
    description: Option<String>,
    #[props(default)]
    primary_action: Option<Element>,
    #[props(default)]
    icon: Option<String>,
}

/// A dashed placeholder box with an optional call to action.
#[component]
pub fn EmptyState(props: EmptyStateProps) -> Element {
    rsx! {
        div {
            class: "empty-state",

            if let Some(icon) = props.icon {
                div { class: "empty-state-icon", "{icon}" }
            }

            h4 {
                style: "margin-bottom: 0.5rem;",
                "{props.title}"
            }

            if let Some(desc) = props.description {
                p {
                    style: "max-width: 400px; margin: 0 auto 1.5rem auto;",
                    "{desc}"
                }
            }

            if let Some(action) = props.primary_action {
                div {
                    {action}
                }
            }
        }
    }
}
