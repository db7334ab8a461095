//! Small Dioxus components over the Pico.css framework.
//! The page links pico.min.css in its head.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;

/// A centered container for your content.
/// Wraps content in a `<main class="container">` element.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

#[derive(PartialEq, Clone, Copy, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
}

impl ButtonType {
    fn to_class(self, outline: bool) -> &'static str {
        match (self, outline) {
            (ButtonType::Primary, false) => "",
            (ButtonType::Primary, true) => "outline",
            (ButtonType::Secondary, false) => "secondary",
            (ButtonType::Secondary, true) => "secondary outline",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
    #[props(default = false)]
    disabled: bool,
    /// Shows Pico's spinner and blocks clicks.
    #[props(default = false)]
    busy: bool,
}

pub fn Button(props: ButtonProps) -> Element {
    let class_str = props.button_type.to_class(props.outline);
    let on_click = props.on_click;
    rsx! {
        button {
            class: "{class_str}",
            disabled: props.disabled || props.busy,
            "aria-busy": props.busy,
            onclick: move |evt| {
                if let Some(handler) = on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct InputProps {
    name: String,
    #[props(optional)]
    placeholder: Option<String>,
    #[props(default)]
    value: String,
    #[props(default = false)]
    disabled: bool,
    #[props(optional)]
    on_input: Option<EventHandler<String>>,
    /// Fired when Enter is pressed in the field.
    #[props(optional)]
    on_enter: Option<EventHandler<()>>,
}

/// A text input that reports edits and Enter presses.
pub fn Input(props: InputProps) -> Element {
    let on_input = props.on_input;
    let on_enter = props.on_enter;
    rsx! {
        input {
            r#type: "text",
            name: "{props.name}",
            placeholder: "{props.placeholder.as_deref().unwrap_or(\"\")}",
            value: "{props.value}",
            disabled: props.disabled,
            oninput: move |evt: FormEvent| {
                if let Some(handler) = on_input {
                    handler.call(evt.value());
                }
            },
            onkeydown: move |evt: KeyboardEvent| {
                if evt.key() == Key::Enter {
                    evt.prevent_default();
                    if let Some(handler) = on_enter {
                        handler.call(());
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_classes_match_pico_variants() {
        assert_eq!(ButtonType::default().to_class(false), "");
        assert_eq!(ButtonType::Primary.to_class(true), "outline");
        assert_eq!(ButtonType::Secondary.to_class(false), "secondary");
        assert_eq!(ButtonType::Secondary.to_class(true), "secondary outline");
    }
}
