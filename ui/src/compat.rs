// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use tokio::sync::oneshot;
    use wasm_bindgen::prelude::*;

    /// Shows a blocking browser alert.
    pub fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    /// Resolves once the document has fired `load`, or at once if it already
    /// has.
    pub async fn document_loaded() {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window
            .document()
            .is_some_and(|document| document.ready_state() == "complete")
        {
            return;
        }

        let (tx, rx) = oneshot::channel();
        let on_load = Closure::once(move |_: web_sys::Event| {
            let _ = tx.send(());
        });
        if window
            .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
            .is_err()
        {
            return;
        }
        on_load.forget();
        let _ = rx.await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use dioxus_logger::tracing::warn;

    pub fn alert(message: &str) {
        warn!("alert: {}", message);
    }

    pub async fn document_loaded() {}
}
