//! Keeps the item list in step with the shared record.
//!
//! Every [`PortalEvent`] is answered with one fresh read. Events are handled
//! in order, so a read requested after a write always starts after that
//! write was confirmed. The coroutine belongs to the component that created
//! it; reads still in flight when it unmounts are never applied.

use api::PortalEvent;
use dioxus::prelude::*;
use dioxus_logger::tracing::debug;
use futures::StreamExt;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::portal;

pub fn use_portal_sync() -> Coroutine<PortalEvent> {
    let app_state = use_context::<AppState>();
    let state = use_context::<AppStateMut>();

    use_coroutine(move |mut rx: UnboundedReceiver<PortalEvent>| {
        let app_state = app_state.clone();
        let mut state = state;
        async move {
            while let Some(event) = rx.next().await {
                debug!("portal event: {:?}", event);
                portal::handle_event(&app_state, &mut state, event).await;
            }
        }
    })
}
