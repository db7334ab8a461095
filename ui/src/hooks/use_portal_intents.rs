//! Runs what the user asks for: connecting, creating the record and adding
//! links. Actions are processed one at a time, and every write that lands is
//! announced to the sync coroutine so the list is re-read.

use api::PortalEvent;
use dioxus::prelude::*;
use dioxus_logger::tracing::info;
use futures::StreamExt;

use crate::app_state::AppState;
use crate::app_state_mut::AppStateMut;
use crate::compat;
use crate::portal;
use crate::projector::UserAction;

pub fn use_portal_intents(sync: Coroutine<PortalEvent>) -> Coroutine<UserAction> {
    let app_state = use_context::<AppState>();
    let state = use_context::<AppStateMut>();

    let intents = use_coroutine(move |mut rx: UnboundedReceiver<UserAction>| {
        let app_state = app_state.clone();
        let mut state = state;
        async move {
            while let Some(action) = rx.next().await {
                info!("user action: {}", action);
                if let Some(event) = portal::handle_action(&app_state, &mut state, action).await {
                    sync.send(event);
                }
            }
        }
    });

    // Connect once the page has loaded. The connect button re-runs this.
    use_hook(move || {
        spawn(async move {
            compat::document_loaded().await;
            intents.send(UserAction::Connect);
        });
    });

    intents
}
