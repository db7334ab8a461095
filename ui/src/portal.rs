//! What the page does in answer to portal events and user actions.
//!
//! The coroutines in `hooks` feed these functions one message at a time. State
//! goes through [`PortalStore`], which the page implements over its signals.

use api::append_item;
use api::detect_session;
use api::fetch_items;
use api::initialize_record;
use api::ItemListState;
use api::PortalError;
use api::PortalEvent;
use api::Session;
use api::WriteKind;
use dioxus::prelude::*;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;

use crate::app_state::AppState;
use crate::app_state_mut::Activity;
use crate::app_state_mut::AppStateMut;
use crate::app_state_mut::Notice;
use crate::compat;
use crate::projector::UserAction;

/// The mutable page state the handlers read and write.
pub trait PortalStore {
    fn session(&self) -> Session;
    fn set_session(&mut self, session: Session);
    fn set_items(&mut self, items: ItemListState);
    /// Empties the link input and returns what it held.
    fn take_pending(&mut self) -> String;
    fn set_activity(&mut self, activity: Activity);
    fn set_fetching(&mut self, fetching: bool);
    fn set_notice(&mut self, notice: Option<Notice>);

    /// Inspects a Result from a portal operation.
    /// - If `Ok`: returns the value. The current notice stays up.
    /// - If `Err`: reports it and returns None.
    fn check<T>(&mut self, result: Result<T, PortalError>) -> Option<T> {
        match result {
            Ok(val) => Some(val),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn report(&mut self, err: &PortalError) {
        warn!("portal error: {}", err);
        if err.needs_alert() {
            compat::alert(&err.to_string());
        }
        self.set_notice(Some(Notice::error(err.to_string())));
    }

    fn info(&mut self, message: impl Into<String>) {
        self.set_notice(Some(Notice::info(message)));
    }
}

impl PortalStore for AppStateMut {
    fn session(&self) -> Session {
        *self.session.peek()
    }

    fn set_session(&mut self, session: Session) {
        self.session.set(session);
    }

    fn set_items(&mut self, items: ItemListState) {
        self.items.set(items);
    }

    fn take_pending(&mut self) -> String {
        std::mem::take(&mut *self.pending.write())
    }

    fn set_activity(&mut self, activity: Activity) {
        self.activity.set(activity);
    }

    fn set_fetching(&mut self, fetching: bool) {
        self.fetching.set(fetching);
    }

    fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice.set(notice);
    }
}

/// Answers one event with one fresh read of the shared record.
pub async fn handle_event(app_state: &AppState, store: &mut impl PortalStore, event: PortalEvent) {
    if let PortalEvent::SessionEstablished(session) = event {
        if store.session() != session {
            info!("session changed, discarding previous list");
            store.set_items(ItemListState::NotFetched);
        }
        store.set_session(session);
    }

    let session = store.session();
    let Some(ctx) = store.check(app_state.context(&session)) else {
        return;
    };

    store.set_fetching(true);
    let result = fetch_items(&ctx, &app_state.record.address()).await;
    store.set_fetching(false);

    // a failed read keeps whatever list is already shown
    if let Some(items) = store.check(result) {
        store.set_items(items);
    }
}

/// Runs one user action. Returns the event to publish once it is done, if
/// any.
pub async fn handle_action(
    app_state: &AppState,
    store: &mut impl PortalStore,
    action: UserAction,
) -> Option<PortalEvent> {
    match action {
        UserAction::Connect => {
            store.set_activity(Activity::Connecting);
            let result = detect_session(app_state.wallet.as_ref()).await;
            store.set_activity(Activity::Idle);
            store.check(result).map(PortalEvent::SessionEstablished)
        }
        UserAction::Refresh => Some(PortalEvent::RefreshRequested),
        UserAction::Initialize => {
            run_write(app_state, store, WriteKind::Initialize, String::new()).await
        }
        UserAction::Submit => {
            // the text leaves the input whether or not the write succeeds
            let link = store.take_pending();
            run_write(app_state, store, WriteKind::Append, link).await
        }
    }
}

async fn run_write(
    app_state: &AppState,
    store: &mut impl PortalStore,
    kind: WriteKind,
    link: String,
) -> Option<PortalEvent> {
    let session = store.session();
    let ctx = store.check(app_state.context(&session))?;

    store.set_activity(Activity::Writing(kind));
    let result = match kind {
        WriteKind::Initialize => initialize_record(&ctx, &app_state.record).await,
        WriteKind::Append => append_item(&ctx, &app_state.record, &link).await,
    };
    store.set_activity(Activity::Idle);

    match result {
        Ok(()) => {
            store.info(match kind {
                WriteKind::Initialize => "Shared record created.".to_string(),
                WriteKind::Append => format!("Added {}", link.trim()),
            });
            Some(PortalEvent::WriteCompleted(kind))
        }
        // the record is not what the page believed, so re-read it
        Err(e @ (PortalError::AlreadyInitialized | PortalError::RecordNotFound)) => {
            store.report(&e);
            Some(PortalEvent::RefreshRequested)
        }
        Err(e) => {
            store.report(&e);
            None
        }
    }
}
