//! Defines the mutable, reactive state for the application's UI.

use api::ItemListState;
use api::Session;
use api::WriteKind;
use dioxus::prelude::*;

/// What the page is waiting on, if anything.
#[derive(Clone, Copy, PartialEq, Debug, Default, strum::EnumIs)]
pub enum Activity {
    #[default]
    Idle,
    /// The wallet authorization prompt is open.
    Connecting,
    Writing(WriteKind),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message shown above the page content until dismissed or
/// replaced.
#[derive(Clone, PartialEq, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A reactive state provided as a Dioxus context for mutable UI data.
///
/// Only the sync and intent coroutines write `session` and `items`; components
/// read them through the projected view.
#[derive(Clone, Copy)]
pub struct AppStateMut {
    pub session: Signal<Session>,
    pub items: Signal<ItemListState>,
    /// Link text typed but not yet submitted.
    pub pending: Signal<String>,
    pub activity: Signal<Activity>,
    /// True while a read of the shared record is in flight.
    pub fetching: Signal<bool>,
    pub notice: Signal<Option<Notice>>,
}
