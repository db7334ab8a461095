//! Maps session and record state onto what the page shows and offers.

use api::Item;
use api::ItemListState;
use api::Pubkey;
use api::Session;
use api::WriteKind;

use crate::app_state_mut::Activity;

#[derive(Debug, Clone, PartialEq)]
pub enum PortalView {
    Unauthenticated,
    /// Signed in, but there is no list to show. `confirmed_absent` is only set
    /// once a read has found the record missing.
    AuthenticatedNoRecord {
        account: Pubkey,
        confirmed_absent: bool,
    },
    AuthenticatedPopulated {
        account: Pubkey,
        items: Vec<Item>,
        pending: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UserAction {
    Connect,
    Initialize,
    Refresh,
    Submit,
}

impl UserAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connect => "Connect to Wallet",
            Self::Initialize => "Do One-Time Initialization For GIF Program Account",
            Self::Refresh => "Refresh",
            Self::Submit => "Submit",
        }
    }

    /// Whether this action is what the page is currently waiting on.
    pub fn is_running(self, activity: Activity, fetching: bool) -> bool {
        match self {
            Self::Connect => activity == Activity::Connecting,
            Self::Initialize => activity == Activity::Writing(WriteKind::Initialize),
            Self::Submit => activity == Activity::Writing(WriteKind::Append),
            Self::Refresh => fetching,
        }
    }
}

pub fn project(session: &Session, items: &ItemListState, pending: &str) -> PortalView {
    let Some(account) = session.account() else {
        return PortalView::Unauthenticated;
    };
    match items {
        ItemListState::NotFetched => PortalView::AuthenticatedNoRecord {
            account,
            confirmed_absent: false,
        },
        ItemListState::Absent => PortalView::AuthenticatedNoRecord {
            account,
            confirmed_absent: true,
        },
        ItemListState::Populated(items) => PortalView::AuthenticatedPopulated {
            account,
            items: items.clone(),
            pending: pending.to_string(),
        },
    }
}

impl PortalView {
    pub fn account(&self) -> Option<Pubkey> {
        match self {
            Self::Unauthenticated => None,
            Self::AuthenticatedNoRecord { account, .. }
            | Self::AuthenticatedPopulated { account, .. } => Some(*account),
        }
    }

    pub fn available_actions(&self) -> Vec<UserAction> {
        match self {
            Self::Unauthenticated => vec![UserAction::Connect],
            Self::AuthenticatedNoRecord {
                confirmed_absent: true,
                ..
            } => vec![UserAction::Initialize],
            Self::AuthenticatedNoRecord {
                confirmed_absent: false,
                ..
            } => vec![UserAction::Refresh],
            Self::AuthenticatedPopulated { .. } => vec![UserAction::Submit, UserAction::Refresh],
        }
    }

    /// Whether the submit control is enabled, given whether a write is in
    /// flight.
    pub fn can_submit(&self, writing: bool) -> bool {
        match self {
            Self::AuthenticatedPopulated { pending, .. } => {
                !writing && !pending.trim().is_empty()
            }
            _ => false,
        }
    }

    pub fn container_class(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "portal connect-container",
            _ => "portal authed-container",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Pubkey {
        Pubkey::new([9; 32])
    }

    fn item(link: &str) -> Item {
        Item {
            link: link.to_string(),
            submitted_by: account(),
        }
    }

    #[test]
    fn unauthenticated_only_connects() {
        for items in [
            ItemListState::NotFetched,
            ItemListState::Absent,
            ItemListState::Populated(vec![item("a")]),
        ] {
            let view = project(&Session::unauthenticated(), &items, "x");
            assert_eq!(view, PortalView::Unauthenticated);
            assert_eq!(view.available_actions(), [UserAction::Connect]);
            assert_eq!(view.account(), None);
        }
    }

    #[test]
    fn absent_record_only_initializes() {
        let view = project(
            &Session::authenticated(account()),
            &ItemListState::Absent,
            "http://x/a.gif",
        );
        assert_eq!(view.available_actions(), [UserAction::Initialize]);
        assert!(!view.can_submit(false));
    }

    #[test]
    fn unknown_record_is_never_initialized() {
        let view = project(
            &Session::authenticated(account()),
            &ItemListState::NotFetched,
            "",
        );
        assert_eq!(
            view,
            PortalView::AuthenticatedNoRecord {
                account: account(),
                confirmed_absent: false
            }
        );
        assert_eq!(view.available_actions(), [UserAction::Refresh]);
    }

    #[test]
    fn populated_renders_items_exactly() {
        let items = vec![item("b"), item("a"), item("b")];
        let view = project(
            &Session::authenticated(account()),
            &ItemListState::Populated(items.clone()),
            "c",
        );
        match &view {
            PortalView::AuthenticatedPopulated {
                items: shown,
                pending,
                ..
            } => {
                assert_eq!(shown, &items);
                assert_eq!(pending, "c");
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(
            view.available_actions(),
            [UserAction::Submit, UserAction::Refresh]
        );
        assert_eq!(view.account(), Some(account()));
    }

    #[test]
    fn empty_record_is_still_populated() {
        let view = project(
            &Session::authenticated(account()),
            &ItemListState::Populated(Vec::new()),
            "",
        );
        assert_eq!(
            view.available_actions(),
            [UserAction::Submit, UserAction::Refresh]
        );
    }

    #[test]
    fn submit_needs_text_and_no_write_in_flight() {
        let session = Session::authenticated(account());
        let list = ItemListState::Populated(Vec::new());

        assert!(!project(&session, &list, "").can_submit(false));
        assert!(!project(&session, &list, "  ").can_submit(false));
        assert!(project(&session, &list, "a").can_submit(false));
        assert!(!project(&session, &list, "a").can_submit(true));
    }

    #[test]
    fn every_offered_action_has_a_label() {
        let session = Session::authenticated(account());
        let views = [
            project(&Session::unauthenticated(), &ItemListState::NotFetched, ""),
            project(&session, &ItemListState::NotFetched, ""),
            project(&session, &ItemListState::Absent, ""),
            project(&session, &ItemListState::Populated(Vec::new()), ""),
        ];
        for view in views {
            for action in view.available_actions() {
                assert!(!action.label().is_empty(), "{action} has no label");
            }
        }
        assert_eq!(UserAction::Connect.label(), "Connect to Wallet");
    }

    #[test]
    fn running_action_follows_activity() {
        let appending = Activity::Writing(WriteKind::Append);
        assert!(UserAction::Submit.is_running(appending, false));
        assert!(!UserAction::Initialize.is_running(appending, false));
        assert!(UserAction::Connect.is_running(Activity::Connecting, false));
        assert!(UserAction::Refresh.is_running(Activity::Idle, true));
        assert!(!UserAction::Refresh.is_running(appending, false));
    }
}
