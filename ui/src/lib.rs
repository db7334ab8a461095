// The client-side Dioxus application logic.

use std::rc::Rc;

use api::ItemListState;
use api::PortalConfig;
use api::Session;
use dioxus::prelude::*;

mod app_state;
mod app_state_mut;
pub mod compat;
mod components;
mod hooks;
mod portal;
mod projector;
mod screens;
mod wallet;

use app_state::AppState;
use app_state_mut::Activity;
use app_state_mut::AppStateMut;
use components::account::AccountBadge;
use components::notice_banner::NoticeBanner;
use components::pico::Container;
use hooks::use_portal_intents::use_portal_intents;
use hooks::use_portal_sync::use_portal_sync;
use projector::PortalView;
use screens::connect::ConnectScreen;
use screens::gallery::GalleryScreen;
use screens::initialize::InitializeScreen;
use wallet::BrowserWallet;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

const TWITTER_HANDLE: &str = "_buildspace";

const PORTAL_CSS: &str = r#"
    header.portal-header { text-align: center; padding-top: 2rem; }
    header.portal-header nav { justify-content: center; gap: 1rem; }
    .sub-text { color: var(--pico-muted-color); }

    .empty-state {
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        padding: 2rem;
        text-align: center;
        color: var(--pico-muted-color);
        border: 2px dashed var(--pico-card-border-color);
        border-radius: var(--pico-border-radius);
        background-color: var(--pico-card-sectioning-background-color);
        margin: 1rem 0;
    }
    .empty-state-icon { font-size: 12vmin; margin-bottom: 1rem; opacity: 0.8; }

    .notice { display: flex; align-items: center; justify-content: space-between; gap: 1rem; }
    .notice p { margin: 0; }
    .notice-error { border-left: 4px solid var(--pico-del-color); }
    .notice-info { border-left: 4px solid var(--pico-ins-color); }

    .gif-grid {
        display: grid;
        grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
        gap: 1rem;
        margin-top: 1.5rem;
    }
    .gif-item { margin: 0; text-align: center; }
    .gif-item img { width: 100%; height: 240px; object-fit: cover; border-radius: var(--pico-border-radius); }

    .gallery-actions { text-align: center; margin-top: 1.5rem; }

    footer.portal-footer { text-align: center; padding: 2rem 0; }
"#;

#[allow(non_snake_case)]
pub fn App() -> Element {
    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: PICO_CSS,
        }
        style {
            "{PORTAL_CSS}"
        }
        AppBody {}
    }
}

#[component]
fn AppBody() -> Element {
    // config is embedded at build time, so this only fails on a bad build
    let loaded = use_hook(|| {
        PortalConfig::embedded()
            .map(|config| AppState::new(config, Rc::new(BrowserWallet::default())))
            .map_err(|e| format!("{e:#}"))
    });

    match loaded {
        Ok(app_state) => rsx! {
            LoadedApp { app_state }
        },
        Err(e) => rsx! {
            Container {
                p { "An error occurred: {e}" }
            }
        },
    }
}

/// This component holds the main app logic and only runs once config is loaded.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    // Provide the stable, non-reactive AppState.
    use_context_provider(|| app_state.clone());

    let session = use_signal(Session::default);
    let items = use_signal(ItemListState::default);
    let pending = use_signal(String::new);
    let activity = use_signal(Activity::default);
    let fetching = use_signal(|| false);
    let notice = use_signal(|| None);
    use_context_provider(|| AppStateMut {
        session,
        items,
        pending,
        activity,
        fetching,
        notice,
    });

    let sync = use_portal_sync();
    use_portal_intents(sync);

    let view = use_memo(move || projector::project(&session.read(), &items.read(), &pending.read()));

    let current = view();
    let account = current.account();
    let container_class = current.container_class();
    let can_submit = current.can_submit(activity.read().is_writing());
    let actions = current.available_actions();

    rsx! {
        Container {
            header {
                class: "portal-header",
                nav {
                    ul {
                        li { h1 { style: "margin: 0;", "🖼 GIF Portal" } }
                    }
                    if let Some(account) = account {
                        ul {
                            li { AccountBadge { account } }
                        }
                    }
                }
                p { class: "sub-text", "View your GIF collection in the metaverse ✨" }
            }
            NoticeBanner {}
            div {
                class: "{container_class}",
                match current {
                    PortalView::Unauthenticated => rsx! {
                        ConnectScreen { actions }
                    },
                    PortalView::AuthenticatedNoRecord { confirmed_absent, .. } => rsx! {
                        InitializeScreen { confirmed_absent, actions }
                    },
                    PortalView::AuthenticatedPopulated { items, pending, .. } => rsx! {
                        GalleryScreen { items, pending, can_submit, actions }
                    },
                }
            }
            footer {
                class: "portal-footer",
                a {
                    href: "https://twitter.com/{TWITTER_HANDLE}",
                    target: "_blank",
                    rel: "noreferrer",
                    "built on @{TWITTER_HANDLE}"
                }
            }
        }
    }
}
