pub mod use_portal_intents;
pub mod use_portal_sync;
