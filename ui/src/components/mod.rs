//! Shared building blocks for the screens.
pub mod account;
pub mod action_button;
pub mod empty_state;
pub mod item_grid;
pub mod notice_banner;
pub mod pico;
