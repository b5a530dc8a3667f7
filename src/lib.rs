pub mod app;
pub mod config;
pub mod layout;
pub mod mail;
pub mod prefs;
pub mod summary;
pub mod ui;
