pub mod notification_settings;
pub mod store;
pub mod transition;
