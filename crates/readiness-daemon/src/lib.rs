//! Readiness Daemon Library
//!
//! Core daemon functionality exposed as a library for testing.

pub mod api;
pub mod config;
pub mod event_manager;
pub mod events;
pub mod ipc;
pub mod settings;

pub use api::ApiHandler;
pub use config::ConfigManager;
pub use event_manager::EventManager;
pub use events::{DaemonEvent, IssueEvent, SettingsEvent};
pub use ipc::{IpcServer, Notification, Request, Response};
pub use settings::SettingsManager;
