// Drill logic, storage and the event runtime live here so they can be
// driven headless from tests; terminal rendering stays in the binary.
pub mod app_dirs;
pub mod checker;
pub mod config;
pub mod drill;
pub mod error;
pub mod history;
pub mod language;
pub mod logging;
pub mod remote;
pub mod runtime;
pub mod session;
pub mod stats;
