#![warn(clippy::all, missing_docs)]

//! Core session logic for the musejam terminal app.
//!
//! This crate hosts the catalog data, configuration handling, navigation and
//! modal state, the jam countdown and its schedulers, and the controller that
//! ties them together for the terminal UI.

pub mod catalog;
pub mod community;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod profile;
pub mod render;
pub mod roulette;
pub mod session;
pub mod timer;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use error::{ActionError, ParseIdError};
pub use navigation::{ModalContent, ModalId, ProfileTab, ScreenId};
pub use session::{Action, Notice, SessionController};
pub use timer::{ManualScheduler, TickHandle, TickScheduler, TokioScheduler};
