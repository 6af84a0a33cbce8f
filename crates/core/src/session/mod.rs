#![allow(missing_docs)]

//! Session controller and the action table that drives it.

mod action;
mod controller;

pub use action::{Action, ACTION_NAMES};
pub use controller::{Notice, SessionController, ACTIVITY_CHANCE};
