//! cloudnote-core - Core library for Cloud Note
//!
//! This crate contains the document models, store clients, screen models and
//! app controller shared by the Cloud Note front ends.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod navigation;
pub mod screens;
pub mod session;
pub mod store;
pub mod util;

pub use app::{Action, App};
pub use error::{Error, Result};
pub use models::{Note, NoteId, Username};
