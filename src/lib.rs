//! # spk-web
//!
//! Shared browser helpers for the subject-selection decision-support pages,
//! compiled to WebAssembly.
//!
//! - [`core::api`] - JSON requests against the backend API
//! - [`core::store`] - JSON values persisted in localStorage
//! - [`components::nav`] - active navigation link highlighting
//! - [`components::toast`] - transient toast notifications
//! - [`bindings`] - the `SpkUi` class page scripts call into

pub mod bindings;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
