//! OneUp Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
/// Application state management
///
/// Holds the database handle shared by all handlers.
pub mod state;
pub mod validation;
