//! # CCMP Common Library
//!
//! Shared code for the coffee-chat mentorship program site:
//! - Remote record store client (Airtable REST)
//! - Configuration loading
//! - Error types
//! - Date utilities

pub mod airtable;
pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
