//! Core of the sticker relay: link parsing, command routing and conversion
//! dispatch.
//!
//! This crate is framework-agnostic. The chat network and the conversion
//! service live behind ports (traits) implemented in adapter crates.

pub mod command;
pub mod config;
pub mod conversion;
pub mod domain;
pub mod errors;
pub mod link;
pub mod logging;
pub mod messaging;
pub mod relay;

pub use errors::{Error, Result};
