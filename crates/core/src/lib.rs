//! Core types and configuration for the flowgate system.
//!
//! This crate provides shared types used across all other crates:
//! - Trade and product-category types
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{BufferConfig, ChannelLimits, SimConfig, Strategy};
pub use error::{Error, Result};
pub use types::*;
