//! Covgen Core Library
//!
//! This crate provides the shared types, fixture template and error handling
//! for the covgen covert-channel fixture generator.

pub mod error;
pub mod packet;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use packet::PacketDescriptor;
pub use types::*;
