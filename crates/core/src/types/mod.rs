//! Core types for Jungle.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;

pub use email::{EmailError, NormalizedEmail};
pub use id::*;
