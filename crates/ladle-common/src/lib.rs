//! Common utilities for the ladle parser.
//!
//! This crate provides shared infrastructure used by all ladle components:
//! - **Warning System** - deduplicated, colored terminal output for recovered
//!   malformations in the input markup

pub mod warning;
