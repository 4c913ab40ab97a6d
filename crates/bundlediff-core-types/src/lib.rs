//! Core types shared across bundlediff facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! facility and by every crate that emits structured operation events.

pub mod schema;
