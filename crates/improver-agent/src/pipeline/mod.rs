//! Shared message pipeline: one channel-agnostic improvement turn.
//!
//! Channel adapters call `improve_text` and only add their own rendering and
//! delivery on top.

pub mod process;

pub use process::{complete, improve_text};
