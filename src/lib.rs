//! Personal journal for mood, energy and engagement.
//! Entries and activities are kept in a small local key-value store, everything else is derived
//! from them on demand.
//!

pub mod cli;
pub mod journal;
pub mod metrics;
pub mod storage;
pub mod utils;
