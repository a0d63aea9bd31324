//! Language-specific helpers.

pub mod jpn;
