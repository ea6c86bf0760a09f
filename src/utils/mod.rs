//! Shared utilities

pub mod normalize;
