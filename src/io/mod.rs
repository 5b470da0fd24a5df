//! Download and extraction plumbing for resolved assets.

pub mod download;
pub mod extract;
