//! Filesystem-backed modules.

pub mod config;
