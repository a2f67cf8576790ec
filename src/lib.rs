//! Cursor-driven particle swarms, rendered two ways.

pub mod config;
pub mod gpu;
pub mod sim;
