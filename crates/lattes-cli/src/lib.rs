//! lattes-cli: configuration and command implementations for the `lattes`
//! binary.

pub mod commands;
pub mod config;
