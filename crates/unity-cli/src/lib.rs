//! unity-cli: command-line front end for `unity-core`.
pub mod commands;
pub mod config;
