//! wfxml: declarative XML element model and script-filter result lists
//!
//! Layers, leaves first:
//! - [`domain`]: node-type declarations, element instances, XML serialization
//! - [`application`]: the result-list vocabulary, the builder façade and services
//! - [`infrastructure`]: I/O boundary traits and dependency wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
