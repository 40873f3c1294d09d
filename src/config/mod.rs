//! Configuration management
//!
//! This module handles the node and wallet server settings: network
//! addresses, mining parameters and peer timeouts.

pub mod settings;

pub use settings::Config;
