//! Command-line interface for the wallet
//!
//! Command handlers used by the `quorum` binary.

pub mod commands;

pub use commands::{check, demo, keygen, sign, CliResult};
