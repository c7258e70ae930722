//! CLI command implementations for peerlens.

pub mod run;
