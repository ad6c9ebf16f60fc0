//! Library side of the `opreg` command-line reporter.

pub mod catalog;
pub mod cli;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod selection;
