//! bulkloader: stream pre-built data files into a running cluster.
//!
//! The binary owns nothing but the process boundary; option resolution and
//! validation live in the library crate.

use std::process::ExitCode;

fn main() -> ExitCode {
    bulkloader::cli::run()
}
