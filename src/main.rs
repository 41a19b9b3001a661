//! jarpack - native packaging for Java applications.
//!
//! Reads a packaging task from `jarpack.toml`, builds the platform app
//! bundle and generates the configured installer artifacts.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match jarpack::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    process::exit(exit_code);
}
