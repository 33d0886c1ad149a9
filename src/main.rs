//! vibegate CLI binary
//!
//! Minimal entrypoint: all logic is in the library; main.rs only maps the
//! result of cli::run() to a process exit code.

fn main() {
    // cli::run() handles ALL output including errors
    if let Err(code) = vibegate::cli::run() {
        std::process::exit(code);
    }
}
