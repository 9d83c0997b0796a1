//! Version command implementation

use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("minstall {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version (minimum): {}", minimum_rust_version());
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn minimum_rust_version() -> &'static str {
    // The crate's declared rust-version, not the compiling toolchain.
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
