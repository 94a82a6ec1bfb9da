//! Chess rules engine with a terminal front-end.
//!
//! The board is a flat array of 64 squares. Legal moves are produced by
//! generating pseudo-legal moves per piece and discarding the ones after which
//! the opponent could capture the king.

pub mod chess;
pub mod interface;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version and the build type on startup.
pub fn print_engine_info() {
    println!("ply chess {}", engine_version());
    if shadow_rs::is_debug() {
        println!("Debug build: move generation is slow");
    }
    println!();
}
