//! # Voxel Painter Entry Point
//!
//! Calls into the library's `run()` function to load the configuration and start the
//! headless fly-through.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- config.json
//! ```

fn main() {
    voxel_painter::run();
}
