#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Painter
//!
//! A voxel world renderer with a software geometry pipeline.
//!
//! The world is streamed in 16×16×16 chunks around a first-person camera. Each chunk is
//! meshed into textured faces with hidden faces culled, and every frame the visible
//! triangles are transformed, back-face culled, clipped and depth sorted on the CPU into
//! a screen-space draw list ready for upload.
//!
//! ## Key Modules
//!
//! * `application_state` - Input handling and the frame loop driving the engine
//! * `engine_state` - Camera, configuration, math, rendering and the voxel world
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_painter::run();
//! }
//! ```
//!
//! Set `RUST_LOG=debug` to see per-frame pipeline statistics.

use std::env;

use log::{error, info};

pub mod application_state;
pub mod engine_state;

pub use application_state::{ApplicationState, RunOutcome};
pub use engine_state::config::{ConfigError, EngineConfig};
pub use engine_state::EngineState;

use engine_state::rendering::presentation::LoggingPresenter;

/// Loads the configuration named by the first argument, or the defaults without one.
fn load_config() -> EngineConfig {
    let Some(path) = env::args().nth(1) else {
        info!("No config file given, using defaults");
        return EngineConfig::default();
    };
    match EngineConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}; falling back to defaults");
            EngineConfig::default()
        }
    }
}

/// Runs the headless fly-through and logs what was drawn.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = load_config();
    let mut state = ApplicationState::new(&config);
    let mut presenter = LoggingPresenter::new();

    let outcome = state.run(&mut presenter);
    info!("Run finished: {:?}", outcome);
    presenter.log_summary();
}
