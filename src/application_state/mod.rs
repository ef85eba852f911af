//! # Application State Management
//!
//! This module drives the engine frame by frame, including:
//! - Input handling through the [`InputManager`]
//! - The headless, scripted fly-through run by the binary
//! - Handing finished frames to a [`Presenter`]

pub mod input_manager;
pub mod input_state;

use log::{debug, info};
use web_time::{Duration, Instant};
use winit::keyboard::KeyCode;

use input_manager::InputManager;

use crate::engine_state::config::EngineConfig;
use crate::engine_state::rendering::presentation::Presenter;
use crate::engine_state::EngineState;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every scripted frame was rendered
    Completed {
        /// Frames rendered
        frames: u32,
    },
    /// Escape was pressed
    ExitRequested {
        /// Frames rendered before the exit
        frames: u32,
    },
}

/// One frame of scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScriptedFrame {
    /// Keys held during the frame
    pub keys: &'static [KeyCode],
    /// Mouse motion during the frame
    pub mouse_delta: Option<(f64, f64)>,
}

/// The fly-through: forward, a slow turn, a strafe and finally a climb.
///
/// The script is split into four equal phases over `total` frames.
pub fn fly_through(frame: u32, total: u32) -> ScriptedFrame {
    let phase = (frame as u64 * 4 / total.max(1) as u64) as u32;
    match phase {
        0 => ScriptedFrame {
            keys: &[KeyCode::KeyW],
            mouse_delta: None,
        },
        1 => ScriptedFrame {
            keys: &[KeyCode::KeyW],
            mouse_delta: Some((4.0, 0.5)),
        },
        2 => ScriptedFrame {
            keys: &[KeyCode::KeyA],
            mouse_delta: None,
        },
        _ => ScriptedFrame {
            keys: &[KeyCode::KeyW, KeyCode::Space],
            mouse_delta: Some((-2.0, -0.5)),
        },
    }
}

/// The application state container that manages the engine's lifecycle.
///
/// Without a window, input comes from a script. Key transitions are still fed through
/// the [`InputManager`] so the engine sees the same processed snapshots a windowing
/// layer would produce.
pub struct ApplicationState {
    /// The core engine state and logic
    pub engine_state: EngineState,
    /// Manages input state and event processing
    pub input_manager: InputManager,
    /// Keys held in the previous scripted frame
    held: &'static [KeyCode],
    frames: u32,
    frame_time: Duration,
}

impl ApplicationState {
    /// Builds the engine from `config`.
    pub fn new(config: &EngineConfig) -> Self {
        ApplicationState {
            engine_state: EngineState::new(config),
            input_manager: InputManager::new(),
            held: &[],
            frames: config.script.frames,
            frame_time: Duration::from_millis(config.script.frame_millis),
        }
    }

    /// Feeds one scripted frame of input into the input manager.
    fn intake_scripted_frame(&mut self, frame: ScriptedFrame) {
        for key in self.held {
            if !frame.keys.contains(key) {
                self.input_manager.intake_key(*key, false);
            }
        }
        for key in frame.keys {
            self.input_manager.intake_key(*key, true);
        }
        if let Some(delta) = frame.mouse_delta {
            self.input_manager.intake_mouse_motion(delta);
        }
        self.held = frame.keys;
    }

    /// Runs one frame: input, world update, render and present.
    ///
    /// # Returns
    /// `true` if the application should exit.
    pub fn step(&mut self, frame: ScriptedFrame, presenter: &mut dyn Presenter) -> bool {
        self.intake_scripted_frame(frame);
        let input = self.input_manager.get_and_reset_processed_input();
        if self.engine_state.process_input(&input, self.frame_time) {
            return true;
        }

        let streaming = self.engine_state.update();
        if streaming.loaded + streaming.unloaded > 0 {
            debug!(
                "Streaming: {} loaded, {} unloaded",
                streaming.loaded, streaming.unloaded
            );
        }

        self.engine_state.render();
        let stats = self.engine_state.frame_stats();
        presenter.present(self.engine_state.renderer.pipeline.draw_list(), &stats);
        false
    }

    /// Runs the scripted fly-through to completion or until exit is requested.
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> RunOutcome {
        self.run_script(fly_through, presenter)
    }

    /// Runs `script` for the configured number of frames.
    pub fn run_script(
        &mut self,
        script: impl Fn(u32, u32) -> ScriptedFrame,
        presenter: &mut dyn Presenter,
    ) -> RunOutcome {
        let start = Instant::now();
        let total = self.frames;
        for frame in 0..total {
            if self.step(script(frame, total), presenter) {
                info!("Exit requested after {} frames", frame);
                return RunOutcome::ExitRequested { frames: frame };
            }
        }
        info!("Rendered {} frames in {:?}", total, start.elapsed());
        RunOutcome::Completed { frames: total }
    }
}
