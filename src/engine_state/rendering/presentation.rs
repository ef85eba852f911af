//! Presentation seam.
//!
//! Uploading the draw list and issuing the draw call belong to a platform layer that
//! lives outside this crate. Anything implementing [`Presenter`] can receive frames;
//! [`LoggingPresenter`] is the headless implementation used by the binary.

use log::{debug, info};

use super::pipeline::{DrawList, FrameStats};

/// Receives finished frames.
pub trait Presenter {
    /// Consumes one frame. Called once per rendered frame, in order.
    fn present(&mut self, frame: &DrawList, stats: &FrameStats);
}

/// Logs a summary of every frame and keeps running totals.
#[derive(Debug, Default)]
pub struct LoggingPresenter {
    frames: u64,
    triangles: u64,
    upload_bytes: usize,
}

impl LoggingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn triangles_presented(&self) -> u64 {
        self.triangles
    }

    /// Size of the vertex streams of the last frame as they would be uploaded.
    pub fn last_upload_bytes(&self) -> usize {
        self.upload_bytes
    }

    /// Logs the running totals at info level.
    pub fn log_summary(&self) {
        info!(
            "Presented {} frames, {} triangles",
            self.frames, self.triangles
        );
    }
}

impl Presenter for LoggingPresenter {
    fn present(&mut self, frame: &DrawList, stats: &FrameStats) {
        let positions: &[u8] = bytemuck::cast_slice(&frame.positions);
        let colors: &[u8] = bytemuck::cast_slice(&frame.colors);
        let tex_coords: &[u8] = bytemuck::cast_slice(&frame.tex_coords);
        self.upload_bytes = positions.len() + colors.len() + tex_coords.len();

        self.frames += 1;
        self.triangles += frame.triangle_count() as u64;
        debug!(
            "Frame {}: {} triangles ({} of {} submitted survived), {} bytes",
            self.frames,
            frame.triangle_count(),
            stats.output,
            stats.submitted,
            self.upload_bytes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_bytes() {
        let frame = DrawList {
            positions: vec![0.0; 9],
            colors: vec![[1.0; 3]],
            tex_coords: vec![0.0; 6],
        };
        let stats = FrameStats {
            submitted: 2,
            output: 1,
            ..Default::default()
        };
        let mut presenter = LoggingPresenter::new();
        presenter.present(&frame, &stats);
        presenter.present(&DrawList::default(), &FrameStats::default());
        assert_eq!(presenter.frames_presented(), 2);
        assert_eq!(presenter.triangles_presented(), 1);
        assert_eq!(presenter.last_upload_bytes(), 0);
    }
}
