//! External collaborator seams: frame acquisition, landmark detection,
//! and rendering. The decoding engine only ever sees `Frame` timestamps
//! and `FaceLandmarks`; everything behind these traits is replaceable.

use thiserror::Error;

use crate::landmarks::FaceLandmarks;
use crate::session::FrameOutput;

/// One captured video frame: wall-clock timestamp plus an optional
/// grayscale buffer (row-major, `width * height` bytes). Trace-driven
/// runs carry an empty buffer; pupil tracking then reports the neutral
/// ratio.
#[derive(Clone, Debug)]
pub struct Frame {
    pub timestamp_ms: f64,
    pub width: u32,
    pub height: u32,
    pub gray: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("frame source failure: {0}")]
    Source(String),
    #[error("landmark detection failure: {0}")]
    Landmarks(String),
}

/// Blocking producer of the frame stream. `Ok(None)` is a clean end of
/// stream; `Err` is a device failure and terminates the session.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError>;
}

/// Face detection + 68-point landmark extraction. `Ok(None)` means no
/// face this frame; the engine treats it as a no-op frame.
pub trait FaceLandmarkProvider {
    fn landmarks(&mut self, frame: &Frame) -> Result<Option<FaceLandmarks>, ProviderError>;
}

/// One-way display sink; never feeds information back into the core.
pub trait Renderer {
    fn render(&mut self, frame: &Frame, output: &FrameOutput);
}

/// Default renderer: emits state changes as log lines so a session
/// transcript is reproducible without any UI attached.
#[derive(Default)]
pub struct LogRenderer {
    last_message: String,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame, output: &FrameOutput) {
        if output.message != self.last_message {
            tracing::info!(
                timestamp_ms = frame.timestamp_ms,
                message = %output.message,
                sequence = %output.sequence,
                "decoded message updated"
            );
            self.last_message = output.message.clone();
        }
    }
}
