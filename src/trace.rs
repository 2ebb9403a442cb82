//! Recorded session traces: JSON Lines, one frame per line.
//!
//! A trace carries the wall-clock timestamp, the optional 68-point
//! landmark set, and the calibration capture flag for each frame:
//! exactly the inputs the decoding engine consumes. `TracePlayer`
//! implements both `FrameSource` and `FaceLandmarkProvider`, so a
//! recorded session can be decoded end-to-end without a camera.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;
use crate::landmarks::{FaceLandmarks, FACE_POINT_COUNT};
use crate::provider::{FaceLandmarkProvider, Frame, FrameSource, ProviderError};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trace line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("trace serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("trace line {line}: landmark set must have {expected} points, got {got}")]
    BadLandmarks {
        line: usize,
        expected: usize,
        got: usize,
    },
}

/// One recorded frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceFrame {
    pub timestamp_ms: f64,
    /// 68 landmark points as (x, y) pairs; absent = no face this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<[f64; 2]>>,
    /// External "capture now" calibration trigger.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub capture: bool,
}

impl TraceFrame {
    pub fn from_landmarks(timestamp_ms: f64, face: &FaceLandmarks) -> Self {
        Self {
            timestamp_ms,
            landmarks: Some(face.points().iter().map(|p| [p.x, p.y]).collect()),
            capture: false,
        }
    }

    pub fn absent(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            landmarks: None,
            capture: false,
        }
    }
}

/// Serialize frames as JSON Lines.
pub fn write_trace<W: Write>(mut writer: W, frames: &[TraceFrame]) -> Result<(), TraceError> {
    for frame in frames {
        let line = serde_json::to_string(frame)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[derive(Debug)]
struct LoadedFrame {
    timestamp_ms: f64,
    landmarks: Option<FaceLandmarks>,
    capture: bool,
}

/// Plays a recorded trace back as both frame source and landmark
/// provider. Frames carry an empty pixel buffer; pupil tracking falls
/// back to the neutral ratio, which is the documented best-effort path.
#[derive(Debug)]
pub struct TracePlayer {
    frames: VecDeque<LoadedFrame>,
    width: u32,
    height: u32,
    current_landmarks: Option<FaceLandmarks>,
    current_capture: bool,
}

impl TracePlayer {
    pub fn from_path(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Self::from_reader(file, width, height)
    }

    pub fn from_reader<R: Read>(reader: R, width: u32, height: u32) -> Result<Self, TraceError> {
        let mut frames = VecDeque::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: TraceFrame = serde_json::from_str(&line)
                .map_err(|source| TraceError::Parse { line: idx + 1, source })?;
            frames.push_back(Self::load_frame(raw, idx + 1)?);
        }
        Ok(Self {
            frames,
            width,
            height,
            current_landmarks: None,
            current_capture: false,
        })
    }

    pub fn from_frames(
        frames: impl IntoIterator<Item = TraceFrame>,
        width: u32,
        height: u32,
    ) -> Result<Self, TraceError> {
        let mut loaded = VecDeque::new();
        for (idx, raw) in frames.into_iter().enumerate() {
            loaded.push_back(Self::load_frame(raw, idx + 1)?);
        }
        Ok(Self {
            frames: loaded,
            width,
            height,
            current_landmarks: None,
            current_capture: false,
        })
    }

    fn load_frame(raw: TraceFrame, line: usize) -> Result<LoadedFrame, TraceError> {
        let landmarks = match raw.landmarks {
            None => None,
            Some(pairs) => {
                let got = pairs.len();
                let points: Vec<Point> =
                    pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect();
                Some(FaceLandmarks::new(points).ok_or(TraceError::BadLandmarks {
                    line,
                    expected: FACE_POINT_COUNT,
                    got,
                })?)
            }
        };
        Ok(LoadedFrame {
            timestamp_ms: raw.timestamp_ms,
            landmarks,
            capture: raw.capture,
        })
    }

    /// Calibration trigger recorded on the frame most recently returned
    /// by `next_frame`.
    pub fn capture_requested(&self) -> bool {
        self.current_capture
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for TracePlayer {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError> {
        match self.frames.pop_front() {
            None => {
                self.current_landmarks = None;
                self.current_capture = false;
                Ok(None)
            }
            Some(loaded) => {
                let frame = Frame {
                    timestamp_ms: loaded.timestamp_ms,
                    width: self.width,
                    height: self.height,
                    gray: Vec::new(),
                };
                self.current_landmarks = loaded.landmarks;
                self.current_capture = loaded.capture;
                Ok(Some(frame))
            }
        }
    }
}

impl FaceLandmarkProvider for TracePlayer {
    fn landmarks(&mut self, _frame: &Frame) -> Result<Option<FaceLandmarks>, ProviderError> {
        Ok(self.current_landmarks.clone())
    }
}
