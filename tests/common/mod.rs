#![allow(dead_code)]

//! Shared fixtures: synthetic faces, frames, and session drivers.

use eyetype::geometry::Point;
use eyetype::landmarks::{face_indices, FaceLandmarks, FACE_POINT_COUNT};
use eyetype::provider::Frame;
use eyetype::session::{FrameInput, FrameOutput, Session};

pub const FRAME_WIDTH: u32 = 900;
pub const FRAME_HEIGHT: u32 = 300;

/// Both eyes get a 4.0-wide contour with the given total lid opening:
/// EAR = vertical / 4.0.
pub fn face_with_eye_opening(vertical: f64) -> FaceLandmarks {
    let mut pts = vec![Point::new(0.0, 0.0); FACE_POINT_COUNT];
    for start in [face_indices::LEFT_EYE_START, face_indices::RIGHT_EYE_START] {
        pts[start] = Point::new(0.0, 0.0);
        pts[start + 1] = Point::new(1.0, -vertical / 2.0);
        pts[start + 2] = Point::new(3.0, -vertical / 2.0);
        pts[start + 3] = Point::new(4.0, 0.0);
        pts[start + 4] = Point::new(3.0, vertical / 2.0);
        pts[start + 5] = Point::new(1.0, vertical / 2.0);
    }
    FaceLandmarks::new(pts).unwrap()
}

/// EAR = 0.3, clearly above the 0.22 threshold.
pub fn open_face() -> FaceLandmarks {
    face_with_eye_opening(1.2)
}

/// EAR = 0.05, clearly below the 0.22 threshold.
pub fn closed_face() -> FaceLandmarks {
    face_with_eye_opening(0.2)
}

pub fn frame(timestamp_ms: f64) -> Frame {
    Frame {
        timestamp_ms,
        width: FRAME_WIDTH,
        height: FRAME_HEIGHT,
        gray: Vec::new(),
    }
}

pub fn step(session: &mut Session, ts: f64, face: Option<&FaceLandmarks>) -> FrameOutput {
    let f = frame(ts);
    session.process_frame(FrameInput {
        frame: &f,
        landmarks: face,
        capture_requested: false,
    })
}

pub fn step_capture(session: &mut Session, ts: f64, face: Option<&FaceLandmarks>) -> FrameOutput {
    let f = frame(ts);
    session.process_frame(FrameInput {
        frame: &f,
        landmarks: face,
        capture_requested: true,
    })
}

/// Drive a complete blink: closed frames every 50 ms spanning
/// `duration_ms`, then one open frame that releases the blink.
/// Returns the release-frame output.
pub fn blink(session: &mut Session, start_ms: f64, duration_ms: f64) -> FrameOutput {
    let closed = closed_face();
    let open = open_face();
    let mut t = start_ms;
    while t < start_ms + duration_ms {
        step(session, t, Some(&closed));
        t += 50.0;
    }
    step(session, start_ms + duration_ms, Some(&open))
}
