mod common;

use std::io::Write;

use common::{closed_face, open_face};
use eyetype::config::EngineConfig;
use eyetype::provider::{FaceLandmarkProvider, FrameSource};
use eyetype::session::{FrameInput, Mode, Session};
use eyetype::trace::{write_trace, TraceFrame, TracePlayer};

/// The same loop the binary runs: pull, detect, transition.
fn run_to_end(player: &mut TracePlayer, session: &mut Session) {
    while let Some(frame) = player.next_frame().expect("trace frames") {
        let landmarks = player.landmarks(&frame).expect("trace landmarks");
        session.process_frame(FrameInput {
            frame: &frame,
            landmarks: landmarks.as_ref(),
            capture_requested: player.capture_requested(),
        });
    }
}

#[test]
fn at_recorded_morse_session_decodes_from_disk() {
    let open = open_face();
    let closed = closed_face();

    // One short blink (a dot), then a silence past the word pause:
    // "." resolves to "E " when the boundary fires.
    let frames = vec![
        TraceFrame::from_landmarks(0.0, &open),
        TraceFrame::from_landmarks(100.0, &closed),
        TraceFrame::from_landmarks(150.0, &closed),
        TraceFrame::from_landmarks(200.0, &open),
        TraceFrame::from_landmarks(6300.0, &open),
    ];

    let mut file = tempfile::NamedTempFile::new().expect("temp trace file");
    let mut encoded = Vec::new();
    write_trace(&mut encoded, &frames).expect("serialize trace");
    file.write_all(&encoded).expect("write trace");

    let mut player = TracePlayer::from_path(file.path(), 900, 300).expect("open trace");
    let mut session = Session::new(Mode::Morse, EngineConfig::default());
    run_to_end(&mut player, &mut session);

    assert_eq!(session.message(), "E ");
}

#[test]
fn at_recorded_gaze_session_calibrates_and_selects() {
    let open = open_face();
    let closed = closed_face();

    let capture = |ts: f64| TraceFrame {
        capture: true,
        ..TraceFrame::from_landmarks(ts, &open)
    };

    // Four capture triggers complete the (degenerate, neutral-ratio)
    // calibration; the confirmed blink then selects the centre cell.
    let frames = vec![
        capture(0.0),
        capture(200.0),
        capture(400.0),
        capture(600.0),
        TraceFrame::from_landmarks(1000.0, &open),
        TraceFrame::from_landmarks(1033.0, &closed),
        TraceFrame::from_landmarks(1066.0, &closed),
        TraceFrame::from_landmarks(1100.0, &open),
    ];

    let mut player = TracePlayer::from_frames(frames, 900, 300).expect("load frames");
    let cfg = EngineConfig {
        min_closed_frames: 2,
        ..EngineConfig::default()
    };
    let mut session = Session::new(Mode::GazeGrid, cfg);
    run_to_end(&mut player, &mut session);

    assert_eq!(session.message(), "N");
}

#[test]
fn at_no_face_frames_freeze_decoding() {
    let open = open_face();
    let closed = closed_face();

    // The dot is followed by a long face-lost gap; the boundary fires
    // only on the first frame where the face is back.
    let frames = vec![
        TraceFrame::from_landmarks(0.0, &open),
        TraceFrame::from_landmarks(100.0, &closed),
        TraceFrame::from_landmarks(200.0, &open),
        TraceFrame::absent(3000.0),
        TraceFrame::absent(9000.0),
        TraceFrame::from_landmarks(9100.0, &open),
    ];

    let mut player = TracePlayer::from_frames(frames, 900, 300).expect("load frames");
    let mut session = Session::new(Mode::Morse, EngineConfig::default());
    run_to_end(&mut player, &mut session);

    assert_eq!(session.message(), "E ");
}
