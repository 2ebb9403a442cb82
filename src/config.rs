use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::session::Mode;

/// Process configuration, loaded from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub mode: Mode,
    pub trace_path: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub engine: EngineConfig,
}

/// Decoding engine options. Each field maps to one env var; see
/// `constants.rs` for defaults and meaning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ear_threshold: f64,
    pub ear_smooth_window: usize,
    pub min_closed_frames: u32,
    pub dot_threshold_ms: f64,
    pub letter_pause_ms: f64,
    pub word_pause_ms: f64,
    pub smoothing_window: usize,
    pub grid_rows: u32,
    pub grid_cols: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ear_threshold: DEFAULT_EAR_THRESHOLD,
            ear_smooth_window: DEFAULT_EAR_SMOOTH_WINDOW,
            min_closed_frames: DEFAULT_MORSE_MIN_CLOSED_FRAMES,
            dot_threshold_ms: DEFAULT_DOT_THRESHOLD_MS,
            letter_pause_ms: DEFAULT_LETTER_PAUSE_MS,
            word_pause_ms: DEFAULT_WORD_PAUSE_MS,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_cols: DEFAULT_GRID_COLS,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Morse => write!(f, "morse"),
            Mode::GazeGrid => write!(f, "gaze"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mode = Mode::parse(&env_or("MODE", "morse"));
        // The debounced blink variant belongs to the gaze front-end;
        // Morse classifies every closure by duration instead.
        let default_min_closed = match mode {
            Mode::Morse => DEFAULT_MORSE_MIN_CLOSED_FRAMES,
            Mode::GazeGrid => DEFAULT_GAZE_MIN_CLOSED_FRAMES,
        };
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            mode,
            trace_path: env_or("TRACE_PATH", "./session.trace.jsonl"),
            frame_width: env_or_parse("FRAME_WIDTH", DEFAULT_FRAME_WIDTH),
            frame_height: env_or_parse("FRAME_HEIGHT", DEFAULT_FRAME_HEIGHT),
            engine: EngineConfig {
                ear_threshold: env_or_parse("EAR_THRESHOLD", DEFAULT_EAR_THRESHOLD),
                ear_smooth_window: env_or_parse("EAR_SMOOTH_WINDOW", DEFAULT_EAR_SMOOTH_WINDOW),
                min_closed_frames: env_or_parse("MIN_CLOSED_FRAMES", default_min_closed),
                dot_threshold_ms: env_or_parse("DOT_THRESHOLD_MS", DEFAULT_DOT_THRESHOLD_MS),
                letter_pause_ms: env_or_parse("LETTER_PAUSE_MS", DEFAULT_LETTER_PAUSE_MS),
                word_pause_ms: env_or_parse("WORD_PAUSE_MS", DEFAULT_WORD_PAUSE_MS),
                smoothing_window: env_or_parse("SMOOTHING_WINDOW", DEFAULT_SMOOTHING_WINDOW),
                grid_rows: env_or_parse("GRID_ROWS", DEFAULT_GRID_ROWS),
                grid_cols: env_or_parse("GRID_COLS", DEFAULT_GRID_COLS),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
