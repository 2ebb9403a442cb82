//! 会话状态与逐帧转移函数
//!
//! 把全部解码状态收拢进一个显式的 `Session` 结构，配置在构造时
//! 传入；`process_frame` 是纯粹的 (状态, 帧输入) → (新状态, 输出)
//! 转移函数，I/O 由外层驱动循环负责。这一分离使解码器可以在
//! 没有摄像头的情况下被完整测试。
//!
//! 时序一律使用帧携带的墙钟时间戳（毫秒），与帧率无关。

use std::collections::VecDeque;

use crate::blink::{BlinkDetector, BlinkEvent};
use crate::calibration::{Corner, GazeCalibrator};
use crate::config::EngineConfig;
use crate::ear::EarCalculator;
use crate::geometry::Point;
use crate::grid::{FlashMarker, GazeGridSelector, Selection};
use crate::landmarks::{EyeLandmarks, FaceLandmarks};
use crate::morse::{DecodedBoundary, MorseDecoder, MorseSymbol};
use crate::provider::Frame;
use crate::pupil::PupilTracker;

/// 解码模式，构造时确定
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// 眨眼时长 → 点划 → 摩尔斯字符
    Morse,
    /// 校准后的注视点 + 确认眨眼 → 栅格字母
    GazeGrid,
}

impl Mode {
    /// 配置字符串解析；未知值回退为摩尔斯模式
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gaze" | "gaze-grid" | "grid" => Self::GazeGrid,
            _ => Self::Morse,
        }
    }
}

/// 校准进度，随每帧输出供渲染层提示
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationStatus {
    /// 摩尔斯模式无需校准
    NotApplicable,
    /// 等待采集指定角
    Pending(Corner),
    Complete,
}

/// 一帧的全部输入
pub struct FrameInput<'a> {
    pub frame: &'a Frame,
    /// None 表示本帧未检测到人脸（SensorAbsence）
    pub landmarks: Option<&'a FaceLandmarks>,
    /// 外部“立即采集”校准触发
    pub capture_requested: bool,
}

/// 一帧的全部输出，单向交给渲染层
#[derive(Clone, Debug)]
pub struct FrameOutput {
    /// 当帧双眼平均 EAR；无人脸帧为 None
    pub ear: Option<f64>,
    /// 本帧完成的眨眼
    pub blink: Option<BlinkEvent>,
    /// 本帧追加的摩尔斯符号
    pub symbol: Option<MorseSymbol>,
    /// 本帧结算的字母/单词边界
    pub boundary: Option<DecodedBoundary>,
    /// 本帧的栅格选择
    pub selection: Option<Selection>,
    /// 平滑后的注视点（屏幕坐标）
    pub gaze_point: Option<Point>,
    /// 仍在高亮期内的选中标记
    pub flash: Option<FlashMarker>,
    pub calibration: CalibrationStatus,
    /// 当前点划串快照
    pub sequence: String,
    /// 解码消息快照
    pub message: String,
}

/// 解码会话
///
/// 拥有 EAR 计算器、眨眼检测器、两种模式各自的解码状态与
/// 只增不减的解码消息。单线程逐帧驱动，每帧恰好一次状态更新。
pub struct Session {
    mode: Mode,
    config: EngineConfig,
    ear: EarCalculator,
    pupil: PupilTracker,
    blink: BlinkDetector,
    morse: MorseDecoder,
    calibrator: GazeCalibrator,
    grid: GazeGridSelector,
    /// 原始注视比值的平滑缓冲（校准采样读取）
    raw_recent: VecDeque<Point>,
    message: String,
}

impl Session {
    pub fn new(mode: Mode, config: EngineConfig) -> Self {
        Self {
            mode,
            ear: EarCalculator::new(config.ear_threshold, config.ear_smooth_window),
            pupil: PupilTracker::default(),
            blink: BlinkDetector::new(config.ear_threshold, config.min_closed_frames),
            morse: MorseDecoder::new(
                config.dot_threshold_ms,
                config.letter_pause_ms,
                config.word_pause_ms,
            ),
            calibrator: GazeCalibrator::new(),
            grid: GazeGridSelector::new(
                config.grid_rows,
                config.grid_cols,
                config.smoothing_window,
            ),
            raw_recent: VecDeque::with_capacity(config.smoothing_window.max(1)),
            config,
            message: String::new(),
        }
    }

    /// 逐帧转移函数，会话状态唯一的变更入口
    pub fn process_frame(&mut self, input: FrameInput<'_>) -> FrameOutput {
        let now = input.frame.timestamp_ms;

        let Some(face) = input.landmarks else {
            // SensorAbsence：保留全部持久状态，不推进计时器，
            // 也不做边界检查（距上次眨眼的比较随人脸一同暂停）。
            return self.snapshot(now, None, None, None, None, None);
        };

        let left = face.left_eye();
        let right = face.right_eye();
        let ear = self.ear.update(&left, &right);
        let blink = self.blink.update(ear, now);

        let mut symbol = None;
        let mut boundary = None;
        let mut selection = None;

        match self.mode {
            Mode::Morse => {
                if let Some(ev) = &blink {
                    symbol = Some(self.morse.on_blink(ev));
                } else if let Some(b) = self.morse.on_idle(now) {
                    self.message.push(b.ch);
                    if b.word_break {
                        self.message.push(' ');
                    }
                    boundary = Some(b);
                }
            }
            Mode::GazeGrid => {
                let raw = self.raw_ratio(input.frame, &left, &right);
                self.push_raw(raw);

                match self.calibrator.rect().copied() {
                    None => {
                        // 硬性前置条件：校准未完成时凝视解码挂起
                        if input.capture_requested {
                            if let Some(smoothed) = self.smoothed_raw() {
                                self.calibrator.capture(smoothed);
                            }
                        }
                    }
                    Some(rect) => {
                        let width = input.frame.width as f64;
                        let height = input.frame.height as f64;
                        let mapped = rect.map(raw, width, height);
                        self.grid.push_gaze(mapped);

                        if blink.is_some() {
                            if let Some(sel) = self.grid.select(now, width, height) {
                                if let Some(ch) = sel.letter {
                                    self.message.push(ch);
                                }
                                selection = Some(sel);
                            }
                        }
                    }
                }
            }
        }

        self.snapshot(now, Some(ear), blink, symbol, boundary, selection)
    }

    /// 解码消息（只增不减）
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 诊断：统计窗口内的眨眼频率（次/分钟）
    pub fn blink_rate(&self, now_ms: f64) -> f64 {
        self.blink.blink_rate(now_ms)
    }

    /// 重置全部解码状态（消息一并清空，校准重新开始）
    pub fn reset(&mut self) {
        self.ear.reset();
        self.blink.reset();
        self.morse.reset();
        self.calibrator.reset();
        self.grid.reset();
        self.raw_recent.clear();
        self.message.clear();
    }

    /// 双眼注视比值取平均作为当帧原始比值
    fn raw_ratio(&self, frame: &Frame, left: &EyeLandmarks, right: &EyeLandmarks) -> Point {
        let l = self.pupil.gaze_ratio(frame, left);
        let r = self.pupil.gaze_ratio(frame, right);
        Point::new((l.x + r.x) / 2.0, (l.y + r.y) / 2.0)
    }

    fn push_raw(&mut self, raw: Point) {
        if self.raw_recent.len() == self.config.smoothing_window.max(1) {
            self.raw_recent.pop_front();
        }
        self.raw_recent.push_back(raw);
    }

    fn smoothed_raw(&self) -> Option<Point> {
        if self.raw_recent.is_empty() {
            return None;
        }
        let n = self.raw_recent.len() as f64;
        let sum_x: f64 = self.raw_recent.iter().map(|p| p.x).sum();
        let sum_y: f64 = self.raw_recent.iter().map(|p| p.y).sum();
        Some(Point::new(sum_x / n, sum_y / n))
    }

    fn calibration_status(&self) -> CalibrationStatus {
        match self.mode {
            Mode::Morse => CalibrationStatus::NotApplicable,
            Mode::GazeGrid => match self.calibrator.pending_corner() {
                Some(corner) => CalibrationStatus::Pending(corner),
                None => CalibrationStatus::Complete,
            },
        }
    }

    fn snapshot(
        &self,
        now_ms: f64,
        ear: Option<f64>,
        blink: Option<BlinkEvent>,
        symbol: Option<MorseSymbol>,
        boundary: Option<DecodedBoundary>,
        selection: Option<Selection>,
    ) -> FrameOutput {
        FrameOutput {
            ear,
            blink,
            symbol,
            boundary,
            selection,
            gaze_point: self.grid.smoothed(),
            flash: self.grid.active_flash(now_ms),
            calibration: self.calibration_status(),
            sequence: self.morse.sequence().to_string(),
            message: self.message.clone(),
        }
    }
}
