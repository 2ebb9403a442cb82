//! 眨眼检测模块
//!
//! 两状态有限状态机：Open（睁眼）↔ Closed（闭眼，记录起始时刻）。
//! 双眼平均 EAR 跌破阈值进入 Closed，回升到阈值之上时释放，
//! 产生一个带起止时刻和时长的 `BlinkEvent`。
//!
//! 去抖变体：Closed 期间每帧累加连续闭眼帧计数，释放时计数未达到
//! 配置下限的闭合按噪声丢弃（用于凝视打字模式抑制眼睑颤动）。
//! 摩尔斯模式下限取 1，即任何一次闭合-释放都成为事件。

use std::collections::VecDeque;

use crate::constants::BLINK_RATE_WINDOW_MS;

/// 一次完整的眨眼
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlinkEvent {
    /// 闭眼起始时刻（毫秒）
    pub start_ms: f64,
    /// 释放时刻（毫秒）
    pub end_ms: f64,
    /// 闭眼时长（毫秒）
    pub duration_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EyeState {
    Open,
    Closed { start_ms: f64 },
}

/// 眨眼检测器
///
/// 每帧一次 `update`，无阻塞；持久状态仅 {当前状态, 起始时刻, 计数}
/// 外加一个 60 秒的眨眼统计窗口（诊断用，不影响解码）。
pub struct BlinkDetector {
    /// EAR 阈值，低于此值视为闭眼
    ear_threshold: f64,
    /// 确认一次眨眼所需的最少连续闭眼帧数（1 = 不去抖）
    min_closed_frames: u32,
    state: EyeState,
    closed_frames: u32,
    recent: VecDeque<f64>,
    window_ms: f64,
}

impl BlinkDetector {
    /// # 参数
    /// - `ear_threshold`: EAR 阈值，推荐 0.22
    /// - `min_closed_frames`: 最少连续闭眼帧数；0 按 1 处理
    pub fn new(ear_threshold: f64, min_closed_frames: u32) -> Self {
        Self {
            ear_threshold,
            min_closed_frames: min_closed_frames.max(1),
            state: EyeState::Open,
            closed_frames: 0,
            recent: VecDeque::new(),
            window_ms: BLINK_RATE_WINDOW_MS,
        }
    }

    /// 输入当帧双眼平均 EAR 和时间戳，闭合释放且通过去抖时返回事件
    pub fn update(&mut self, ear: f64, timestamp_ms: f64) -> Option<BlinkEvent> {
        let mut event = None;

        match self.state {
            EyeState::Open => {
                if ear < self.ear_threshold {
                    self.state = EyeState::Closed {
                        start_ms: timestamp_ms,
                    };
                    self.closed_frames = 1;
                }
            }
            EyeState::Closed { start_ms } => {
                if ear < self.ear_threshold {
                    self.closed_frames += 1;
                } else {
                    if self.closed_frames >= self.min_closed_frames {
                        let blink = BlinkEvent {
                            start_ms,
                            end_ms: timestamp_ms,
                            duration_ms: timestamp_ms - start_ms,
                        };
                        self.recent.push_back(timestamp_ms);
                        event = Some(blink);
                    }
                    // 无论是否达标，释放时计数归零
                    self.closed_frames = 0;
                    self.state = EyeState::Open;
                }
            }
        }

        let cutoff = timestamp_ms - self.window_ms;
        while let Some(&front) = self.recent.front() {
            if front < cutoff {
                self.recent.pop_front();
            } else {
                break;
            }
        }

        event
    }

    /// 是否正处于闭眼状态
    pub fn is_closed(&self) -> bool {
        matches!(self.state, EyeState::Closed { .. })
    }

    /// 统计窗口内的眨眼次数
    pub fn blink_count(&self) -> usize {
        self.recent.len()
    }

    /// 眨眼频率（次/分钟）；窗口覆盖不足 10 秒时返回 0
    pub fn blink_rate(&self, now_ms: f64) -> f64 {
        let first = match self.recent.front() {
            Some(&ts) => ts,
            None => return 0.0,
        };
        let elapsed_ms = now_ms - first;
        if elapsed_ms < 10_000.0 {
            return 0.0;
        }
        self.recent.len() as f64 / (elapsed_ms / 60_000.0)
    }

    /// 重置检测器状态
    pub fn reset(&mut self) {
        self.state = EyeState::Open;
        self.closed_frames = 0;
        self.recent.clear();
    }
}
