//! EAR (Eye Aspect Ratio) 计算模块
//!
//! 基于单眼 6 点轮廓计算眼部纵横比：
//! EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)
//!
//! EAR 值用于判断眼睛睁闭状态，是眨眼检测的输入信号。
//! 水平距离退化（p1 == p4）时按闭眼处理，返回 0.0 而不是报错。

use std::collections::VecDeque;

use crate::constants::GEOMETRY_EPSILON;
use crate::landmarks::EyeLandmarks;

const HISTORY_CAPACITY: usize = 100;

/// EAR 计算器
///
/// 每帧输入左右眼轮廓，输出双眼平均 EAR。
/// 维护有限长度的历史队列，提供滑动平均的平滑值用于诊断输出；
/// 阈值判定一律使用当帧原始值。
pub struct EarCalculator {
    /// EAR 阈值，低于此值视为闭眼
    threshold: f64,
    /// 历史 EAR 值，用于平滑
    history: VecDeque<f64>,
    /// 平滑窗口大小
    smooth_window: usize,
}

impl EarCalculator {
    /// # 参数
    /// - `threshold`: EAR 阈值，推荐 0.22
    /// - `smooth_window`: 平滑窗口大小，推荐 3
    pub fn new(threshold: f64, smooth_window: usize) -> Self {
        Self {
            threshold,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            smooth_window: smooth_window.max(1),
        }
    }

    /// 单眼 6 点 EAR
    ///
    /// - p1, p4: 眼角点（水平方向）
    /// - p2, p6: 上眼睑点
    /// - p3, p5: 下眼睑点
    pub fn eye_ear(eye: &EyeLandmarks) -> f64 {
        let [p1, p2, p3, p4, p5, p6] = eye.points;

        let horizontal = p1.distance(&p4);
        if horizontal < GEOMETRY_EPSILON {
            return 0.0;
        }

        let vertical1 = p2.distance(&p6);
        let vertical2 = p3.distance(&p5);
        (vertical1 + vertical2) / (2.0 * horizontal)
    }

    /// 双眼联合计算：分别计算左右眼 EAR 后取平均，仅入队一次
    pub fn update(&mut self, left: &EyeLandmarks, right: &EyeLandmarks) -> f64 {
        let ear = (Self::eye_ear(left) + Self::eye_ear(right)) / 2.0;
        self.push_history(ear);
        ear
    }

    /// 获取平滑后的 EAR 值（最近 N 帧移动平均）
    pub fn smoothed(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let window = self.history.len().min(self.smooth_window);
        let sum: f64 = self.history.iter().rev().take(window).sum();
        sum / window as f64
    }

    /// 基于平滑值判断眼睛是否闭合
    pub fn is_eye_closed(&self) -> bool {
        self.smoothed() < self.threshold
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 重置历史状态
    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn push_history(&mut self, ear: f64) {
        self.history.push_back(ear);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }
}
