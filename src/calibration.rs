//! 视线校准模块
//!
//! 四点校准协议，严格按 左上 → 右上 → 左下 → 右下 顺序采集。
//! 外部触发“立即采集”时记录当前平滑注视比值并推进到下一角；
//! 四角采齐后取各轴最小/最大值构成校准矩形，即原始比值到屏幕
//! 坐标的线性映射，整个会话期间有效。
//!
//! 校准未完成时下游凝视解码必须挂起，这是硬性前置条件。

use crate::constants::GEOMETRY_EPSILON;
use crate::geometry::Point;

/// 校准角，按采集顺序排列
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// 采集顺序
    pub const ORDER: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// 日志与提示用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// 单个校准样本
#[derive(Clone, Copy, Debug)]
pub struct CalibrationSample {
    pub corner: Corner,
    pub ratio: Point,
}

/// 校准矩形：四个样本各轴的最小/最大比值
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationRect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CalibrationRect {
    fn from_samples(samples: &[CalibrationSample]) -> Self {
        let xs = samples.iter().map(|s| s.ratio.x);
        let ys = samples.iter().map(|s| s.ratio.y);
        Self {
            min_x: xs.clone().fold(f64::INFINITY, f64::min),
            max_x: xs.fold(f64::NEG_INFINITY, f64::max),
            min_y: ys.clone().fold(f64::INFINITY, f64::min),
            max_y: ys.fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// 原始比值 → 屏幕坐标
    ///
    /// mapped = (raw − min) / (max − min) × dim，截断到 [0, dim−1]。
    /// 轴退化（max == min，例如两角注视比值相同）时回退为
    /// raw × dim，避免除零。
    pub fn map(&self, raw: Point, frame_width: f64, frame_height: f64) -> Point {
        Point::new(
            map_axis(raw.x, self.min_x, self.max_x, frame_width),
            map_axis(raw.y, self.min_y, self.max_y, frame_height),
        )
    }
}

fn map_axis(raw: f64, min: f64, max: f64, dim: f64) -> f64 {
    let span = max - min;
    let mapped = if span.abs() < GEOMETRY_EPSILON {
        raw * dim
    } else {
        (raw - min) / span * dim
    };
    mapped.clamp(0.0, (dim - 1.0).max(0.0))
}

/// 视线校准器
///
/// 状态：{待采集角索引, 已采样本}；采齐四角后持有校准矩形。
pub struct GazeCalibrator {
    samples: Vec<CalibrationSample>,
    rect: Option<CalibrationRect>,
}

impl Default for GazeCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl GazeCalibrator {
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(Corner::ORDER.len()),
            rect: None,
        }
    }

    /// 待采集的角；校准完成后为 None
    pub fn pending_corner(&self) -> Option<Corner> {
        Corner::ORDER.get(self.samples.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.rect.is_some()
    }

    /// 外部触发采集：记录当前平滑注视比值，推进到下一角。
    /// 返回本次记录的角；校准已完成时为 None（触发被忽略）。
    pub fn capture(&mut self, ratio: Point) -> Option<Corner> {
        let corner = self.pending_corner()?;
        self.samples.push(CalibrationSample { corner, ratio });
        tracing::info!(
            corner = corner.as_str(),
            ratio_x = ratio.x,
            ratio_y = ratio.y,
            "calibration sample captured"
        );

        if self.samples.len() == Corner::ORDER.len() {
            let rect = CalibrationRect::from_samples(&self.samples);
            tracing::info!(
                min_x = rect.min_x,
                max_x = rect.max_x,
                min_y = rect.min_y,
                max_y = rect.max_y,
                "calibration complete"
            );
            self.rect = Some(rect);
        }
        Some(corner)
    }

    pub fn rect(&self) -> Option<&CalibrationRect> {
        self.rect.as_ref()
    }

    /// 丢弃全部样本重新开始
    pub fn reset(&mut self) {
        self.samples.clear();
        self.rect = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated(corners: [(f64, f64); 4]) -> GazeCalibrator {
        let mut cal = GazeCalibrator::new();
        for (x, y) in corners {
            cal.capture(Point::new(x, y));
        }
        cal
    }

    #[test]
    fn corners_are_captured_in_strict_order() {
        let mut cal = GazeCalibrator::new();
        assert_eq!(cal.pending_corner(), Some(Corner::TopLeft));
        assert_eq!(cal.capture(Point::new(0.1, 0.1)), Some(Corner::TopLeft));
        assert_eq!(cal.pending_corner(), Some(Corner::TopRight));
        assert_eq!(cal.capture(Point::new(0.9, 0.1)), Some(Corner::TopRight));
        assert_eq!(cal.capture(Point::new(0.1, 0.9)), Some(Corner::BottomLeft));
        assert!(!cal.is_complete());
        assert_eq!(cal.capture(Point::new(0.9, 0.9)), Some(Corner::BottomRight));
        assert!(cal.is_complete());
        // 完成后再触发被忽略
        assert_eq!(cal.capture(Point::new(0.5, 0.5)), None);
    }

    #[test]
    fn rect_is_per_axis_min_max() {
        let cal = calibrated([(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)]);
        let rect = cal.rect().unwrap();
        assert_eq!(rect.min_x, 0.1);
        assert_eq!(rect.max_x, 0.9);
        assert_eq!(rect.min_y, 0.1);
        assert_eq!(rect.max_y, 0.9);
    }

    #[test]
    fn center_ratio_maps_to_frame_midpoint() {
        let cal = calibrated([(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)]);
        let mapped = cal.rect().unwrap().map(Point::new(0.5, 0.5), 900.0, 300.0);
        assert!((mapped.x - 450.0).abs() < 1e-9);
        assert!((mapped.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn mapping_clamps_to_frame_bounds() {
        let cal = calibrated([(0.2, 0.2), (0.8, 0.2), (0.2, 0.8), (0.8, 0.8)]);
        let rect = cal.rect().unwrap();
        let low = rect.map(Point::new(0.0, 0.0), 900.0, 300.0);
        let high = rect.map(Point::new(1.0, 1.0), 900.0, 300.0);
        assert_eq!(low, Point::new(0.0, 0.0));
        assert_eq!(high, Point::new(899.0, 299.0));
    }

    #[test]
    fn degenerate_axis_falls_back_to_passthrough() {
        // 受试者四角的 x 比值完全相同 → x 轴退化
        let cal = calibrated([(0.5, 0.1), (0.5, 0.1), (0.5, 0.9), (0.5, 0.9)]);
        let mapped = cal.rect().unwrap().map(Point::new(0.5, 0.5), 900.0, 300.0);
        assert!((mapped.x - 450.0).abs() < 1e-9);
        assert!((mapped.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn reset_restarts_protocol() {
        let mut cal = calibrated([(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)]);
        cal.reset();
        assert!(!cal.is_complete());
        assert_eq!(cal.pending_corner(), Some(Corner::TopLeft));
    }
}
