//! 瞳孔定位模块
//!
//! 在灰度帧的眼部包围盒内分割最暗区域，取其质心作为瞳孔位置，
//! 归一化到包围盒内 [0,1]² 作为注视比值（gaze ratio）。
//!
//! 流程：裁剪 → 均值模糊 → 按“最暗值 + 边际”二值化 → 暗区质心。
//! 注视输入是尽力而为的：裁剪区为空、帧无像素数据或找不到暗区时
//! 一律返回中性比值 (0.5, 0.5)，绝不让流水线崩溃。

use crate::constants::PUPIL_INTENSITY_MARGIN;
use crate::geometry::Point;
use crate::landmarks::EyeLandmarks;
use crate::provider::Frame;

/// 中性注视比值，找不到瞳孔时的回退值
pub const NEUTRAL_RATIO: Point = Point { x: 0.5, y: 0.5 };

/// 瞳孔定位器
pub struct PupilTracker {
    /// 暗区强度边际：阈值 = 裁剪区最暗值 + margin
    intensity_margin: u8,
}

impl Default for PupilTracker {
    fn default() -> Self {
        Self::new(PUPIL_INTENSITY_MARGIN)
    }
}

impl PupilTracker {
    pub fn new(intensity_margin: u8) -> Self {
        Self { intensity_margin }
    }

    /// 计算单眼注视比值
    pub fn gaze_ratio(&self, frame: &Frame, eye: &EyeLandmarks) -> Point {
        let expected = frame.width as usize * frame.height as usize;
        if expected == 0 || frame.gray.len() != expected {
            return NEUTRAL_RATIO;
        }

        let bb = eye.bounding_box();
        let x0 = (bb.min_x.floor().max(0.0) as u32).min(frame.width.saturating_sub(1));
        let y0 = (bb.min_y.floor().max(0.0) as u32).min(frame.height.saturating_sub(1));
        let x1 = (bb.max_x.ceil().max(0.0) as u32).min(frame.width);
        let y1 = (bb.max_y.ceil().max(0.0) as u32).min(frame.height);
        if x1 <= x0 || y1 <= y0 {
            return NEUTRAL_RATIO;
        }

        let w = (x1 - x0) as usize;
        let h = (y1 - y0) as usize;
        let mut crop = Vec::with_capacity(w * h);
        for y in y0..y1 {
            let row = (y * frame.width + x0) as usize;
            crop.extend_from_slice(&frame.gray[row..row + w]);
        }

        let blurred = box_blur(&crop, w, h);
        let darkest = match blurred.iter().min() {
            Some(&v) => v,
            None => return NEUTRAL_RATIO,
        };
        let threshold = darkest.saturating_add(self.intensity_margin);

        let mut count = 0usize;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for (i, &v) in blurred.iter().enumerate() {
            if v <= threshold {
                count += 1;
                sum_x += (i % w) as f64;
                sum_y += (i / w) as f64;
            }
        }
        if count == 0 {
            return NEUTRAL_RATIO;
        }

        Point::new(
            normalize(sum_x / count as f64, w),
            normalize(sum_y / count as f64, h),
        )
    }
}

/// 像素坐标归一化到 [0,1]；单像素维度无方向信息，取 0.5
fn normalize(coord: f64, dim: usize) -> f64 {
    if dim > 1 {
        (coord / (dim - 1) as f64).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// 3×3 均值模糊，边缘取有效邻域平均
fn box_blur(src: &[u8], w: usize, h: usize) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            let mut n = 0u32;
            for dy in y.saturating_sub(1)..(y + 2).min(h) {
                for dx in x.saturating_sub(1)..(x + 2).min(w) {
                    sum += src[dy * w + dx] as u32;
                    n += 1;
                }
            }
            out[y * w + x] = (sum / n) as u8;
        }
    }
    out
}
