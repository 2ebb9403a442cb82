//! 面部关键点集合与眼部轮廓提取
//!
//! 采用 68 点固定解剖学标注：左眼轮廓为索引 36..42，右眼为 42..48，
//! 每只眼 6 个点，顺序为：外眼角、两个上眼睑点、内眼角、两个下眼睑点。

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};

/// 68 点标注中的眼部索引
pub mod face_indices {
    pub const LEFT_EYE_START: usize = 36;
    pub const LEFT_EYE_END: usize = 42;
    pub const RIGHT_EYE_START: usize = 42;
    pub const RIGHT_EYE_END: usize = 48;
}

/// 单帧面部关键点总数
pub const FACE_POINT_COUNT: usize = 68;

/// 单眼轮廓点数
pub const EYE_POINT_COUNT: usize = 6;

/// 一帧内检测到的完整 68 点面部关键点集
///
/// 构造时校验点数，之后按固定索引切取眼部轮廓。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    /// 点数不等于 68 时返回 None
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.len() == FACE_POINT_COUNT {
            Some(Self { points })
        } else {
            None
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// 左眼 6 点轮廓
    pub fn left_eye(&self) -> EyeLandmarks {
        self.eye(face_indices::LEFT_EYE_START)
    }

    /// 右眼 6 点轮廓
    pub fn right_eye(&self) -> EyeLandmarks {
        self.eye(face_indices::RIGHT_EYE_START)
    }

    fn eye(&self, start: usize) -> EyeLandmarks {
        let mut points = [Point::new(0.0, 0.0); EYE_POINT_COUNT];
        points.copy_from_slice(&self.points[start..start + EYE_POINT_COUNT]);
        EyeLandmarks { points }
    }
}

/// 单眼 6 点轮廓
///
/// `points[0]`/`points[3]` 为左右眼角（水平方向），
/// `points[1]`/`points[2]` 为上眼睑，`points[4]`/`points[5]` 为下眼睑。
#[derive(Clone, Copy, Debug)]
pub struct EyeLandmarks {
    pub points: [Point; EYE_POINT_COUNT],
}

impl EyeLandmarks {
    /// 眼部包围盒，用于瞳孔分割时的裁剪
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(&self.points).expect("eye contour is never empty")
    }
}
