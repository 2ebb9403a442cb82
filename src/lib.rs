//! eyetype: 眨眼摩尔斯与注视栅格打字解码引擎
//!
//! 把逐帧的眼部纵横比（EAR）与注视位置信号解码为离散符号输出：
//! 摩尔斯字符，或屏幕栅格中直接选中的字母。人脸检测、取帧与
//! 渲染均为外部协作者（`provider` 模块的 trait），核心只消费
//! 关键点坐标和帧时间戳。
//!
//! ## 模块
//! - `ear`: EAR (Eye Aspect Ratio) 眼部纵横比计算
//! - `pupil`: 瞳孔定位与注视比值
//! - `blink`: 眨眼检测状态机（含去抖变体）
//! - `morse`: 摩尔斯时序解码
//! - `calibration`: 四点视线校准
//! - `grid`: 注视栅格字母选择
//! - `session`: 会话状态与逐帧转移函数
//! - `provider` / `trace`: 外部协作者接口与轨迹回放

pub mod blink;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod ear;
pub mod geometry;
pub mod grid;
pub mod landmarks;
pub mod logging;
pub mod morse;
pub mod provider;
pub mod pupil;
pub mod session;
pub mod trace;

// 重新导出核心类型，方便外部使用
pub use blink::{BlinkDetector, BlinkEvent};
pub use calibration::GazeCalibrator;
pub use config::{Config, EngineConfig};
pub use ear::EarCalculator;
pub use grid::GazeGridSelector;
pub use morse::MorseDecoder;
pub use session::{FrameInput, FrameOutput, Mode, Session};
