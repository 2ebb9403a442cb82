//! 全局默认参数
//!
//! 每个可配置项的默认值与含义，环境变量覆盖见 `config.rs`。

/// EAR 阈值，双眼平均 EAR 低于此值视为闭眼
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.22;

/// EAR 平滑窗口大小（帧），用于诊断输出，不参与阈值判定
pub const DEFAULT_EAR_SMOOTH_WINDOW: usize = 3;

/// 点划分界（毫秒）：眨眼时长小于此值为点，否则为划
pub const DEFAULT_DOT_THRESHOLD_MS: f64 = 300.0;

/// 字母边界停顿（毫秒）：距上次眨眼超过此值则结算当前符号序列为一个字母
pub const DEFAULT_LETTER_PAUSE_MS: f64 = 2000.0;

/// 单词边界停顿（毫秒）：优先于字母边界判定，结算字母并追加空格
pub const DEFAULT_WORD_PAUSE_MS: f64 = 5000.0;

/// 注视点平滑窗口（样本数），固定容量 FIFO
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// 栅格行数（3×9 = 27 格 ≥ 26 个字母，末格空置）
pub const DEFAULT_GRID_ROWS: u32 = 3;

/// 栅格列数
pub const DEFAULT_GRID_COLS: u32 = 9;

/// 凝视打字模式下确认一次眨眼所需的最少连续闭眼帧数
pub const DEFAULT_GAZE_MIN_CLOSED_FRAMES: u32 = 2;

/// 摩尔斯模式不去抖：任何一次闭合-释放都参与时长分类
pub const DEFAULT_MORSE_MIN_CLOSED_FRAMES: u32 = 1;

/// 选中单元格高亮时长（毫秒），仅供渲染层使用
pub const FLASH_DURATION_MS: f64 = 500.0;

/// 瞳孔分割：暗区强度边际，阈值 = 眼部裁剪区最暗值 + 此边际
pub const PUPIL_INTENSITY_MARGIN: u8 = 15;

/// 眨眼频率统计窗口（毫秒）
pub const BLINK_RATE_WINDOW_MS: f64 = 60_000.0;

/// 几何退化判定阈值：水平距离或校准区间小于此值时走退化分支
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// 回放轨迹时的默认帧宽（像素）
pub const DEFAULT_FRAME_WIDTH: u32 = 640;

/// 回放轨迹时的默认帧高（像素）
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;
