//! 视线栅格选择模块
//!
//! 把整帧划分为 rows×cols 个互不重叠的单元格（默认 3×9 = 27 格），
//! 按行主序依次绑定 26 个字母，末格空置。映射后的注视点先经
//! 固定容量 FIFO 做滑动平均抑制抖动，再按整除落格；确认眨眼时
//! 取出当前格的字母。
//!
//! 选中后的“闪烁”标记只为反馈渲染服务，不影响解码正确性。

use std::collections::VecDeque;

use crate::constants::FLASH_DURATION_MS;
use crate::geometry::Point;

/// 栅格字母表，行主序绑定
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// 栅格单元 (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

/// 选中反馈标记：{选中格, 选中时刻}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashMarker {
    pub cell: GridCell,
    pub at_ms: f64,
}

impl FlashMarker {
    /// 高亮是否仍应渲染
    pub fn is_visible(&self, now_ms: f64) -> bool {
        now_ms - self.at_ms < FLASH_DURATION_MS
    }
}

/// 一次确认眨眼产生的选择
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub cell: GridCell,
    /// 线性索引超出字母表时为 None，不追加任何字符
    pub letter: Option<char>,
}

/// 视线栅格选择器
pub struct GazeGridSelector {
    rows: u32,
    cols: u32,
    /// 最近的映射注视点，固定容量 FIFO，溢出时逐出最旧样本
    recent: VecDeque<Point>,
    smoothing_window: usize,
    flash: Option<FlashMarker>,
}

impl GazeGridSelector {
    /// # 参数
    /// - `rows`/`cols`: 栅格行列数，推荐 3×9
    /// - `smoothing_window`: 滑动平均窗口（样本数），推荐 5
    pub fn new(rows: u32, cols: u32, smoothing_window: usize) -> Self {
        let window = smoothing_window.max(1);
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            recent: VecDeque::with_capacity(window),
            smoothing_window: window,
            flash: None,
        }
    }

    /// 压入一个映射后的注视点
    pub fn push_gaze(&mut self, mapped: Point) {
        if self.recent.len() == self.smoothing_window {
            self.recent.pop_front();
        }
        self.recent.push_back(mapped);
    }

    /// 滑动平均后的注视点；尚无样本时为 None
    pub fn smoothed(&self) -> Option<Point> {
        if self.recent.is_empty() {
            return None;
        }
        let n = self.recent.len() as f64;
        let sum_x: f64 = self.recent.iter().map(|p| p.x).sum();
        let sum_y: f64 = self.recent.iter().map(|p| p.y).sum();
        Some(Point::new(sum_x / n, sum_y / n))
    }

    /// 注视点所在单元格（整除落格，帧边缘截断到末行/末列）
    pub fn cell_at(&self, point: Point, frame_width: f64, frame_height: f64) -> GridCell {
        let cell_w = frame_width / self.cols as f64;
        let cell_h = frame_height / self.rows as f64;
        let col = ((point.x / cell_w) as u32).min(self.cols - 1);
        let row = ((point.y / cell_h) as u32).min(self.rows - 1);
        GridCell { row, col }
    }

    /// 单元格绑定的字母；行主序索引越界（如 3×9 的第 27 格）为 None
    pub fn letter(&self, cell: GridCell) -> Option<char> {
        let index = (cell.row * self.cols + cell.col) as usize;
        ALPHABET.get(index).copied()
    }

    /// 确认眨眼时调用：按当前平滑注视点选格
    ///
    /// 尚无注视样本时不产生选择。闪烁标记总会更新，
    /// 即便选中的是字母表之外的空格子。
    pub fn select(&mut self, now_ms: f64, frame_width: f64, frame_height: f64) -> Option<Selection> {
        let point = self.smoothed()?;
        let cell = self.cell_at(point, frame_width, frame_height);
        let letter = self.letter(cell);
        self.flash = Some(FlashMarker { cell, at_ms: now_ms });
        tracing::info!(
            row = cell.row,
            col = cell.col,
            letter = ?letter,
            "grid selection"
        );
        Some(Selection { cell, letter })
    }

    /// 当前仍在高亮期内的闪烁标记
    pub fn active_flash(&self, now_ms: f64) -> Option<FlashMarker> {
        self.flash.filter(|f| f.is_visible(now_ms))
    }

    /// 清空平滑缓冲与闪烁标记
    pub fn reset(&mut self) {
        self.recent.clear();
        self.flash = None;
    }
}
