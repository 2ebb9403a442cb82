//! 摩尔斯时序解码模块
//!
//! 把眨眼事件流转换为点划符号，并依据距上次眨眼的静默时长
//! 结算字母边界和单词边界：
//! - 眨眼时长 < 点划分界 → 点，否则 → 划（边界值归为划）
//! - 静默 > 单词停顿（先判，较大的界）→ 查表出字 + 空格，清空序列
//! - 否则静默 > 字母停顿 → 查表出字，清空序列
//!
//! 查表失败不是错误：未定义的点划串降级为 '?'，让使用者自行纠正。

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::blink::BlinkEvent;

/// 未识别点划串的占位字符
pub const UNKNOWN_SYMBOL: char = '?';

/// 点划串 → 字母映射表
///
/// 26 个字母，外加显式定义的单空格串 → 空格字符
/// （受试者未产生点划但仍发出边界信号的边缘情形）。
pub static MORSE_TABLE: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        (".-", 'A'),
        ("-...", 'B'),
        ("-.-.", 'C'),
        ("-..", 'D'),
        (".", 'E'),
        ("..-.", 'F'),
        ("--.", 'G'),
        ("....", 'H'),
        ("..", 'I'),
        (".---", 'J'),
        ("-.-", 'K'),
        (".-..", 'L'),
        ("--", 'M'),
        ("-.", 'N'),
        ("---", 'O'),
        (".--.", 'P'),
        ("--.-", 'Q'),
        (".-.", 'R'),
        ("...", 'S'),
        ("-", 'T'),
        ("..-", 'U'),
        ("...-", 'V'),
        (".--", 'W'),
        ("-..-", 'X'),
        ("-.--", 'Y'),
        ("--..", 'Z'),
        (" ", ' '),
    ])
});

/// 摩尔斯符号
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseSymbol {
    Dot,
    Dash,
}

impl MorseSymbol {
    pub fn as_char(&self) -> char {
        match self {
            Self::Dot => '.',
            Self::Dash => '-',
        }
    }
}

/// 一次边界结算的结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedBoundary {
    /// 结算出的字符（查表失败为 '?'）
    pub ch: char,
    /// 是否为单词边界（需在字符后追加空格）
    pub word_break: bool,
}

/// 摩尔斯时序解码器
///
/// 按到达顺序消费眨眼事件；与事件无关地在每个空闲帧上
/// 消费墙钟静默时长以检测边界。
pub struct MorseDecoder {
    /// 点划分界（毫秒）
    dot_threshold_ms: f64,
    /// 字母停顿（毫秒）
    letter_pause_ms: f64,
    /// 单词停顿（毫秒）
    word_pause_ms: f64,
    /// 自上次边界以来累积的点划串
    sequence: String,
    /// 上次眨眼释放时刻
    last_blink_ms: Option<f64>,
}

impl MorseDecoder {
    pub fn new(dot_threshold_ms: f64, letter_pause_ms: f64, word_pause_ms: f64) -> Self {
        Self {
            dot_threshold_ms,
            letter_pause_ms,
            word_pause_ms,
            sequence: String::new(),
            last_blink_ms: None,
        }
    }

    /// 消费一个完成的眨眼事件：按时长分类并追加符号
    pub fn on_blink(&mut self, event: &BlinkEvent) -> MorseSymbol {
        let symbol = if event.duration_ms < self.dot_threshold_ms {
            MorseSymbol::Dot
        } else {
            MorseSymbol::Dash
        };
        self.sequence.push(symbol.as_char());
        self.last_blink_ms = Some(event.end_ms);
        tracing::debug!(symbol = %symbol.as_char(), sequence = %self.sequence, "morse symbol");
        symbol
    }

    /// 无新事件的帧上检查边界
    ///
    /// 单词停顿优先于字母停顿判定（更大的界蕴含并取代较小的界），
    /// 每帧至多结算一次。序列为空时不做任何事。
    pub fn on_idle(&mut self, now_ms: f64) -> Option<DecodedBoundary> {
        if self.sequence.is_empty() {
            return None;
        }
        let last = self.last_blink_ms?;
        let elapsed = now_ms - last;

        let word_break = if elapsed > self.word_pause_ms {
            true
        } else if elapsed > self.letter_pause_ms {
            false
        } else {
            return None;
        };

        let ch = lookup(&self.sequence);
        tracing::info!(
            sequence = %self.sequence,
            decoded = %ch,
            word_break,
            "morse boundary"
        );
        self.sequence.clear();
        Some(DecodedBoundary { ch, word_break })
    }

    /// 当前累积的点划串
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// 重置解码状态（不触碰已产出的消息）
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.last_blink_ms = None;
    }
}

/// 查表；未定义的串降级为 '?'
pub fn lookup(sequence: &str) -> char {
    *MORSE_TABLE.get(sequence).unwrap_or(&UNKNOWN_SYMBOL)
}
