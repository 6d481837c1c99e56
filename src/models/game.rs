//! 记忆翻牌游戏的数据模型

/// 游戏符号表：固定字母表，每个符号在一局中恰好出现两次
pub const GAME_SYMBOLS: [&str; 8] = ["🚀", "🎯", "💡", "🔥", "⭐", "🎨", "🧠", "💎"];

/// 一局游戏的配对总数
pub const PAIR_COUNT: usize = GAME_SYMBOLS.len();

/// 一局游戏的卡牌总数
pub const CARD_COUNT: usize = PAIR_COUNT * 2;

/// 单张卡牌
///
/// `position` 是固定槽位，整局不变；`symbol_id` 指向符号表。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameCard {
    pub symbol_id: usize,
    pub position: usize,
    pub flipped: bool,
    pub matched: bool,
}

impl GameCard {
    /// 卡牌正面的符号
    pub fn glyph(&self) -> &'static str {
        GAME_SYMBOLS[self.symbol_id]
    }
}

/// 游戏完成统计
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    /// 总步数（每翻开两张算一步）
    pub moves: u32,
    /// 用时（秒）
    pub elapsed_secs: u64,
}
