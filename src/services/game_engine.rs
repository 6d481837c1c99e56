//! 记忆翻牌游戏引擎 - 业务能力层
//!
//! 等待学习任务期间运行的小游戏，与任务轮询完全独立。
//! 引擎独占持有一局 `GameSession` 的全部状态，外部只能通过
//! `flip` / `toggle_pause` / `reset` / `stop` 和快照访问器交互。
//!
//! 延迟动作（600ms 判定窗口、500ms 盖牌）是一次性排期任务，每局
//! 带一个代数编号；reset 之后旧局的延迟任务在取效前会先校验代数，
//! 不会污染新局的状态。

use std::sync::{Arc, Mutex, MutexGuard};

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::timer::{self, TimerHandle};
use crate::models::game::{GameCard, GameSummary, PAIR_COUNT};

/// 游戏时钟步长
const CLOCK_TICK_MS: u64 = 1000;

type CompletionHook = Box<dyn Fn(GameSummary) + Send + Sync>;

/// 一局游戏的全部状态
#[derive(Debug, Default)]
struct SessionState {
    cards: Vec<GameCard>,
    /// 翻开缓冲：最多两张已翻开未配对的卡牌位置
    flipped: Vec<usize>,
    moves: u32,
    matched_pairs: usize,
    elapsed_secs: u64,
    paused: bool,
    accepting_input: bool,
    complete: bool,
    /// 会话代数：每次 reset/stop 递增，用于作废旧局的延迟任务
    generation: u64,
}

struct EngineInner {
    state: Mutex<SessionState>,
    clock: Mutex<Option<TimerHandle>>,
    pending: Mutex<Option<TimerHandle>>,
    on_complete: Mutex<Option<CompletionHook>>,
    reveal_delay_ms: u64,
    mismatch_delay_ms: u64,
}

/// 记忆翻牌游戏引擎
#[derive(Clone)]
pub struct GameEngine {
    inner: Arc<EngineInner>,
}

impl GameEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(SessionState::default()),
                clock: Mutex::new(None),
                pending: Mutex::new(None),
                on_complete: Mutex::new(None),
                reveal_delay_ms: config.reveal_delay_ms,
                mismatch_delay_ms: config.mismatch_delay_ms,
            }),
        }
    }

    /// 注册完成回调，游戏结束时携带最终步数与用时触发
    pub fn set_on_complete(&self, hook: impl Fn(GameSummary) + Send + Sync + 'static) {
        *lock(&self.inner.on_complete) = Some(Box::new(hook));
    }

    /// 开始新的一局：重新洗牌、清零计数、重启时钟
    pub fn start(&self) {
        // 作废上一局残留的延迟任务
        drop(lock(&self.inner.pending).take());

        let generation;
        {
            let mut s = lock(&self.inner.state);
            s.generation += 1;
            generation = s.generation;
            s.cards = build_deck();
            s.flipped.clear();
            s.moves = 0;
            s.matched_pairs = 0;
            s.elapsed_secs = 0;
            s.paused = false;
            s.accepting_input = true;
            s.complete = false;
        }

        let engine = self.clone();
        let clock = timer::start_repeating(CLOCK_TICK_MS, move || engine.clock_tick(generation));
        *lock(&self.inner.clock) = Some(clock);

        debug!("🎮 新的一局开始 ({} 对卡牌)", PAIR_COUNT);
    }

    /// 重新开始（丢弃当前局）
    pub fn reset(&self) {
        info!("🔄 重新开始游戏");
        self.start();
    }

    /// 停止游戏：时钟停止，残留的延迟任务全部作废
    pub fn stop(&self) {
        drop(lock(&self.inner.pending).take());
        {
            let mut s = lock(&self.inner.state);
            s.generation += 1;
            s.accepting_input = false;
        }
        self.stop_clock();
    }

    /// 翻开一张牌，返回是否被接受
    ///
    /// 暂停中、判定窗口内、已翻开或已配对的牌一律拒绝。
    pub fn flip(&self, position: usize) -> bool {
        let scheduled;
        {
            let mut s = lock(&self.inner.state);
            if s.complete || s.paused || !s.accepting_input {
                return false;
            }
            let card = match s.cards.get(position) {
                Some(card) => card,
                None => return false,
            };
            if card.flipped || card.matched {
                return false;
            }
            s.cards[position].flipped = true;
            s.flipped.push(position);
            if s.flipped.len() == 2 {
                s.moves += 1;
                s.accepting_input = false;
                scheduled = Some(s.generation);
            } else {
                scheduled = None;
            }
        }
        if let Some(generation) = scheduled {
            let engine = self.clone();
            let handle = timer::start_once(self.inner.reveal_delay_ms, move || {
                engine.evaluate(generation);
            });
            *lock(&self.inner.pending) = Some(handle);
        }
        true
    }

    /// 暂停/继续切换，返回切换后是否处于暂停
    ///
    /// 暂停期间不接受翻牌、时钟不走；已翻开的牌保留逻辑状态，
    /// 视觉遮挡由展示层处理。
    pub fn toggle_pause(&self) -> bool {
        let mut s = lock(&self.inner.state);
        s.paused = !s.paused;
        debug!("⏸️ 游戏{}", if s.paused { "暂停" } else { "继续" });
        s.paused
    }

    /// 判定翻开缓冲中的两张牌
    fn evaluate(&self, generation: u64) {
        let mut completion = None;
        let mut revert = None;
        {
            let mut s = lock(&self.inner.state);
            if s.generation != generation || s.flipped.len() != 2 {
                return;
            }
            let (a, b) = (s.flipped[0], s.flipped[1]);
            if s.cards[a].symbol_id == s.cards[b].symbol_id {
                s.cards[a].matched = true;
                s.cards[b].matched = true;
                s.matched_pairs += 1;
                s.flipped.clear();
                s.accepting_input = true;
                if s.matched_pairs == PAIR_COUNT {
                    s.complete = true;
                    completion = Some(GameSummary {
                        moves: s.moves,
                        elapsed_secs: s.elapsed_secs,
                    });
                }
            } else {
                revert = Some((a, b, generation));
            }
        }

        if let Some(summary) = completion {
            self.stop_clock();
            info!(
                "🏆 游戏完成: {} 步, 用时 {}",
                summary.moves,
                format_time(summary.elapsed_secs)
            );
            if let Some(hook) = lock(&self.inner.on_complete).as_ref() {
                hook(summary);
            }
        }

        if let Some((a, b, generation)) = revert {
            let engine = self.clone();
            let handle = timer::start_once(self.inner.mismatch_delay_ms, move || {
                engine.revert_mismatch(a, b, generation);
            });
            *lock(&self.inner.pending) = Some(handle);
        }
    }

    /// 盖回不匹配的两张牌并恢复输入
    fn revert_mismatch(&self, a: usize, b: usize, generation: u64) {
        let mut s = lock(&self.inner.state);
        if s.generation != generation {
            return;
        }
        s.cards[a].flipped = false;
        s.cards[b].flipped = false;
        s.flipped.clear();
        s.accepting_input = true;
    }

    fn clock_tick(&self, generation: u64) {
        let mut s = lock(&self.inner.state);
        if s.generation != generation || s.paused || s.complete {
            return;
        }
        s.elapsed_secs += 1;
    }

    fn stop_clock(&self) {
        if let Some(mut clock) = lock(&self.inner.clock).take() {
            clock.stop();
        }
    }

    // ========== 快照访问器 ==========

    pub fn cards(&self) -> Vec<GameCard> {
        lock(&self.inner.state).cards.clone()
    }

    pub fn moves(&self) -> u32 {
        lock(&self.inner.state).moves
    }

    pub fn matched_pairs(&self) -> usize {
        lock(&self.inner.state).matched_pairs
    }

    pub fn elapsed_secs(&self) -> u64 {
        lock(&self.inner.state).elapsed_secs
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.inner.state).paused
    }

    pub fn is_complete(&self) -> bool {
        lock(&self.inner.state).complete
    }

    pub fn accepting_input(&self) -> bool {
        lock(&self.inner.state).accepting_input
    }
}

/// 构建并均匀洗乱一副牌：每个符号两张
fn build_deck() -> Vec<GameCard> {
    let mut symbol_ids: Vec<usize> = (0..PAIR_COUNT).flat_map(|id| [id, id]).collect();
    let mut rng = rand::rng();
    symbol_ids.shuffle(&mut rng);
    symbol_ids
        .into_iter()
        .enumerate()
        .map(|(position, symbol_id)| GameCard {
            symbol_id,
            position,
            flipped: false,
            matched: false,
        })
        .collect()
}

/// 用时格式化：`分:秒`，秒固定两位补零（125 秒 → "2:05"）
pub fn format_time(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// 锁辅助：即便持锁线程 panic 也继续使用内部数据
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::models::game::CARD_COUNT;

    fn test_engine() -> GameEngine {
        GameEngine::new(&Config::default())
    }

    /// 找出某个符号的两个位置
    fn positions_of(engine: &GameEngine, symbol_id: usize) -> (usize, usize) {
        let positions: Vec<usize> = engine
            .cards()
            .iter()
            .filter(|c| c.symbol_id == symbol_id)
            .map(|c| c.position)
            .collect();
        assert_eq!(positions.len(), 2);
        (positions[0], positions[1])
    }

    #[test]
    fn deck_contains_each_symbol_exactly_twice() {
        let deck = build_deck();
        assert_eq!(deck.len(), CARD_COUNT);
        for symbol_id in 0..PAIR_COUNT {
            let count = deck.iter().filter(|c| c.symbol_id == symbol_id).count();
            assert_eq!(count, 2, "符号 {} 应恰好出现两次", symbol_id);
        }
        for (index, card) in deck.iter().enumerate() {
            assert_eq!(card.position, index);
            assert!(!card.flipped);
            assert!(!card.matched);
        }
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(125), "2:05");
    }

    #[tokio::test(start_paused = true)]
    async fn matching_pair_resolves_after_reveal_delay() {
        let engine = test_engine();
        engine.start();
        let (a, b) = positions_of(&engine, 0);

        assert!(engine.flip(a));
        assert!(engine.accepting_input(), "单张翻开不应锁输入");
        assert!(engine.flip(b));
        assert!(!engine.accepting_input(), "凑满两张后进入判定窗口");
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.matched_pairs(), 0, "判定窗口结束前不应配对");

        sleep(Duration::from_millis(700)).await;
        assert_eq!(engine.matched_pairs(), 1);
        assert!(engine.accepting_input());
        let cards = engine.cards();
        assert!(cards[a].matched && cards[b].matched);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatch_reverts_after_extra_delay() {
        let engine = test_engine();
        engine.start();
        let (a, _) = positions_of(&engine, 0);
        let (b, _) = positions_of(&engine, 1);

        assert!(engine.flip(a));
        assert!(engine.flip(b));

        // 判定窗口结束：不匹配，牌仍翻开，输入仍锁定
        sleep(Duration::from_millis(700)).await;
        let cards = engine.cards();
        assert!(cards[a].flipped && cards[b].flipped);
        assert!(!cards[a].matched && !cards[b].matched);
        assert!(!engine.accepting_input());

        // 盖牌延迟结束：恢复面朝下并重新接受输入
        sleep(Duration::from_millis(600)).await;
        let cards = engine.cards();
        assert!(!cards[a].flipped && !cards[b].flipped);
        assert!(engine.accepting_input());
        assert_eq!(engine.matched_pairs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn single_flip_never_evaluates() {
        let engine = test_engine();
        engine.start();
        let (a, _) = positions_of(&engine, 0);

        assert!(engine.flip(a));
        sleep(Duration::from_millis(3000)).await;

        assert_eq!(engine.moves(), 0);
        assert!(engine.cards()[a].flipped, "单张牌应保持翻开等待第二张");
        assert!(engine.accepting_input());
    }

    #[tokio::test(start_paused = true)]
    async fn flips_rejected_during_evaluation_window() {
        let engine = test_engine();
        engine.start();
        let (a, b) = positions_of(&engine, 0);
        let (c, _) = positions_of(&engine, 1);

        assert!(engine.flip(a));
        assert!(!engine.flip(a), "同一张牌不能重复翻");
        assert!(engine.flip(b));
        assert!(!engine.flip(c), "判定窗口内不接受新的翻牌");

        sleep(Duration::from_millis(700)).await;
        assert!(engine.flip(c), "判定结束后恢复输入");
    }

    #[tokio::test(start_paused = true)]
    async fn completes_exactly_when_all_pairs_matched() {
        let engine = test_engine();
        let completions = Arc::new(AtomicU32::new(0));
        let completions_clone = Arc::clone(&completions);
        engine.set_on_complete(move |summary| {
            assert_eq!(summary.moves, PAIR_COUNT as u32);
            completions_clone.fetch_add(1, Ordering::SeqCst);
        });
        engine.start();

        for symbol_id in 0..PAIR_COUNT {
            assert!(!engine.is_complete());
            let (a, b) = positions_of(&engine, symbol_id);
            assert!(engine.flip(a));
            assert!(engine.flip(b));
            sleep(Duration::from_millis(700)).await;
        }

        assert!(engine.is_complete());
        assert_eq!(engine.matched_pairs(), PAIR_COUNT);
        assert_eq!(completions.load(Ordering::SeqCst), 1);

        // 完成后时钟停止
        let frozen = engine.elapsed_secs();
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(engine.elapsed_secs(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_advances_one_second_per_tick() {
        let engine = test_engine();
        engine.start();

        sleep(Duration::from_millis(3100)).await;
        assert_eq!(engine.elapsed_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_blocks_flips_and_freezes_clock() {
        let engine = test_engine();
        engine.start();
        let (a, b) = positions_of(&engine, 0);

        assert!(engine.flip(a));
        assert!(engine.toggle_pause());
        assert!(!engine.flip(b), "暂停中不接受翻牌");

        sleep(Duration::from_millis(3100)).await;
        assert_eq!(engine.elapsed_secs(), 0, "暂停期间时钟不走");
        assert!(engine.cards()[a].flipped, "暂停不清除已翻开状态");

        assert!(!engine.toggle_pause());
        assert!(engine.flip(b), "恢复后接受翻牌");
    }

    #[tokio::test(start_paused = true)]
    async fn double_toggle_restores_accepting_state() {
        let engine = test_engine();
        engine.start();
        let before = engine.accepting_input();

        engine.toggle_pause();
        engine.toggle_pause();
        assert_eq!(engine.accepting_input(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_stale_delayed_tasks() {
        let engine = test_engine();
        engine.start();
        let (a, _) = positions_of(&engine, 0);
        let (b, _) = positions_of(&engine, 1);

        // 翻出一对不匹配的牌，进入判定窗口
        assert!(engine.flip(a));
        assert!(engine.flip(b));
        assert!(!engine.accepting_input());

        // 窗口未结束就重开一局
        engine.reset();
        assert!(engine.accepting_input());
        assert_eq!(engine.moves(), 0);

        // 旧局的判定/盖牌任务不得改动新局
        sleep(Duration::from_millis(2000)).await;
        assert!(engine.accepting_input());
        assert_eq!(engine.matched_pairs(), 0);
        assert!(engine.cards().iter().all(|c| !c.flipped && !c.matched));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_clock_and_blocks_input() {
        let engine = test_engine();
        engine.start();

        sleep(Duration::from_millis(2100)).await;
        assert_eq!(engine.elapsed_secs(), 2);

        engine.stop();
        let (a, _) = positions_of(&engine, 0);
        assert!(!engine.flip(a));

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(engine.elapsed_secs(), 2);
    }
}
