// Lucky-draw engine: pool of undrawn participants, winner history and the
// Idle -> Drawing -> Settled cycle.

use std::time::Duration;

use crate::core::{CelebrationHook, DrawPhase, NoCelebration, Participant, RandomSource};
use crate::utils::error::{EventError, Result};

/// Upper bound on names shown in one reel frame.
pub const MAX_REEL_WIDTH: usize = 50;

/// Cosmetic reveal sequence shown between deciding and settling a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspenseSettings {
    /// Number of reel frames shown before the reveal.
    pub cycles: usize,
    /// Delay between frames.
    pub interval: Duration,
    /// Names shown per frame.
    pub reel_width: usize,
}

impl Default for SuspenseSettings {
    fn default() -> Self {
        Self {
            cycles: 30,
            interval: Duration::from_millis(80),
            reel_width: 5,
        }
    }
}

pub struct DrawEngine<R: RandomSource> {
    roster: Vec<Participant>,
    pool: Vec<Participant>,
    /// Most recent winner first.
    history: Vec<Participant>,
    allow_repeat: bool,
    phase: DrawPhase,
    rng: R,
    hook: Box<dyn CelebrationHook + Send>,
}

impl<R: RandomSource> DrawEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            roster: Vec::new(),
            pool: Vec::new(),
            history: Vec::new(),
            allow_repeat: false,
            phase: DrawPhase::Idle,
            rng,
            hook: Box::new(NoCelebration),
        }
    }

    pub fn with_hook(mut self, hook: impl CelebrationHook + Send + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Start over against a new roster: full pool, empty history.
    pub fn reset(&mut self, full_list: &[Participant]) {
        self.roster = full_list.to_vec();
        self.pool = full_list.to_vec();
        self.history.clear();
        self.phase = DrawPhase::Idle;
        tracing::info!("Draw pool reset with {} participants", self.pool.len());
    }

    /// Refill the pool from the current roster and forget past winners.
    pub fn reset_pool(&mut self) {
        let roster = std::mem::take(&mut self.roster);
        self.reset(&roster);
    }

    /// Only affects future draws.
    pub fn set_allow_repeat(&mut self, allow: bool) {
        self.allow_repeat = allow;
    }

    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn history(&self) -> &[Participant] {
        &self.history
    }

    pub fn last_winner(&self) -> Option<&Participant> {
        self.history.first()
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// Pick and commit a winner now, entering `Drawing`.
    ///
    /// The winner is final as soon as this returns; `settle` only reveals it.
    /// On error nothing changes.
    pub fn decide(&mut self) -> Result<Participant> {
        if self.phase == DrawPhase::Drawing {
            return Err(EventError::DrawInProgress);
        }
        if self.pool.is_empty() {
            return Err(EventError::EmptyPool);
        }

        let idx = self.rng.index(self.pool.len());
        let winner = self.pool[idx].clone();

        if !self.allow_repeat {
            if let Some(pos) = self.pool.iter().position(|p| p.id == winner.id) {
                self.pool.remove(pos);
            }
        }
        self.history.insert(0, winner.clone());
        self.phase = DrawPhase::Drawing;

        tracing::debug!(
            "Drew {} ({} left in pool, repeat={})",
            winner.name,
            self.pool.len(),
            self.allow_repeat
        );
        Ok(winner)
    }

    /// Reveal the committed winner. Returns `None` unless a draw is pending.
    pub fn settle(&mut self) -> Option<&Participant> {
        if self.phase != DrawPhase::Drawing {
            return None;
        }
        self.phase = DrawPhase::Settled;
        let winner = self.history.first()?;
        self.hook.celebrate(winner);
        Some(winner)
    }

    /// Decide and reveal in one step.
    pub fn draw(&mut self) -> Result<Participant> {
        let winner = self.decide()?;
        self.settle();
        Ok(winner)
    }

    /// Random roster names for one suspense frame, at most [`MAX_REEL_WIDTH`].
    /// Never touches the pool.
    pub fn reel_frame(&mut self, width: usize) -> Vec<String> {
        if self.roster.is_empty() {
            return Vec::new();
        }
        (0..width.min(MAX_REEL_WIDTH))
            .map(|_| self.roster[self.rng.index(self.roster.len())].name.clone())
            .collect()
    }

    /// Decide the winner, play the suspense reel, then settle.
    ///
    /// The draw settles even if the returned future is dropped mid-reel.
    pub async fn draw_with_suspense<F>(
        &mut self,
        settings: &SuspenseSettings,
        mut on_frame: F,
    ) -> Result<Participant>
    where
        F: FnMut(&[String]),
    {
        let winner = self.decide()?;
        let mut pending = PendingReveal(self);

        for _ in 0..settings.cycles {
            let frame = pending.0.reel_frame(settings.reel_width);
            on_frame(frame.as_slice());
            tokio::time::sleep(settings.interval).await;
        }

        drop(pending);
        Ok(winner)
    }
}

/// Settles the decided draw when dropped.
struct PendingReveal<'a, R: RandomSource>(&'a mut DrawEngine<R>);

impl<R: RandomSource> Drop for PendingReveal<'_, R> {
    fn drop(&mut self) {
        self.0.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::random::FastRandom;
    use std::collections::{HashSet, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Replays a fixed list of indexes, then falls back to 0.
    struct ScriptedRandom(VecDeque<usize>);

    impl RandomSource for ScriptedRandom {
        fn index(&mut self, len: usize) -> usize {
            self.0.pop_front().unwrap_or(0) % len
        }
    }

    #[derive(Clone, Default)]
    struct CountingHook(Arc<AtomicUsize>);

    impl CelebrationHook for CountingHook {
        fn celebrate(&self, _winner: &Participant) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Participant::with_id(format!("p{}", i), *n))
            .collect()
    }

    #[test]
    fn test_draw_without_repeat_exhausts_pool() {
        let list = people(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(3));
        engine.reset(&list);

        let mut drawn = HashSet::new();
        for expected_left in [2, 1, 0] {
            let winner = engine.draw().unwrap();
            assert!(drawn.insert(winner.id.clone()), "repeat winner {}", winner.name);
            assert_eq!(engine.pool().len(), expected_left);
        }

        assert_eq!(drawn.len(), 3);
        assert!(matches!(engine.draw(), Err(EventError::EmptyPool)));
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let list = people(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(ScriptedRandom(VecDeque::from([2, 0, 0])));
        engine.reset(&list);

        assert_eq!(engine.draw().unwrap().name, "C");
        assert_eq!(engine.draw().unwrap().name, "A");
        assert_eq!(engine.draw().unwrap().name, "B");

        let names: Vec<_> = engine.history().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(engine.last_winner().unwrap().name, "B");
    }

    #[test]
    fn test_empty_pool_leaves_state_untouched() {
        let list = people(&["X"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(1));
        engine.reset(&list);
        engine.draw().unwrap();

        let history_before = engine.history().to_vec();
        let phase_before = engine.phase();
        for _ in 0..3 {
            assert!(matches!(engine.draw(), Err(EventError::EmptyPool)));
        }
        assert_eq!(engine.history(), history_before.as_slice());
        assert!(engine.pool().is_empty());
        assert_eq!(engine.phase(), phase_before);
    }

    #[test]
    fn test_empty_roster_fails_immediately() {
        let mut engine = DrawEngine::new(FastRandom::with_seed(1));
        engine.reset(&[]);
        assert!(matches!(engine.draw(), Err(EventError::EmptyPool)));
        engine.set_allow_repeat(true);
        assert!(matches!(engine.draw(), Err(EventError::EmptyPool)));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_single_member_pool_always_selected() {
        let list = people(&["X"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(9));
        engine.reset(&list);
        engine.set_allow_repeat(true);
        for _ in 0..10 {
            assert_eq!(engine.draw().unwrap().name, "X");
        }
        assert_eq!(engine.pool().len(), 1);
        assert_eq!(engine.history().len(), 10);
    }

    #[test]
    fn test_allow_repeat_keeps_pool() {
        let list = people(&["A", "B"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(5));
        engine.reset(&list);
        engine.set_allow_repeat(true);
        for _ in 0..5 {
            engine.draw().unwrap();
        }
        assert_eq!(engine.pool(), list.as_slice());
        assert_eq!(engine.history().len(), 5);
    }

    #[test]
    fn test_toggling_repeat_does_not_refill_pool() {
        let list = people(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(11));
        engine.reset(&list);
        engine.draw().unwrap();
        engine.set_allow_repeat(true);
        assert_eq!(engine.pool().len(), 2);
        engine.draw().unwrap();
        assert_eq!(engine.pool().len(), 2);
    }

    #[test]
    fn test_removal_is_by_identity_not_name() {
        // Two people share a name; drawing one must leave the other.
        let list = vec![
            Participant::with_id("1", "Sam"),
            Participant::with_id("2", "Sam"),
        ];
        let mut engine = DrawEngine::new(ScriptedRandom(VecDeque::from([1])));
        engine.reset(&list);

        let winner = engine.draw().unwrap();
        assert_eq!(winner.id, "2");
        assert_eq!(engine.pool(), &[Participant::with_id("1", "Sam")]);
    }

    #[test]
    fn test_decide_then_settle_phases_and_hook() {
        let hook = CountingHook::default();
        let list = people(&["A", "B"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(2)).with_hook(hook.clone());
        engine.reset(&list);
        assert_eq!(engine.phase(), DrawPhase::Idle);

        let winner = engine.decide().unwrap();
        assert_eq!(engine.phase(), DrawPhase::Drawing);
        assert_eq!(hook.0.load(Ordering::SeqCst), 0);

        // Re-entrant draw is refused without side effects.
        assert!(matches!(engine.decide(), Err(EventError::DrawInProgress)));
        assert_eq!(engine.pool().len(), 1);
        assert_eq!(engine.history().len(), 1);

        assert_eq!(engine.settle().unwrap(), &winner);
        assert_eq!(engine.phase(), DrawPhase::Settled);
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);

        // Settling twice does nothing.
        assert!(engine.settle().is_none());
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);

        engine.draw().unwrap();
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);

        // Failed draws never celebrate.
        assert!(engine.draw().is_err());
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_pool_restores_roster() {
        let list = people(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(4));
        engine.reset(&list);
        engine.draw().unwrap();
        engine.draw().unwrap();

        engine.reset_pool();
        assert_eq!(engine.pool(), list.as_slice());
        assert!(engine.history().is_empty());
        assert_eq!(engine.phase(), DrawPhase::Idle);
    }

    #[test]
    fn test_uniform_selection() {
        let list = people(&["A", "B", "C", "D"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(17));
        engine.reset(&list);
        engine.set_allow_repeat(true);

        let mut counts = std::collections::HashMap::new();
        for _ in 0..4000 {
            *counts.entry(engine.draw().unwrap().name).or_insert(0usize) += 1;
        }
        for name in ["A", "B", "C", "D"] {
            let c = counts[name];
            assert!((850..1150).contains(&c), "{} drawn {} times", name, c);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspense_reel_does_not_change_winner() {
        let hook = CountingHook::default();
        let list = people(&["A", "B", "C", "D", "E"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(8)).with_hook(hook.clone());
        engine.reset(&list);

        let settings = SuspenseSettings::default();
        let mut frames = Vec::new();
        let start = tokio::time::Instant::now();
        let winner = engine
            .draw_with_suspense(&settings, |frame| frames.push(frame.to_vec()))
            .await
            .unwrap();

        assert_eq!(frames.len(), 30);
        assert!(frames.iter().all(|f| f.len() == 5));
        assert!(start.elapsed() >= Duration::from_millis(30 * 80));
        assert_eq!(engine.last_winner(), Some(&winner));
        assert_eq!(engine.phase(), DrawPhase::Settled);
        assert_eq!(engine.pool().len(), 4);
        assert!(!engine.pool().contains(&winner));
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_suspense_still_settles() {
        let hook = CountingHook::default();
        let list = people(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(6)).with_hook(hook.clone());
        engine.reset(&list);

        let mut frames = 0;
        let timed_out = tokio::time::timeout(
            Duration::from_millis(100),
            engine.draw_with_suspense(&SuspenseSettings::default(), |_| frames += 1),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(frames > 0 && frames < 30);

        assert_eq!(engine.phase(), DrawPhase::Settled);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.pool().len(), 2);
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);

        engine.draw().unwrap();
        assert_eq!(engine.pool().len(), 1);
        assert_eq!(hook.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reel_frame_width_is_capped() {
        let list = people(&["A", "B"]);
        let mut engine = DrawEngine::new(FastRandom::with_seed(2));
        engine.reset(&list);
        assert_eq!(engine.reel_frame(3).len(), 3);
        assert_eq!(engine.reel_frame(10_000_000_000_000).len(), MAX_REEL_WIDTH);
        assert_eq!(engine.pool().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspense_on_empty_pool_fails_without_frames() {
        let mut engine = DrawEngine::new(FastRandom::with_seed(8));
        engine.reset(&[]);

        let mut frames = 0;
        let result = engine
            .draw_with_suspense(&SuspenseSettings::default(), |_| frames += 1)
            .await;
        assert!(matches!(result, Err(EventError::EmptyPool)));
        assert_eq!(frames, 0);
    }
}
