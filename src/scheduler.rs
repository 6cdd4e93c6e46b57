/*
 * src/scheduler.rs
 * 遅延コールバックのキュー
 * (イベントループが毎ティック drain_due で回収して状態機械へ流す)
 */

use std::time::{Duration, Instant};

use crate::effects::DelayedAction;

/// 予約済みのコールバック1件
#[derive(Debug, Clone)]
struct Entry {
    due: Instant,
    action: DelayedAction,
}

/// 遅延コールバックのキュー
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// `delay` 後に発火するコールバックを予約する
    pub fn schedule(&mut self, delay: Duration, action: DelayedAction) {
        self.schedule_at(Instant::now() + delay, action);
    }

    /// 発火時刻を直接指定して予約する
    pub fn schedule_at(&mut self, due: Instant, action: DelayedAction) {
        self.queue.push(Entry { due, action });
    }

    /// `now` までに発火すべきコールバックを発火時刻順に取り出す
    pub fn drain_due(&mut self, now: Instant) -> Vec<DelayedAction> {
        self.queue.sort_by_key(|entry| entry.due);
        let (due, rest): (Vec<Entry>, Vec<Entry>) =
            self.queue.drain(..).partition(|entry| entry.due <= now);
        self.queue = rest;
        due.into_iter().map(|entry| entry.action).collect()
    }

    /// 画面を離れるときに未発火の予約をすべて破棄する
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule_at(now + Duration::from_millis(1500), DelayedAction::NextRound { round: 1 });
        scheduler.schedule_at(now + Duration::from_millis(500), DelayedAction::ClearMismatch { round: 1 });

        // 途中までは何も発火しない
        assert!(scheduler.drain_due(now + Duration::from_millis(100)).is_empty());

        let fired = scheduler.drain_due(now + Duration::from_secs(2));
        assert_eq!(
            fired,
            vec![
                DelayedAction::ClearMismatch { round: 1 },
                DelayedAction::NextRound { round: 1 },
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_partial_drain_keeps_rest() {
        let mut scheduler = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule_at(now + Duration::from_millis(100), DelayedAction::BotReply { turn: 1 });
        scheduler.schedule_at(now + Duration::from_millis(800), DelayedAction::BotReply { turn: 2 });

        let fired = scheduler.drain_due(now + Duration::from_millis(200));
        assert_eq!(fired, vec![DelayedAction::BotReply { turn: 1 }]);
        assert!(!scheduler.is_empty());
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut scheduler = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule_at(now, DelayedAction::FirstQuestion { turn: 0 });
        scheduler.clear();
        assert!(scheduler.drain_due(now + Duration::from_secs(1)).is_empty());
    }
}
