/*
 * src/matching.rs
 * 大文字・小文字マッチングの状態管理
 */

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::alphabet::{self, ALPHABET};
use crate::effects::{DelayedAction, Effect, HapticKind};

/// ミスマッチ表示を解除するまでの時間
pub const MISMATCH_RESET_MS: u64 = 500;
/// 全部そろってから次のラウンドを配るまでの時間
pub const ROUND_RESTART_MS: u64 = 1500;

/// 1ラウンドで配る文字数 (左右それぞれ)
pub const DEAL_COUNT: usize = 4;

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// 全カード表向き
    Easy,
    /// 選択中のカードだけ表向き
    Hard,
}

/// 左右どちらの列か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// 場に出ているカード1枚
#[derive(Debug, Clone)]
pub struct MatchItem {
    pub id: u32,
    /// 表示する文字 (左列は 'A'、右列は 'a' のように大小が付く)
    pub display: char,
    /// 照合キー (常に大文字)
    pub letter: char,
    pub upper: bool,
    pub matched: bool,
    pub face_up: bool,
}

/// 大文字・小文字マッチングゲーム
///
/// 左列は引いた順の大文字4枚、右列は同じ4文字の小文字を
/// 独立にシャッフルした4枚。左右1枚ずつ選ぶと照合される。
pub struct MatchingPairsGame {
    rng: StdRng,
    difficulty: Difficulty,
    left: Vec<MatchItem>,
    right: Vec<MatchItem>,
    selected_left: Option<u32>,
    selected_right: Option<u32>,
    round: u32,
    next_id: u32,
}

impl MatchingPairsGame {
    /// 乱数源を注入して最初のラウンドを配る
    pub fn new(rng: StdRng, difficulty: Difficulty) -> Self {
        let mut game = Self {
            rng,
            difficulty,
            left: Vec::new(),
            right: Vec::new(),
            selected_left: None,
            selected_right: None,
            round: 0,
            next_id: 0,
        };
        game.start_round(difficulty);
        game
    }

    pub fn left(&self) -> &[MatchItem] {
        &self.left
    }

    pub fn right(&self) -> &[MatchItem] {
        &self.right
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// その列で選択中のカード id
    pub fn selected(&self, side: Side) -> Option<u32> {
        match side {
            Side::Left => self.selected_left,
            Side::Right => self.selected_right,
        }
    }

    /// 左列が全部そろったらラウンド完了
    pub fn round_complete(&self) -> bool {
        !self.left.is_empty() && self.left.iter().all(|item| item.matched)
    }

    /// 新しいラウンドを配る
    ///
    /// ラウンド番号は、そろい切ったラウンドを置き換えるときだけ進む。
    /// 途中で配り直してもカウントは変わらない。
    pub fn start_round(&mut self, difficulty: Difficulty) {
        if self.round == 0 || self.round_complete() {
            self.round += 1;
        }
        self.difficulty = difficulty;
        let face_up = difficulty == Difficulty::Easy;

        let pool: Vec<char> = ALPHABET.iter().map(|card| card.letter).collect();
        let letters: Vec<char> = pool
            .choose_multiple(&mut self.rng, DEAL_COUNT)
            .copied()
            .collect();

        self.left.clear();
        self.right.clear();
        for &letter in &letters {
            let id = self.next_id;
            self.next_id += 1;
            self.left.push(MatchItem {
                id,
                display: letter,
                letter,
                upper: true,
                matched: false,
                face_up,
            });
        }
        for &letter in &letters {
            let id = self.next_id;
            self.next_id += 1;
            self.right.push(MatchItem {
                id,
                display: letter.to_ascii_lowercase(),
                letter,
                upper: false,
                matched: false,
                face_up,
            });
        }
        self.right.shuffle(&mut self.rng);

        self.selected_left = None;
        self.selected_right = None;
    }

    /// カードを選ぶ。左右そろったら照合まで行う。
    pub fn select_item(&mut self, side: Side, id: u32) -> Vec<Effect> {
        let items = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        let Some(index) = items.iter().position(|item| item.id == id) else {
            return Vec::new(); // 古い id は無視
        };
        if items[index].matched {
            return Vec::new();
        }

        // ハードモードでは同じ列の未マッチカードを1枚だけ表向きにする
        if self.difficulty == Difficulty::Hard {
            for item in items.iter_mut() {
                if !item.matched {
                    item.face_up = item.id == id;
                }
            }
        }

        match side {
            Side::Left => self.selected_left = Some(id),
            Side::Right => self.selected_right = Some(id),
        }

        let mut effects = vec![Effect::Haptic {
            kind: HapticKind::LightImpact,
        }];
        effects.extend(self.check_match());
        effects
    }

    /// 左右の選択がそろっていれば照合する
    fn check_match(&mut self) -> Vec<Effect> {
        let (Some(left_id), Some(right_id)) = (self.selected_left, self.selected_right) else {
            return Vec::new();
        };
        let Some(left_index) = self.left.iter().position(|item| item.id == left_id) else {
            return Vec::new();
        };
        let Some(right_index) = self.right.iter().position(|item| item.id == right_id) else {
            return Vec::new();
        };

        if self.left[left_index].letter == self.right[right_index].letter {
            self.left[left_index].matched = true;
            self.right[right_index].matched = true;
            self.selected_left = None;
            self.selected_right = None;

            let mut effects = vec![Effect::Haptic {
                kind: HapticKind::Success,
            }];
            if let Some(card) = alphabet::card_for(self.left[left_index].letter) {
                effects.push(Effect::speak(format!("{}! {}!", card.letter, card.word)));
            }
            if self.round_complete() {
                effects.push(Effect::ScheduleAfter {
                    delay_ms: ROUND_RESTART_MS,
                    action: DelayedAction::NextRound { round: self.round },
                });
            }
            effects
        } else {
            // ミスマッチはしばらく見せたままにして、遅延後に解除する
            vec![
                Effect::Haptic {
                    kind: HapticKind::Error,
                },
                Effect::ScheduleAfter {
                    delay_ms: MISMATCH_RESET_MS,
                    action: DelayedAction::ClearMismatch { round: self.round },
                },
            ]
        }
    }

    /// 予約済みコールバックの発火 (世代が古いものは何もしない)
    pub fn fire_delayed(&mut self, action: &DelayedAction) -> Vec<Effect> {
        match *action {
            DelayedAction::ClearMismatch { round } if round == self.round => {
                self.selected_left = None;
                self.selected_right = None;
                if self.difficulty == Difficulty::Hard {
                    for item in self.left.iter_mut().chain(self.right.iter_mut()) {
                        if !item.matched {
                            item.face_up = false;
                        }
                    }
                }
                Vec::new()
            }
            DelayedAction::NextRound { round } if round == self.round && self.round_complete() => {
                let difficulty = self.difficulty;
                self.start_round(difficulty);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
