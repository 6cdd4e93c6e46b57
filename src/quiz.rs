/*
 * src/quiz.rs
 * 欠けた文字あてクイズ (きえた もじを さがす) の状態管理
 */

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::alphabet::LETTER_GROUPS;
use crate::effects::{Effect, HapticKind};

/// 出題中のメッセージ
pub const PROMPT_MESSAGE: &str = "Find the missing letter!";
/// 全部見つけたときのメッセージ
pub const CELEBRATE_MESSAGE: &str = "Great Job! 🎉";
/// 不正解のメッセージ
pub const RETRY_MESSAGE: &str = "Try again!";

/// 1ラウンドで隠す文字の数
const HIDDEN_COUNT: usize = 2;

/// 欠けた文字あてクイズ
pub struct MissingLetterQuiz {
    rng: StdRng,
    group_index: usize,
    hidden: BTreeSet<usize>,
    solved: BTreeSet<usize>,
    options: Vec<char>,
    feedback: String,
}

impl MissingLetterQuiz {
    /// 乱数源を注入して最初のラウンドを開始する
    /// (シードを固定すれば出題を再現できる)
    pub fn new(rng: StdRng) -> Self {
        let mut quiz = Self {
            rng,
            group_index: 0,
            hidden: BTreeSet::new(),
            solved: BTreeSet::new(),
            options: Vec::new(),
            feedback: String::new(),
        };
        quiz.start_round();
        quiz
    }

    /// 現在のグループの文字列
    pub fn group(&self) -> &'static [char] {
        LETTER_GROUPS[self.group_index]
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// 隠されている位置
    pub fn hidden(&self) -> &BTreeSet<usize> {
        &self.hidden
    }

    /// 正解済みの位置
    pub fn solved(&self) -> &BTreeSet<usize> {
        &self.solved
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// 回答ボタンの並び (ラウンド開始時にシャッフルされる)
    pub fn options(&self) -> &[char] {
        &self.options
    }

    /// 隠し位置を全部あてたらラウンド完了
    pub fn round_complete(&self) -> bool {
        !self.hidden.is_empty() && self.solved == self.hidden
    }

    /// 新しいラウンドを開始する (隠し位置2つを引き直す)
    pub fn start_round(&mut self) {
        self.solved.clear();
        let group = LETTER_GROUPS[self.group_index];
        self.hidden = rand::seq::index::sample(&mut self.rng, group.len(), HIDDEN_COUNT)
            .into_iter()
            .collect();
        self.options = group.to_vec();
        self.options.shuffle(&mut self.rng);
        self.feedback = PROMPT_MESSAGE.to_string();
    }

    /// 回答をチェックする
    ///
    /// 正解済みの文字をもう一度選んだ場合も不正解と同じ扱いになる。
    pub fn submit_answer(&mut self, candidate: char) -> Vec<Effect> {
        let group = LETTER_GROUPS[self.group_index];

        if let Some(position) = group.iter().position(|&letter| letter == candidate) {
            if self.hidden.contains(&position) && !self.solved.contains(&position) {
                self.solved.insert(position);
                let mut effects = vec![Effect::Haptic {
                    kind: HapticKind::Success,
                }];
                if self.round_complete() {
                    self.feedback = CELEBRATE_MESSAGE.to_string();
                    effects.push(Effect::speak("Great job! You found all the letters!"));
                }
                return effects;
            }
        }

        self.feedback = RETRY_MESSAGE.to_string();
        vec![Effect::Haptic {
            kind: HapticKind::Error,
        }]
    }

    /// 次のグループへ進む
    /// (ラウンド完了時のみ有効。最後のグループの次は先頭へ戻る)
    pub fn advance_group(&mut self) {
        if !self.round_complete() {
            return;
        }
        self.group_index = (self.group_index + 1) % LETTER_GROUPS.len();
        self.start_round();
    }

    #[cfg(test)]
    fn force_hidden(&mut self, positions: &[usize]) {
        self.solved.clear();
        self.hidden = positions.iter().copied().collect();
        self.feedback = PROMPT_MESSAGE.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn quiz_with_seed(seed: u64) -> MissingLetterQuiz {
        MissingLetterQuiz::new(StdRng::seed_from_u64(seed))
    }

    /// ラウンドを解き切って次のグループへ進めるヘルパー
    fn solve_round(quiz: &mut MissingLetterQuiz) {
        let hidden: Vec<usize> = quiz.hidden().iter().copied().collect();
        for position in hidden {
            let letter = quiz.group()[position];
            quiz.submit_answer(letter);
        }
        assert!(quiz.round_complete());
    }

    #[test]
    fn test_every_round_hides_two_distinct_positions() {
        let mut quiz = quiz_with_seed(7);
        // 全グループを2周して隠し位置の条件を確かめる
        for _ in 0..(LETTER_GROUPS.len() * 2) {
            assert_eq!(quiz.hidden().len(), 2);
            for &position in quiz.hidden() {
                assert!(position < quiz.group().len());
            }
            solve_round(&mut quiz);
            quiz.advance_group();
        }
    }

    #[test]
    fn test_options_are_the_group() {
        let quiz = quiz_with_seed(1);
        let mut options: Vec<char> = quiz.options().to_vec();
        options.sort_unstable();
        let mut group: Vec<char> = quiz.group().to_vec();
        group.sort_unstable();
        assert_eq!(options, group);
    }

    #[test]
    fn test_missing_letter_walkthrough() {
        // グループ [A,B,C,D,E] で B と D が隠れている場合の一連の流れ
        let mut quiz = quiz_with_seed(0);
        quiz.force_hidden(&[1, 3]);

        let effects = quiz.submit_answer('D');
        assert_eq!(quiz.solved().iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(quiz.feedback(), PROMPT_MESSAGE); // まだお祝いしない
        assert_eq!(
            effects,
            vec![Effect::Haptic {
                kind: HapticKind::Success
            }]
        );

        let effects = quiz.submit_answer('B');
        assert!(quiz.round_complete());
        assert_eq!(quiz.feedback(), CELEBRATE_MESSAGE);
        assert_eq!(effects.len(), 2); // 成功ハプティクス + お祝いの読み上げ
    }

    #[test]
    fn test_wrong_answer_never_touches_solved() {
        let mut quiz = quiz_with_seed(0);
        quiz.force_hidden(&[1, 3]);

        let effects = quiz.submit_answer('A'); // 隠れていない文字
        assert!(quiz.solved().is_empty());
        assert_eq!(quiz.feedback(), RETRY_MESSAGE);
        assert_eq!(
            effects,
            vec![Effect::Haptic {
                kind: HapticKind::Error
            }]
        );

        // グループ外の文字も同じ扱い
        quiz.submit_answer('Z');
        assert!(quiz.solved().is_empty());
    }

    #[test]
    fn test_resubmitting_solved_letter_counts_as_wrong() {
        let mut quiz = quiz_with_seed(0);
        quiz.force_hidden(&[1, 3]);

        quiz.submit_answer('B');
        // 正解済みの B をもう一度選ぶと不正解の扱いになる
        let effects = quiz.submit_answer('B');
        assert_eq!(quiz.feedback(), RETRY_MESSAGE);
        assert_eq!(
            effects,
            vec![Effect::Haptic {
                kind: HapticKind::Error
            }]
        );
        assert_eq!(quiz.solved().len(), 1);
    }

    #[test]
    fn test_advance_requires_completion_and_wraps() {
        let mut quiz = quiz_with_seed(3);

        // 未完了では進めない
        quiz.advance_group();
        assert_eq!(quiz.group_index(), 0);

        // 5グループ回ると先頭へ戻る
        for expected in [1, 2, 3, 4, 0] {
            solve_round(&mut quiz);
            quiz.advance_group();
            assert_eq!(quiz.group_index(), expected);
            assert!(quiz.solved().is_empty());
            assert_eq!(quiz.feedback(), PROMPT_MESSAGE);
        }
    }
}
