/*
 * src/effects.rs
 * ゲームロジックが UI 側へ依頼する副作用の定義
 */

use serde::{Deserialize, Serialize};

/// 触覚フィードバックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticKind {
    Success,
    Error,
    LightImpact,
}

/// 遅延実行されるコールバック
///
/// `round` / `turn` は予約した時点の世代トークン。発火時に現在の世代と
/// 一致しなければ、そのコールバックは何もせず捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayedAction {
    /// ミスマッチ表示を解除する (マッチング)
    ClearMismatch { round: u32 },
    /// 全部そろったあと次のラウンドを配る (マッチング)
    NextRound { round: u32 },
    /// ボットの返事をログに載せる (おしゃべり)
    BotReply { turn: u32 },
    /// 最初の質問をログに載せる (おしゃべり)
    FirstQuestion { turn: u32 },
}

/// 状態機械が発行する副作用リクエスト
///
/// 状態機械そのものは描画も発声もタイマー待ちもしない。操作のたびに
/// このリクエスト列を返し、イベントループ側が実行する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// 読み上げ依頼 (新しい依頼は再生中の発話を打ち切って差し替える)
    Speak {
        text: String,
        rate: f32,
        language: String,
    },
    /// 触覚フィードバック依頼
    Haptic { kind: HapticKind },
    /// 指定ミリ秒後のコールバック予約
    ScheduleAfter { delay_ms: u64, action: DelayedAction },
}

impl Effect {
    /// 標準の速度・言語で読み上げ依頼を作る
    pub fn speak(text: impl Into<String>) -> Self {
        Effect::Speak {
            text: text.into(),
            rate: crate::alphabet::SPEECH_RATE,
            language: crate::alphabet::SPEECH_LANG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::ScheduleAfter {
            delay_ms: 500,
            action: DelayedAction::ClearMismatch { round: 3 },
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("schedule_after"));
        assert!(json.contains("clear_mismatch"));
        assert!(json.contains("500"));
    }

    #[test]
    fn test_effect_round_trip() {
        let effect = Effect::Haptic {
            kind: HapticKind::LightImpact,
        };
        let json = serde_json::to_string(&effect).unwrap();
        let back: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }

    #[test]
    fn test_speak_defaults() {
        let Effect::Speak { text, rate, language } = Effect::speak("hello") else {
            panic!("expected speak");
        };
        assert_eq!(text, "hello");
        assert_eq!(rate, crate::alphabet::SPEECH_RATE);
        assert_eq!(language, crate::alphabet::SPEECH_LANG);
    }
}
