/*
 * src/speech.rs
 * 読み上げと触覚フィードバックのサービス境界
 */

use std::time::{Duration, Instant};

use crate::effects::HapticKind;

/// 読み上げサービス (発話の完了は待たない)
pub trait SpeechService {
    /// `text` を読み上げる。再生中の発話があれば打ち切って差し替える。
    fn speak(&mut self, text: &str, rate: f32, language: &str);
}

/// 触覚フィードバックサービス
pub trait FeedbackService {
    fn notify(&mut self, kind: HapticKind);
}

/// 端末用の読み上げ実装
/// (音声合成の代わりに、ステータス行への表示とログで発話を表現する)
#[derive(Debug, Default)]
pub struct TerminalSpeech {
    current: Option<String>,
}

impl TerminalSpeech {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// いま「再生中」の発話テキスト
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl SpeechService for TerminalSpeech {
    fn speak(&mut self, text: &str, rate: f32, language: &str) {
        log::debug!("speak rate={rate} lang={language} text={text:?}");
        self.current = Some(text.to_string());
    }
}

/// フラッシュ表示の継続時間
const FLASH_DURATION: Duration = Duration::from_millis(400);

/// 端末用の触覚フィードバック実装 (短い点滅表示に変換する)
#[derive(Debug, Default)]
pub struct TerminalFeedback {
    flash: Option<(HapticKind, Instant)>,
}

impl TerminalFeedback {
    pub fn new() -> Self {
        Self { flash: None }
    }

    /// `now` 時点で表示すべきフラッシュがあれば返す
    pub fn active(&self, now: Instant) -> Option<HapticKind> {
        self.flash
            .and_then(|(kind, at)| (now.duration_since(at) < FLASH_DURATION).then_some(kind))
    }
}

impl FeedbackService for TerminalFeedback {
    fn notify(&mut self, kind: HapticKind) {
        log::debug!("haptic {kind:?}");
        self.flash = Some((kind, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_replaces_current() {
        let mut speech = TerminalSpeech::new();
        assert!(speech.current().is_none());

        speech.speak("A..... A is for Apple", 0.38, "en-US");
        speech.speak("B..... B is for Ball", 0.38, "en-US");
        // 新しい発話が前の発話を打ち切る
        assert_eq!(speech.current(), Some("B..... B is for Ball"));
    }

    #[test]
    fn test_flash_expires() {
        let mut feedback = TerminalFeedback::new();
        assert!(feedback.active(Instant::now()).is_none());

        feedback.notify(HapticKind::Success);
        assert_eq!(feedback.active(Instant::now()), Some(HapticKind::Success));
        let later = Instant::now() + FLASH_DURATION + Duration::from_millis(50);
        assert!(feedback.active(later).is_none());
    }
}
