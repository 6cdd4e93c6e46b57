/*
 * src/alphabet.rs
 * アルファベット26文字の固定メタデータを管理するモジュール
 */

/// 1文字ぶんのカードデータ
#[derive(Copy, Clone, Debug)]
pub struct LetterCard {
    pub letter: char,        // 'A' 〜 'Z'
    pub word: &'static str,  // 連想単語（カード裏面と読み上げ用）
    pub emoji: &'static str, // カード裏面の絵文字
}

/// 文字カード一覧 (A〜Z の26枚固定)
pub const ALPHABET: &[LetterCard] = &[
    LetterCard { letter: 'A', word: "Apple", emoji: "🍎" },
    LetterCard { letter: 'B', word: "Ball", emoji: "⚽" },
    LetterCard { letter: 'C', word: "Cat", emoji: "🐱" },
    LetterCard { letter: 'D', word: "Dog", emoji: "🐶" },
    LetterCard { letter: 'E', word: "Elephant", emoji: "🐘" },
    LetterCard { letter: 'F', word: "Fish", emoji: "🐟" },
    LetterCard { letter: 'G', word: "Goat", emoji: "🐐" },
    LetterCard { letter: 'H', word: "Hat", emoji: "🎩" },
    LetterCard { letter: 'I', word: "Ice cream", emoji: "🍦" },
    LetterCard { letter: 'J', word: "Juice", emoji: "🧃" },
    LetterCard { letter: 'K', word: "Kite", emoji: "🪁" },
    LetterCard { letter: 'L', word: "Lion", emoji: "🦁" },
    LetterCard { letter: 'M', word: "Monkey", emoji: "🐵" },
    LetterCard { letter: 'N', word: "Nose", emoji: "👃" },
    LetterCard { letter: 'O', word: "Orange", emoji: "🍊" },
    LetterCard { letter: 'P', word: "Pig", emoji: "🐷" },
    LetterCard { letter: 'Q', word: "Queen", emoji: "👑" },
    LetterCard { letter: 'R', word: "Rabbit", emoji: "🐰" },
    LetterCard { letter: 'S', word: "Sun", emoji: "☀️" },
    LetterCard { letter: 'T', word: "Tiger", emoji: "🐯" },
    LetterCard { letter: 'U', word: "Umbrella", emoji: "☂️" },
    LetterCard { letter: 'V', word: "Van", emoji: "🚐" },
    LetterCard { letter: 'W', word: "Watch", emoji: "⌚" },
    LetterCard { letter: 'X', word: "Xylophone", emoji: "🎵" },
    LetterCard { letter: 'Y', word: "Yo-yo", emoji: "🪀" },
    LetterCard { letter: 'Z', word: "Zebra", emoji: "🦓" },
];

/// クイズ用の文字グループ (固定の5分割、最後だけ6文字)
pub const LETTER_GROUPS: &[&[char]] = &[
    &['A', 'B', 'C', 'D', 'E'],
    &['F', 'G', 'H', 'I', 'J'],
    &['K', 'L', 'M', 'N', 'O'],
    &['P', 'Q', 'R', 'S', 'T'],
    &['U', 'V', 'W', 'X', 'Y', 'Z'],
];

/// カードの色タグ (7色の循環)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorTag {
    Orange,
    Blue,
    Green,
    Red,
    Purple,
    Pink,
    Cyan,
}

const COLOR_CYCLE: [ColorTag; 7] = [
    ColorTag::Orange,
    ColorTag::Blue,
    ColorTag::Green,
    ColorTag::Red,
    ColorTag::Purple,
    ColorTag::Pink,
    ColorTag::Cyan,
];

/// 文字に対応する色タグ (コードポイントの剰余で循環させる)
pub fn color_tag(letter: char) -> ColorTag {
    COLOR_CYCLE[(letter as usize) % COLOR_CYCLE.len()]
}

/// 文字に対応するカードを引く (A〜Z 以外は None)
pub fn card_for(letter: char) -> Option<&'static LetterCard> {
    ALPHABET.iter().find(|card| card.letter == letter)
}

/// 読み上げ速度 (ゆっくりめ)
pub const SPEECH_RATE: f32 = 0.38;
/// 読み上げの言語ヒント
pub const SPEECH_LANG: &str = "en-US";

/// フラッシュカード用の読み上げフレーズ
/// ("L" だけは吠え声つきの決まり文句になる)
pub fn speech_phrase(card: &LetterCard) -> String {
    if card.letter == 'L' {
        format!("{0}..... {0} is for {1}. Roar!", card.letter, card.word)
    } else {
        format!("{0}..... {0} is for {1}", card.letter, card.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_is_complete() {
        assert_eq!(ALPHABET.len(), 26);
        for (i, card) in ALPHABET.iter().enumerate() {
            assert_eq!(card.letter, (b'A' + i as u8) as char);
            assert!(!card.word.is_empty());
        }
    }

    #[test]
    fn test_groups_cover_alphabet_once() {
        let flat: Vec<char> = LETTER_GROUPS.iter().flat_map(|g| g.iter().copied()).collect();
        let expected: Vec<char> = ALPHABET.iter().map(|card| card.letter).collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_card_lookup() {
        assert_eq!(card_for('A').unwrap().word, "Apple");
        assert_eq!(card_for('Z').unwrap().word, "Zebra");
        assert!(card_for('a').is_none());
        assert!(card_for('?').is_none());
    }

    #[test]
    fn test_speech_phrase() {
        let a = card_for('A').unwrap();
        assert_eq!(speech_phrase(a), "A..... A is for Apple");
        // "L" だけ特別な言い回し
        let l = card_for('L').unwrap();
        assert_eq!(speech_phrase(l), "L..... L is for Lion. Roar!");
    }

    #[test]
    fn test_color_cycle() {
        // 7文字ごとに同じ色へ戻る
        assert_eq!(color_tag('A'), color_tag('H'));
        assert_ne!(color_tag('A'), color_tag('B'));
    }
}
