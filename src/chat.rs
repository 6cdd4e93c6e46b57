/*
 * src/chat.rs
 * おしゃべりボット (台本どおりに進む会話) の状態管理
 */

use crate::effects::{DelayedAction, Effect};

/// ボットの返事までの時間
pub const REPLY_DELAY_MS: u64 = 800;
/// 画面に入ってから最初の質問までの時間
pub const FIRST_QUESTION_DELAY_MS: u64 = 1000;

/// 最初のあいさつ
pub const GREETING: &str = "Hi! I'm Abby the ABC robot! Let's play! 🤖";

/// 回答の選択肢と、それに対する決まった返事
#[derive(Debug, Clone, Copy)]
pub struct ChatOption {
    pub text: &'static str,
    pub reply: &'static str,
}

/// 質問1つぶんの台本
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub question: &'static str,
    pub options: [ChatOption; 3],
}

/// 会話の台本 (固定)
pub const SCRIPT: &[Scenario] = &[
    Scenario {
        question: "What animal says 'Roar'?",
        options: [
            ChatOption { text: "Lion", reply: "Yes! L is for Lion! Roar! 🦁" },
            ChatOption { text: "Cat", reply: "A cat says meow! The roaring one is the Lion! 🦁" },
            ChatOption { text: "Fish", reply: "Fish are very quiet! It's the Lion that roars! 🦁" },
        ],
    },
    Scenario {
        question: "Which fruit is red and crunchy?",
        options: [
            ChatOption { text: "Apple", reply: "Yum! A is for Apple! 🍎" },
            ChatOption { text: "Orange", reply: "Oranges are orange! The red crunchy one is the Apple! 🍎" },
            ChatOption { text: "Juice", reply: "Juice is a drink! I was thinking of the Apple! 🍎" },
        ],
    },
    Scenario {
        question: "What do you fly in the sky on a windy day?",
        options: [
            ChatOption { text: "Kite", reply: "Whee! K is for Kite! 🪁" },
            ChatOption { text: "Hat", reply: "A hat stays on your head! You fly a Kite! 🪁" },
            ChatOption { text: "Van", reply: "A van drives on the road! A Kite flies in the sky! 🪁" },
        ],
    },
    Scenario {
        question: "Who wears a crown?",
        options: [
            ChatOption { text: "Queen", reply: "Yes! Q is for Queen! 👑" },
            ChatOption { text: "Pig", reply: "Pigs say oink! The Queen wears the crown! 👑" },
            ChatOption { text: "Monkey", reply: "Monkeys love bananas! The Queen wears the crown! 👑" },
        ],
    },
    Scenario {
        question: "Which one keeps you dry in the rain?",
        options: [
            ChatOption { text: "Umbrella", reply: "That's right! U is for Umbrella! ☂️" },
            ChatOption { text: "Sun", reply: "The sun makes it warm! The Umbrella keeps the rain off! ☂️" },
            ChatOption { text: "Zebra", reply: "A zebra is stripy! The Umbrella keeps you dry! ☂️" },
        ],
    },
];

/// 発言者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Bot,
    Child,
}

/// 会話ログの1行
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// 台本どおりに進むおしゃべりボット
///
/// 会話ログは追記されるだけで縮まない。遅延発火する返事は `turn` の
/// 世代トークンで守られ、話が先へ進んでいたら捨てられる。
pub struct ScriptedDialogue {
    scenario_index: usize,
    transcript: Vec<ChatMessage>,
    awaiting_answer: bool,
    turn: u32,
    pending_reply: Option<&'static str>,
}

impl Default for ScriptedDialogue {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDialogue {
    pub fn new() -> Self {
        Self {
            scenario_index: 0,
            transcript: vec![ChatMessage {
                speaker: Speaker::Bot,
                text: GREETING.to_string(),
            }],
            awaiting_answer: true,
            turn: 0,
            pending_reply: None,
        }
    }

    /// 現在の台本
    pub fn scenario(&self) -> &'static Scenario {
        &SCRIPT[self.scenario_index]
    }

    pub fn scenario_index(&self) -> usize {
        self.scenario_index
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    /// 画面に入った直後に呼ぶ。最初の質問を少し遅らせて予約する。
    pub fn start(&mut self) -> Vec<Effect> {
        vec![Effect::ScheduleAfter {
            delay_ms: FIRST_QUESTION_DELAY_MS,
            action: DelayedAction::FirstQuestion { turn: self.turn },
        }]
    }

    /// 選択肢を選ぶ。返事は少し遅れて届く。
    pub fn select_option(&mut self, option_index: usize) -> Vec<Effect> {
        if !self.awaiting_answer {
            return Vec::new();
        }
        let Some(option) = self.scenario().options.get(option_index) else {
            return Vec::new();
        };

        self.transcript.push(ChatMessage {
            speaker: Speaker::Child,
            text: option.text.to_string(),
        });
        self.awaiting_answer = false;
        self.turn += 1;
        self.pending_reply = Some(option.reply);

        vec![Effect::ScheduleAfter {
            delay_ms: REPLY_DELAY_MS,
            action: DelayedAction::BotReply { turn: self.turn },
        }]
    }

    /// 次の質問へ進む (返事待ちの間は無効)
    pub fn next_question(&mut self) -> Vec<Effect> {
        if self.awaiting_answer {
            return Vec::new();
        }
        // まだ届いていない返事は破棄する
        self.turn += 1;
        self.pending_reply = None;
        self.scenario_index = (self.scenario_index + 1) % SCRIPT.len();
        self.push_question()
    }

    /// 現在の質問をログに載せて読み上げを依頼する
    fn push_question(&mut self) -> Vec<Effect> {
        let question = self.scenario().question;
        self.transcript.push(ChatMessage {
            speaker: Speaker::Bot,
            text: question.to_string(),
        });
        self.awaiting_answer = true;
        vec![Effect::speak(question)]
    }

    /// 予約済みコールバックの発火 (世代が古いものは何もしない)
    pub fn fire_delayed(&mut self, action: &DelayedAction) -> Vec<Effect> {
        match *action {
            DelayedAction::FirstQuestion { turn } if turn == self.turn => self.push_question(),
            DelayedAction::BotReply { turn } if turn == self.turn => {
                let Some(reply) = self.pending_reply.take() else {
                    return Vec::new();
                };
                self.transcript.push(ChatMessage {
                    speaker: Speaker::Bot,
                    text: reply.to_string(),
                });
                vec![Effect::speak(reply)]
            }
            _ => Vec::new(),
        }
    }
}
