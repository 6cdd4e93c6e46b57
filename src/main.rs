// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::io::stdout;
use std::time::{Duration, Instant};

// 各ミニゲームのモジュール
mod alphabet;
mod chat;
mod effects;
mod flashcards;
mod matching;
mod quiz;
mod scheduler;
mod speech;

use alphabet::{ALPHABET, ColorTag};
use chat::{ScriptedDialogue, Speaker};
use effects::{Effect, HapticKind};
use flashcards::FlashcardDeck;
use matching::{Difficulty, MatchItem, MatchingPairsGame, Side};
use quiz::MissingLetterQuiz;
use scheduler::Scheduler;
use speech::{FeedbackService, SpeechService, TerminalFeedback, TerminalSpeech};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use dialoguer::{Select, theme::ColorfulTheme};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

// --------------------------------------------------
// コマンドライン引数
// --------------------------------------------------

/// ABC WiZ ! (こどもむけアルファベット学習ゲーム)
#[derive(Parser, Debug)]
#[command(name = "abcwiz")]
#[command(about = "ABC WiZ ! アルファベットであそぼう")]
struct Args {
    /// 起動時に直接はじめるゲーム (省略時はメニューを表示)
    #[arg(long, value_enum)]
    game: Option<GameKind>,

    /// マッチングをハードモード (裏向き) ではじめる
    #[arg(long)]
    hard: bool,

    /// 乱数シード (同じ出題を再現したいとき用)
    #[arg(long)]
    seed: Option<u64>,
}

/// ミニゲームの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GameKind {
    /// フラッシュカード (めくって おぼえる)
    Flashcards,
    /// 欠けた文字あてクイズ
    Quiz,
    /// 大文字・小文字マッチング
    Matching,
    /// おしゃべりボット
    Chat,
}

/// 乱数源を作る (シード指定があれば再現可能にする)
fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

// --------------------------------------------------
// アプリ状態
// --------------------------------------------------

/// フラッシュカード盤面の列数
const GRID_COLS: usize = 7;

/// 実行中のミニゲーム (カーソルは盤面上の位置)
enum ActiveGame {
    Flashcards { deck: FlashcardDeck, cursor: usize },
    Quiz { quiz: MissingLetterQuiz, cursor: usize },
    Matching { game: MatchingPairsGame, cursor: usize },
    Chat { dialogue: ScriptedDialogue, cursor: usize },
}

/// 1ゲームぶんのアプリ状態
///
/// 状態機械は操作のたびに副作用リクエストを返し、ここで実行される。
/// 画面を離れるとゲーム状態も未発火の予約もまとめて捨てられる。
struct App {
    game: ActiveGame,
    scheduler: Scheduler,
    speech: TerminalSpeech,
    feedback: TerminalFeedback,
}

impl App {
    fn new(kind: GameKind, seed: Option<u64>, hard: bool) -> Self {
        let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
        let game = match kind {
            GameKind::Flashcards => ActiveGame::Flashcards {
                deck: FlashcardDeck::new(),
                cursor: 0,
            },
            GameKind::Quiz => ActiveGame::Quiz {
                quiz: MissingLetterQuiz::new(make_rng(seed)),
                cursor: 0,
            },
            GameKind::Matching => ActiveGame::Matching {
                game: MatchingPairsGame::new(make_rng(seed), difficulty),
                cursor: 0,
            },
            GameKind::Chat => ActiveGame::Chat {
                dialogue: ScriptedDialogue::new(),
                cursor: 0,
            },
        };

        let mut app = Self {
            game,
            scheduler: Scheduler::new(),
            speech: TerminalSpeech::new(),
            feedback: TerminalFeedback::new(),
        };

        // おしゃべりだけは最初の質問を予約してから始まる
        let effects = match &mut app.game {
            ActiveGame::Chat { dialogue, .. } => dialogue.start(),
            _ => Vec::new(),
        };
        app.apply_effects(effects);
        app
    }

    /// 状態機械が発行した副作用を実行する
    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if log::log_enabled!(log::Level::Debug) {
                if let Ok(json) = serde_json::to_string(&effect) {
                    log::debug!("effect {json}");
                }
            }
            match effect {
                Effect::Speak { text, rate, language } => self.speech.speak(&text, rate, &language),
                Effect::Haptic { kind } => self.feedback.notify(kind),
                Effect::ScheduleAfter { delay_ms, action } => self
                    .scheduler
                    .schedule(Duration::from_millis(delay_ms), action),
            }
        }
    }

    /// 発火時刻が来た遅延コールバックを状態機械へ流す
    fn pump_scheduler(&mut self) {
        for action in self.scheduler.drain_due(Instant::now()) {
            let effects = match &mut self.game {
                ActiveGame::Matching { game, .. } => game.fire_delayed(&action),
                ActiveGame::Chat { dialogue, .. } => dialogue.fire_delayed(&action),
                _ => Vec::new(),
            };
            self.apply_effects(effects);
        }
    }

    /// キー入力の処理 (true を返したら画面を抜ける)
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if code == KeyCode::Esc {
            return true;
        }
        let effects = match &mut self.game {
            ActiveGame::Flashcards { deck, cursor } => handle_flashcards_key(deck, cursor, code),
            ActiveGame::Quiz { quiz, cursor } => handle_quiz_key(quiz, cursor, code),
            ActiveGame::Matching { game, cursor } => handle_matching_key(game, cursor, code),
            ActiveGame::Chat { dialogue, cursor } => handle_chat_key(dialogue, cursor, code),
        };
        self.apply_effects(effects);
        false
    }
}

// --------------------------------------------------
// キー操作 (ゲームごと)
// --------------------------------------------------

/// フラッシュカード画面のキー操作
fn handle_flashcards_key(deck: &mut FlashcardDeck, cursor: &mut usize, code: KeyCode) -> Vec<Effect> {
    let last = ALPHABET.len() - 1;
    match code {
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Right => {
            *cursor = (*cursor + 1).min(last);
            Vec::new()
        }
        KeyCode::Up => {
            *cursor = cursor.saturating_sub(GRID_COLS);
            Vec::new()
        }
        KeyCode::Down => {
            *cursor = (*cursor + GRID_COLS).min(last);
            Vec::new()
        }
        KeyCode::Enter => deck.reveal(ALPHABET[*cursor].letter),
        // 文字キーで直接めくれる
        KeyCode::Char(c) if c.is_ascii_alphabetic() => deck.reveal(c.to_ascii_uppercase()),
        _ => Vec::new(),
    }
}

/// クイズ画面のキー操作
fn handle_quiz_key(quiz: &mut MissingLetterQuiz, cursor: &mut usize, code: KeyCode) -> Vec<Effect> {
    match code {
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Right => {
            *cursor = (*cursor + 1).min(quiz.options().len() - 1);
            Vec::new()
        }
        KeyCode::Enter => {
            let letter = quiz.options()[*cursor];
            quiz.submit_answer(letter)
        }
        KeyCode::Char('n') => {
            quiz.advance_group();
            // グループによって選択肢の数が変わる (5文字 or 6文字)
            *cursor = (*cursor).min(quiz.options().len() - 1);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// マッチング画面のキー操作 (カーソルは 左列 0..4, 右列 4..8)
fn handle_matching_key(game: &mut MatchingPairsGame, cursor: &mut usize, code: KeyCode) -> Vec<Effect> {
    let column_len = matching::DEAL_COUNT;
    let row = *cursor % column_len;
    let in_right = *cursor >= column_len;
    match code {
        KeyCode::Up => {
            if row > 0 {
                *cursor -= 1;
            }
            Vec::new()
        }
        KeyCode::Down => {
            if row + 1 < column_len {
                *cursor += 1;
            }
            Vec::new()
        }
        KeyCode::Left => {
            if in_right {
                *cursor -= column_len;
            }
            Vec::new()
        }
        KeyCode::Right => {
            if !in_right {
                *cursor += column_len;
            }
            Vec::new()
        }
        KeyCode::Enter => {
            let (side, id) = if in_right {
                (Side::Right, game.right()[row].id)
            } else {
                (Side::Left, game.left()[row].id)
            };
            game.select_item(side, id)
        }
        KeyCode::Char('h') => {
            // むずかしさを切り替えて配り直す
            let next = match game.difficulty() {
                Difficulty::Easy => Difficulty::Hard,
                Difficulty::Hard => Difficulty::Easy,
            };
            game.start_round(next);
            Vec::new()
        }
        KeyCode::Char('r') => {
            let difficulty = game.difficulty();
            game.start_round(difficulty);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// おしゃべり画面のキー操作
fn handle_chat_key(dialogue: &mut ScriptedDialogue, cursor: &mut usize, code: KeyCode) -> Vec<Effect> {
    let last = dialogue.scenario().options.len() - 1;
    match code {
        KeyCode::Left | KeyCode::Up => {
            *cursor = cursor.saturating_sub(1);
            Vec::new()
        }
        KeyCode::Right | KeyCode::Down => {
            *cursor = (*cursor + 1).min(last);
            Vec::new()
        }
        KeyCode::Enter => dialogue.select_option(*cursor),
        KeyCode::Char('n') => dialogue.next_question(),
        _ => Vec::new(),
    }
}

// --------------------------------------------------
// メイン関数 (メニューと TUI 実行ループ)
// --------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("ABC WiZ 起動");

    // --game 指定があれば直接そのゲームへ
    if let Some(kind) = args.game {
        run_game(kind, &args)?;
        return Ok(());
    }

    loop {
        let Some(kind) = select_game()? else {
            break;
        };
        run_game(kind, &args)?;
    }
    Ok(())
}

/// スタートメニュー (あそぶゲームを選ぶ)
fn select_game() -> Result<Option<GameKind>> {
    println!();
    println!("  {}", style("ABC WiZ !").bold().magenta());
    println!("  {}", style("アルファベットであそぼう").dim());
    println!();

    let items = [
        "フラッシュカード (めくって おぼえる)",
        "クイズ (きえた もじを さがす)",
        "マッチング (おおきい もじと ちいさい もじ)",
        "おしゃべり (ロボットと はなす)",
        "おわる",
    ];
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("どのゲームで あそぶ？")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match index {
        0 => Some(GameKind::Flashcards),
        1 => Some(GameKind::Quiz),
        2 => Some(GameKind::Matching),
        3 => Some(GameKind::Chat),
        _ => None,
    })
}

/// 1ゲームぶんの TUI 実行 (Esc でメニューへ戻る)
fn run_game(kind: GameKind, args: &Args) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, kind, args);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, kind: GameKind, args: &Args) -> Result<()> {
    let mut app = App::new(kind, args.seed, args.hard);

    loop {
        // 発火待ちの遅延コールバックを先に流してから描画する
        app.pump_scheduler();
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    if app.handle_key(key.code) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// UI描画
// --------------------------------------------------

/// 色タグを端末色へ変換する
fn tag_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Orange => Color::Rgb(255, 150, 60),
        ColorTag::Blue => Color::Blue,
        ColorTag::Green => Color::Green,
        ColorTag::Red => Color::Red,
        ColorTag::Purple => Color::Rgb(170, 100, 240),
        ColorTag::Pink => Color::Rgb(255, 120, 180),
        ColorTag::Cyan => Color::Cyan,
    }
}

fn ui(f: &mut Frame, app: &App) {
    let title = match &app.game {
        ActiveGame::Flashcards { .. } => "ABC WiZ ! - フラッシュカード",
        ActiveGame::Quiz { .. } => "ABC WiZ ! - クイズ",
        ActiveGame::Matching { .. } => "ABC WiZ ! - マッチング",
        ActiveGame::Chat { .. } => "ABC WiZ ! - おしゃべり",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_area = block.inner(f.area());
    f.render_widget(block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] ステータスバー (フィードバックと読み上げ)
            Constraint::Length(1), // [1] 空白
            Constraint::Min(1),    // [2] ゲーム盤面
            Constraint::Length(1), // [3] 操作ガイド
        ])
        .split(inner_area);

    render_status(f, app, chunks[0]);
    match &app.game {
        ActiveGame::Flashcards { deck, cursor } => render_flashcards(f, deck, *cursor, chunks[2]),
        ActiveGame::Quiz { quiz, cursor } => render_quiz(f, quiz, *cursor, chunks[2]),
        ActiveGame::Matching { game, cursor } => render_matching(f, game, *cursor, chunks[2]),
        ActiveGame::Chat { dialogue, cursor } => render_chat(f, dialogue, *cursor, chunks[2]),
    }
    render_help(f, app, chunks[3]);
}

/// ステータスバー (ハプティクスの点滅と読み上げ中のテキスト)
fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(kind) = app.feedback.active(Instant::now()) {
        spans.push(match kind {
            HapticKind::Success => Span::styled(" ◎ ", Style::default().fg(Color::Green).bold()),
            HapticKind::Error => Span::styled(" ✗ ", Style::default().fg(Color::Red).bold()),
            HapticKind::LightImpact => Span::styled(" ・ ", Style::default().fg(Color::Gray)),
        });
    }
    if let Some(text) = app.speech.current() {
        spans.push(Span::styled(
            format!("🔊 {text}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// フラッシュカード盤面 (7列グリッド)
fn render_flashcards(f: &mut Frame, deck: &FlashcardDeck, cursor: usize, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (row_index, row) in ALPHABET.chunks(GRID_COLS).enumerate() {
        let mut spans: Vec<Span> = Vec::new();
        for (col_index, card) in row.iter().enumerate() {
            let index = row_index * GRID_COLS + col_index;
            let revealed = deck.revealed() == Some(card.letter);
            let color = tag_color(alphabet::color_tag(card.letter));

            // 表は文字だけ、裏は絵文字と単語
            let (text, mut style) = if revealed {
                (
                    format!(" {} {} ", card.emoji, card.word),
                    Style::default().fg(Color::Black).bg(color),
                )
            } else {
                (format!("  {}  ", card.letter), Style::default().fg(color).bold())
            };
            if index == cursor {
                style = style.underlined();
            }
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).centered(), area);
}

/// クイズ盤面
fn render_quiz(f: &mut Frame, quiz: &MissingLetterQuiz, cursor: usize, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(
        Line::from(format!(
            "グループ {} / {}",
            quiz.group_index() + 1,
            alphabet::LETTER_GROUPS.len()
        ))
        .style(Style::default().fg(Color::White).bold()),
    );
    lines.push(Line::from(""));

    // 出題の文字列 (隠れている位置は ? で表示)
    let mut slots: Vec<Span> = Vec::new();
    for (index, &letter) in quiz.group().iter().enumerate() {
        let hidden = quiz.hidden().contains(&index);
        let solved = quiz.solved().contains(&index);
        let (text, style) = if hidden && !solved {
            ("[ ? ]".to_string(), Style::default().fg(Color::DarkGray))
        } else if hidden {
            (format!("[ {letter} ]"), Style::default().fg(Color::Green).bold())
        } else {
            (format!("[ {letter} ]"), Style::default().fg(Color::White).bold())
        };
        slots.push(Span::styled(text, style));
        slots.push(Span::raw(" "));
    }
    lines.push(Line::from(slots));
    lines.push(Line::from(""));

    lines.push(Line::from(quiz.feedback().to_string()).style(Style::default().fg(Color::Yellow)));
    lines.push(Line::from(""));

    // 回答ボタンの列
    let mut options: Vec<Span> = Vec::new();
    for (index, &letter) in quiz.options().iter().enumerate() {
        let mut style = Style::default().fg(Color::Rgb(255, 150, 60)).bold();
        if index == cursor {
            style = style.reversed();
        }
        options.push(Span::styled(format!("( {letter} )"), style));
        options.push(Span::raw(" "));
    }
    lines.push(Line::from(options));

    if quiz.round_complete() {
        lines.push(Line::from(""));
        lines.push(
            Line::from("そろった！ n キーで つぎの グループへ")
                .style(Style::default().fg(Color::Green).bold()),
        );
    }

    f.render_widget(Paragraph::new(lines).centered(), area);
}

/// マッチング盤面のカード1枚ぶんの表示
fn matching_cell(item: &MatchItem, selected: bool, under_cursor: bool) -> Span<'static> {
    let (text, mut style) = if item.matched {
        (
            format!("[ {} ] ◎", item.display),
            Style::default().fg(Color::Green),
        )
    } else if item.face_up {
        (
            format!("[ {} ]  ", item.display),
            Style::default()
                .fg(tag_color(alphabet::color_tag(item.letter)))
                .bold(),
        )
    } else {
        ("[ ? ]  ".to_string(), Style::default().fg(Color::DarkGray))
    };
    if selected {
        style = style.reversed();
    }
    if under_cursor {
        style = style.underlined();
    }
    Span::styled(text, style)
}

/// マッチング盤面 (左列が大文字、右列が小文字)
fn render_matching(f: &mut Frame, game: &MatchingPairsGame, cursor: usize, area: Rect) {
    let column_len = matching::DEAL_COUNT;
    let mut lines: Vec<Line> = Vec::new();

    let difficulty = match game.difficulty() {
        Difficulty::Easy => "やさしい",
        Difficulty::Hard => "むずかしい",
    };
    lines.push(
        Line::from(format!("ラウンド {}  ({difficulty})", game.round()))
            .style(Style::default().fg(Color::White).bold()),
    );
    lines.push(Line::from(""));

    for row in 0..column_len {
        let left_item = &game.left()[row];
        let right_item = &game.right()[row];
        let spans = vec![
            matching_cell(
                left_item,
                game.selected(Side::Left) == Some(left_item.id),
                cursor == row,
            ),
            Span::raw("      "),
            matching_cell(
                right_item,
                game.selected(Side::Right) == Some(right_item.id),
                cursor == column_len + row,
            ),
        ];
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if game.round_complete() {
        lines.push(Line::from("Perfect! 🎉").style(Style::default().fg(Color::Green).bold()));
    }

    f.render_widget(Paragraph::new(lines).centered(), area);
}

/// おしゃべり画面 (会話ログと選択肢)
fn render_chat(f: &mut Frame, dialogue: &ScriptedDialogue, cursor: usize, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    // 会話ログは画面に入るぶんだけ末尾から表示する
    let log_height = area.height.saturating_sub(4) as usize;
    let transcript = dialogue.transcript();
    let start = transcript.len().saturating_sub(log_height);
    for message in &transcript[start..] {
        let line = match message.speaker {
            Speaker::Bot => {
                Line::from(format!("🤖 {}", message.text)).style(Style::default().fg(Color::Cyan))
            }
            Speaker::Child => Line::from(format!("　　🧒 {}", message.text))
                .style(Style::default().fg(Color::Yellow)),
        };
        lines.push(line);
    }
    lines.push(Line::from(""));

    if dialogue.awaiting_answer() {
        let mut options: Vec<Span> = Vec::new();
        for (index, option) in dialogue.scenario().options.iter().enumerate() {
            let mut style = Style::default().fg(Color::Rgb(255, 150, 60)).bold();
            if index == cursor {
                style = style.reversed();
            }
            options.push(Span::styled(format!("( {} )", option.text), style));
            options.push(Span::raw(" "));
        }
        lines.push(Line::from(options));
    } else {
        lines.push(
            Line::from("n キーで つぎの しつもんへ").style(Style::default().fg(Color::DarkGray)),
        );
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// 操作ガイド
fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.game {
        ActiveGame::Flashcards { .. } => {
            "←→↑↓: えらぶ / Enter: めくる / A-Z: 直接めくる / Esc: もどる"
        }
        ActiveGame::Quiz { .. } => "←→: えらぶ / Enter: こたえる / n: つぎのグループ / Esc: もどる",
        ActiveGame::Matching { .. } => {
            "←→↑↓: えらぶ / Enter: きめる / h: むずかしさ / r: くばりなおす / Esc: もどる"
        }
        ActiveGame::Chat { .. } => "←→: えらぶ / Enter: こたえる / n: つぎのしつもん / Esc: もどる",
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
