use std::io::{self, Write};
use std::time::{Duration, Instant};

use clap::Args;
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::debug;
use whackamole_core::{Difficulty, Event, GameController, Position, Presenter};

/// Longest wait between redraws when nothing is scheduled.
const IDLE_POLL_MS: u64 = 100;

/// Key that whacks each hole, in board order. `q` is reserved for quitting.
const HOLE_KEYS: &str = "1234567890abcdefghijklmnoprstuvwxyz";

#[derive(Args)]
pub struct PlayArgs {
    /// easy, normal or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Game length in seconds
    #[arg(long)]
    duration: Option<u32>,
    /// Number of holes
    #[arg(long)]
    holes: Option<usize>,
    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Draws the board as a grid of holes labelled with their keys.
struct TerminalPresenter {
    holes: Vec<bool>,
    score: u32,
    remaining_secs: u32,
    label: String,
    dirty: bool,
}

impl TerminalPresenter {
    fn new(hole_count: usize) -> Self {
        Self {
            holes: vec![false; hole_count],
            score: 0,
            remaining_secs: 0,
            label: String::new(),
            dirty: true,
        }
    }

    fn render(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "score {}   time {}s   [{}]",
                self.score, self.remaining_secs, self.label
            ),
            String::new(),
        ];
        let columns = columns_for(self.holes.len());
        let keys: Vec<char> = HOLE_KEYS.chars().collect();
        for (row_index, cells) in self.holes.chunks(columns).enumerate() {
            let line: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col, up)| {
                    if *up {
                        "(o)".to_string()
                    } else {
                        format!(" {} ", keys[row_index * columns + col])
                    }
                })
                .collect();
            lines.push(line.join(" "));
        }
        lines.push(String::new());
        lines.push("press a hole's key to whack it, q to quit".to_string());
        lines
    }

    /// Redraw the screen if anything changed since the last draw.
    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        for line in self.render() {
            queue!(out, Print(line), MoveToNextLine(1))?;
        }
        out.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn set_visible(&mut self, position: Position, visible: bool) {
        if let Some(hole) = self.holes.get_mut(position.index()) {
            *hole = visible;
            self.dirty = true;
        }
    }

    fn publish_score(&mut self, score: u32) {
        self.score = score;
        self.dirty = true;
    }

    fn publish_remaining_time(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.dirty = true;
    }

    fn set_start_trigger(&mut self, _enabled: bool, label: &str) {
        self.label = label.to_string();
        self.dirty = true;
    }
}

/// Raw mode on an alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn columns_for(count: usize) -> usize {
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    columns
}

/// What a key press asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Whack(Position),
    Quit,
    Ignored,
}

fn key_command(key: KeyEvent, hole_count: usize) -> Command {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char(c) => HOLE_KEYS
            .chars()
            .take(hole_count)
            .position(|k| k == c.to_ascii_lowercase())
            .map_or(Command::Ignored, |index| Command::Whack(Position::new(index))),
        _ => Command::Ignored,
    }
}

fn millis_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn is_ready(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::GameReady { .. }))
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::game_config(args.difficulty, args.duration, args.holes, args.seed)?;
    if config.hole_count > HOLE_KEYS.len() {
        return Err(format!(
            "play supports at most {} holes, got {}",
            HOLE_KEYS.len(),
            config.hole_count
        )
        .into());
    }
    let hole_count = config.hole_count;
    let mut game = GameController::new(config, TerminalPresenter::new(hole_count))?;

    let terminal = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let started = Instant::now();
    log_events(&game.start()?);

    loop {
        let now = millis_since(started);
        let events = game.advance_to(now)?;
        log_events(&events);
        game.presenter_mut().draw(&mut stdout)?;
        if is_ready(&events) {
            break;
        }

        let wait = game
            .next_deadline()
            .map_or(IDLE_POLL_MS, |due| due.saturating_sub(now).min(IDLE_POLL_MS));
        if !event::poll(Duration::from_millis(wait))? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        // Fire anything due before the key press counts.
        let events = game.advance_to(millis_since(started))?;
        log_events(&events);
        match key_command(key, hole_count) {
            Command::Whack(position) => {
                if let Some(event) = game.whack(position)? {
                    log_events(&[event]);
                }
            }
            Command::Quit => {
                let stopped = game.stop();
                if stopped.is_empty() {
                    break;
                }
                log_events(&stopped);
            }
            Command::Ignored => {}
        }
        if is_ready(&events) {
            break;
        }
    }

    drop(terminal);
    println!("Final score: {}", game.state().score());
    Ok(())
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!(?event, "game event");
    }
}
