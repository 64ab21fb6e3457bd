use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use tracing::info;
use tracing_subscriber::EnvFilter;

use morph_label::{ClockTick, EffectId, MorphConfig, MorphingLabel, TickOutcome};

const FPS: u32 = 60;

const WORDS: &[&str] = &[
    "Design",
    "Design is not just",
    "what it looks like",
    "and feels like.",
    "Design",
    "is how it works.",
    "- Steve Jobs",
    "Swift",
    "Objective-C",
    "iPhone",
    "iPad",
    "Mac Mini",
    "MacBook Pro",
    "Mac Pro",
    "爱老婆",
    "老婆和女儿",
];

const ALIGNMENTS: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

struct Demo {
    label: MorphingLabel,
    word: usize,
    effect: usize,
    alignment: usize,
    countdown: Option<(u32, Instant)>,
}

impl Demo {
    fn next_word(&mut self) {
        self.word = (self.word + 1) % WORDS.len();
        self.label.set_text(WORDS[self.word]);
    }

    fn previous_word(&mut self) {
        self.word = (self.word + WORDS.len() - 1) % WORDS.len();
        self.label.set_text(WORDS[self.word]);
    }

    fn cycle_effect(&mut self) {
        self.effect = (self.effect + 1) % EffectId::BUILTIN.len();
        self.label.set_effect(EffectId::BUILTIN[self.effect].clone());
    }

    fn cycle_alignment(&mut self) {
        self.alignment = (self.alignment + 1) % ALIGNMENTS.len();
        self.label.set_alignment(ALIGNMENTS[self.alignment]);
    }

    fn toggle_countdown(&mut self) {
        self.countdown = match self.countdown {
            Some(_) => {
                self.label.set_text(WORDS[self.word]);
                None
            }
            None => {
                self.label.set_text("10");
                Some((10, Instant::now()))
            }
        };
    }

    fn advance_countdown(&mut self) {
        let Some((n, since)) = self.countdown else {
            return;
        };

        if since.elapsed() >= Duration::from_secs(1) {
            let next = if n == 0 { 10 } else { n - 1 };
            self.label.set_text(next.to_string());
            self.countdown = Some((next, Instant::now()));
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = match std::env::args().nth(1) {
        Some(path) => MorphConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => MorphConfig::default(),
    };

    info!(?config, "starting harness");

    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let result = run(config);

    disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

/// Logs go to a file; the terminal belongs to the UI. Filter with `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("morph-label-harness.log");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("morph_label=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run(config: MorphConfig) -> anyhow::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let effect = EffectId::BUILTIN
        .iter()
        .position(|e| *e == config.effect)
        .unwrap_or(0);

    let mut label = MorphingLabel::new(config);
    label.set_style(Style::new().fg(Color::Rgb(255, 200, 80)).bg(Color::Rgb(20, 20, 30)));
    label.set_text(WORDS[0]);

    let mut demo = Demo {
        label,
        word: 0,
        effect,
        alignment: 0,
        countdown: None,
    };

    let frame = Duration::from_secs_f32(1.0 / FPS as f32);
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|f| scene(f, &mut demo))?;
            dirty = false;
        }

        if event::poll(frame)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => demo.next_word(),
                    KeyCode::Left => demo.previous_word(),
                    KeyCode::Char('e') => demo.cycle_effect(),
                    KeyCode::Char('a') => demo.cycle_alignment(),
                    KeyCode::Char('c') => demo.toggle_countdown(),
                    _ => continue,
                }

                dirty = true;
            }
        }

        demo.advance_countdown();

        if demo.label.is_clock_paused() {
            continue;
        }

        match demo.label.tick(ClockTick::at_fps(FPS)) {
            TickOutcome::Progressed { redraw, .. } => dirty |= redraw,
            TickOutcome::Completed => dirty = true,
            TickOutcome::Idle | TickOutcome::Waiting => {}
        }
    }

    Ok(())
}

fn header(f: &mut Frame, area: Rect, demo: &Demo) {
    let status = format!(
        "morph-label  effect: {}  [←/→ words] [e effect] [a align] [c countdown] [q quit]",
        demo.label.config().effect,
    );

    f.render_widget(
        Paragraph::new(status).style(Style::new().fg(Color::DarkGray)),
        area,
    );
}

fn scene(f: &mut Frame, demo: &mut Demo) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(f.area());
    header(f, chunks[0], demo);

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);
    let cols = Layout::horizontal([
        Constraint::Percentage(20),
        Constraint::Percentage(60),
        Constraint::Percentage(20),
    ])
    .split(rows[1]);

    let block = Block::bordered()
        .title(" morphing label ")
        .style(Style::new().bg(Color::Rgb(20, 20, 30)));
    let inner = block.inner(cols[1]);
    f.render_widget(block, cols[1]);

    demo.label.set_bounds(morph_label::Size::new(inner.width as f32, inner.height as f32));
    f.render_widget(&demo.label, inner);
}
