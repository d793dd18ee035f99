//! UNO Quiz
//!
//! Pick a card, answer the question, collect points.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uno_quiz::config::Settings;
use uno_quiz::tui::{App, ToastQueue};
use uno_quiz::{Game, QuestionBank};

#[derive(Parser, Debug)]
#[command(version, about = "A card-picking trivia quiz for the terminal")]
struct Args {
    /// Settings file (defaults to ./uno-quiz.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Question bank file (.toml or .json)
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Seed for question draws
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Input poll interval in milliseconds
    #[arg(long)]
    tick_rate_ms: Option<u64>,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.questions {
            settings.question_bank = Some(v);
        }
        if let Some(v) = self.seed {
            settings.seed = Some(v);
        }
        if let Some(v) = self.log_file {
            settings.log_file = Some(v);
        }
        if let Some(v) = self.tick_rate_ms {
            settings.tick_rate_ms = v;
        }
    }
}

/// Log to a file, never to the terminal the game is drawn on
fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_app(settings: &Settings) -> anyhow::Result<App> {
    let bank = match &settings.question_bank {
        Some(path) => QuestionBank::load(path)?,
        None => QuestionBank::builtin(),
    };

    let mut game = Game::new(bank, ToastQueue::default());
    if let Some(seed) = settings.seed {
        game = game.with_seed(seed);
    }

    Ok(App::new(game, Duration::from_millis(settings.tick_rate_ms.max(1))))
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> anyhow::Result<()> {
    while app.running {
        // Draw
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        // Handle input
        if !app.handle_input()? {
            break;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    init_logging(&settings)?;
    let mut app = build_app(&settings)?;
    tracing::info!(version = uno_quiz::VERSION, ?settings, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    let state = app.game.state();
    if state.phase == uno_quiz::game::GamePhase::Finished {
        println!("\nFinal score: {} points", state.score);
    }
    println!("Thanks for playing UNO Quiz!\n");

    Ok(())
}
