mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gloomcrawl::script::{self, Input, ScriptedInput};
use gloomcrawl::world::Phase;
use gloomcrawl::{Command, Direction, Game, Rules, TurnOutcome};
use render::{Hud, draw_hover, draw_legend, draw_log, draw_map, draw_overlay};

const SCREEN_HEIGHT: i32 = 50;
const MAP_ORIGIN_Y: i32 = 5;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 7;
const LOG_MAX_ENTRIES: usize = 8;
const LEGEND_X: i32 = 56;

#[derive(Parser, Debug)]
#[command(name = "gloomcrawl", about = "Turn-based dungeon crawl in the terminal")]
struct Args {
    /// Seed for the run; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON rules file. Missing fields keep their stock values.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Key script replayed before live input.
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

struct GloomcrawlState {
    game: Game,
    script: Option<ScriptedInput>,
    message_log: Vec<String>,
    hud: Hud,
}

impl GameState for GloomcrawlState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let input = match self.script.as_mut().and_then(ScriptedInput::next_input) {
            Some(input) => Some(input),
            None => ctx.key.and_then(key_to_input),
        };
        if let Some(input) = input {
            self.apply(input, ctx);
        }
        self.flush_turn_log();

        ctx.cls();
        let snap = self.game.snapshot();
        self.hud.draw(ctx, &snap);
        draw_map(ctx, &self.game.floor, &snap, Point::new(0, MAP_ORIGIN_Y));
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
        draw_legend(ctx, &snap, LEGEND_X, LOG_PANEL_START + 1);
        if snap.phase == Phase::Exploring {
            draw_hover(ctx, &self.game.floor, &snap, Point::new(0, MAP_ORIGIN_Y));
        }
        draw_overlay(ctx, &snap);
    }
}

impl GloomcrawlState {
    fn apply(&mut self, input: Input, ctx: &mut BTerm) {
        if input == Input::DumpState {
            self.dump_state();
            return;
        }
        match script::apply(&mut self.game, input) {
            TurnOutcome::Quit => ctx.quit(),
            TurnOutcome::Defeated => {
                let snap = self.game.snapshot();
                info!(floor = snap.floor, kills = snap.tally.total_kills(), "run over");
            }
            TurnOutcome::Ignored
            | TurnOutcome::Continued
            | TurnOutcome::FloorChoice => {}
        }
        if self.game.phase() == Phase::Quit {
            ctx.quit();
        }
    }

    fn dump_state(&mut self) {
        match serde_json::to_string(&self.game.snapshot()) {
            Ok(json) => {
                info!(snapshot = %json, "state dump");
                self.push_log_entry("State written to the log.");
            }
            Err(err) => warn!(%err, "state dump failed"),
        }
    }

    fn flush_turn_log(&mut self) {
        for entry in self.game.drain_log() {
            self.push_log_entry(entry);
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }
}

fn key_to_input(key: VirtualKeyCode) -> Option<Input> {
    let step = |dir| Some(Input::Command(Command::Step(dir)));
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => step(Direction::North),
        VirtualKeyCode::S | VirtualKeyCode::Down => step(Direction::South),
        VirtualKeyCode::A | VirtualKeyCode::Left => step(Direction::West),
        VirtualKeyCode::D | VirtualKeyCode::Right => step(Direction::East),
        VirtualKeyCode::Q => step(Direction::NorthWest),
        VirtualKeyCode::E => step(Direction::NorthEast),
        VirtualKeyCode::Z => step(Direction::SouthWest),
        VirtualKeyCode::C => step(Direction::SouthEast),
        VirtualKeyCode::Period => Some(Input::Command(Command::Wait)),
        VirtualKeyCode::X => Some(Input::Command(Command::ShakeOff)),
        VirtualKeyCode::F => Some(Input::Command(Command::Restart)),
        VirtualKeyCode::Escape => Some(Input::Command(Command::Quit)),
        VirtualKeyCode::Key1 => Some(Input::Choose(1)),
        VirtualKeyCode::Key2 => Some(Input::Choose(2)),
        VirtualKeyCode::Key3 => Some(Input::Choose(3)),
        VirtualKeyCode::P => Some(Input::DumpState),
        _ => None,
    }
}

/// File-only logging; the terminal belongs to the renderer.
fn setup_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_name = format!(
        "gloomcrawl-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let file_appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the whole process.
    std::mem::forget(guard);

    info!(file = %log_dir.join(&file_name).display(), "logging initialized");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_dir)?;

    let rules = match &args.rules {
        Some(path) => Rules::load(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => Rules::default(),
    };
    let script = args
        .script
        .as_ref()
        .map(ScriptedInput::from_file)
        .transpose()
        .context("reading key script")?;
    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp().unsigned_abs());
    info!(seed, scripted = script.is_some(), "starting run");

    let context = BTermBuilder::simple80x50()
        .with_title("Gloomcrawl")
        .build()
        .map_err(|err| anyhow!("terminal setup failed: {err}"))?;
    let state = GloomcrawlState {
        game: Game::seeded(rules, seed),
        script,
        message_log: Vec::new(),
        hud: Hud,
    };
    main_loop(context, state).map_err(|err| anyhow!("main loop failed: {err}"))
}
