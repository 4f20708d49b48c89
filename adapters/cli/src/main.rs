#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line collaborator that drives an expedition session.
//!
//! This binary plays the role the chat platform plays in production: it owns
//! the session lifetime and inactivity timeout, feeds directional commands
//! into the expedition one at a time, and renders the notice banner plus the
//! grid after every turn.

mod progress_transfer;
mod session;

use std::{
    io::{self, BufRead, Write as _},
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use expedition_core::{
    Command, Direction, ExpeditionConfig, InteractionSlot, DEFAULT_EVENT_TILE_COUNT,
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_STARTING_LEVEL,
};
use expedition_rendering::{render_turn, GlyphSet};
use expedition_system_bootstrap::Bootstrap;
use expedition_system_interaction::{dispatch, NoopHooks};
use expedition_world::query;
use rand::Rng as _;

use crate::{
    progress_transfer::ProgressSnapshot,
    session::{Session, DEFAULT_SESSION_TIMEOUT},
};

/// Plays the turn-based expedition mini-game in the terminal.
#[derive(Debug, Parser)]
#[command(name = "expedition")]
struct Args {
    /// Number of tile columns in the grid.
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH)]
    width: u32,

    /// Number of tile rows in the grid.
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT)]
    height: u32,

    /// Number of buff event tiles placed on every level.
    #[arg(long = "event-tiles", default_value_t = DEFAULT_EVENT_TILE_COUNT)]
    event_tile_count: usize,

    /// Level the expedition starts on.
    #[arg(long, default_value_t = DEFAULT_STARTING_LEVEL)]
    level: u32,

    /// Seed for deterministic event-tile placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Resume code printed by a previous session; overrides the grid flags.
    #[arg(
        long,
        conflicts_with_all = ["width", "height", "event_tile_count", "level", "seed"]
    )]
    resume: Option<String>,

    /// Moves to replay before the interactive loop, as the letters u, d, l, r.
    #[arg(long)]
    moves: Option<String>,

    /// Quit after replaying --moves instead of reading commands from stdin.
    #[arg(long)]
    batch: bool,

    /// Symbols used to render the grid.
    #[arg(long, value_enum, default_value_t = GlyphChoice::Ascii)]
    glyphs: GlyphChoice,

    /// Inactivity window in seconds before the session is discarded.
    #[arg(long, default_value_t = DEFAULT_SESSION_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GlyphChoice {
    /// Plain ASCII symbols.
    Ascii,
    /// Emoji symbols mirroring the original chat bot.
    Emoji,
}

impl GlyphChoice {
    fn glyph_set(self) -> GlyphSet {
        match self {
            Self::Ascii => GlyphSet::ascii(),
            Self::Emoji => GlyphSet::emoji(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let glyphs = args.glyphs.glyph_set();

    let config = match &args.resume {
        Some(code) => ProgressSnapshot::decode(code)
            .context("invalid resume code")?
            .into_config(),
        None => {
            let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
            ExpeditionConfig::new(
                args.width,
                args.height,
                args.event_tile_count,
                args.level,
                seed,
            )
        }
    };

    let timeout = Duration::from_secs(args.timeout_secs);
    let mut session =
        Session::start(config, timeout).context("could not start the expedition session")?;

    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(session.expedition()));
    print_turn(&mut session, &glyphs);

    if let Some(script) = &args.moves {
        for direction in parse_moves(script)? {
            submit_move(&mut session, direction, &glyphs)?;
        }
    }

    if !args.batch {
        run_interactive(&mut session, &glyphs)?;
    }

    println!("Resume code: {}", resume_code(&session));
    Ok(())
}

fn run_interactive(session: &mut Session, glyphs: &GlyphSet) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("could not flush stdout")?;

        line.clear();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("could not read from stdin")?;
        if bytes == 0 {
            return Ok(());
        }

        if session.is_expired(Instant::now()) {
            println!("Game has timed out. Please restart the command.");
            return Ok(());
        }

        match line.trim().to_lowercase().as_str() {
            "" => {}
            "u" | "up" => submit_move(session, Direction::Up, glyphs)?,
            "d" | "down" => submit_move(session, Direction::Down, glyphs)?,
            "l" | "left" => submit_move(session, Direction::Left, glyphs)?,
            "r" | "right" => submit_move(session, Direction::Right, glyphs)?,
            "health" => press(session, InteractionSlot::HealthPotion, glyphs)?,
            "stamina" => press(session, InteractionSlot::StaminaPotion, glyphs)?,
            "attack" => press(session, InteractionSlot::Attack, glyphs)?,
            "retreat" => press(session, InteractionSlot::Retreat, glyphs)?,
            "buff" => press(session, InteractionSlot::Buff, glyphs)?,
            "save" => println!("Resume code: {}", resume_code(session)),
            "quit" | "exit" => return Ok(()),
            other => println!(
                "Unknown command '{other}'; use u/d/l/r, save, quit or a control name."
            ),
        }
    }
}

fn submit_move(session: &mut Session, direction: Direction, glyphs: &GlyphSet) -> Result<()> {
    let mut events = Vec::new();
    session
        .submit(Command::Move { direction }, &mut events)
        .context("the expedition could not regenerate the next level")?;
    print_turn(session, glyphs);
    Ok(())
}

/// Routes an auxiliary control press through the interaction hooks. The
/// default hooks are no-ops, so this usually just tells the player so.
fn press(session: &mut Session, slot: InteractionSlot, glyphs: &GlyphSet) -> Result<()> {
    let mut hooks = NoopHooks;
    let mut commands = Vec::new();
    dispatch(&mut hooks, slot, session.expedition(), &mut commands);

    if commands.is_empty() {
        println!("Nothing happens.");
        return Ok(());
    }

    for command in commands {
        let mut events = Vec::new();
        session
            .submit(command, &mut events)
            .context("the expedition could not regenerate the next level")?;
        print_turn(session, glyphs);
    }
    Ok(())
}

fn print_turn(session: &mut Session, glyphs: &GlyphSet) {
    let notice = session.take_notice();
    let snapshot = query::snapshot(session.expedition());
    print!("{}", render_turn(&notice, &snapshot, glyphs));
}

fn resume_code(session: &Session) -> String {
    let level = query::level(session.expedition()).get();
    ProgressSnapshot::from_config(session.config(), level).encode()
}

fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    let mut directions = Vec::new();
    for letter in script.chars() {
        let direction = match letter.to_ascii_lowercase() {
            'u' => Direction::Up,
            'd' => Direction::Down,
            'l' => Direction::Left,
            'r' => Direction::Right,
            ' ' | ',' => continue,
            other => bail!("unsupported move '{other}'; use the letters u, d, l and r"),
        };
        directions.push(direction);
    }
    Ok(directions)
}

#[cfg(test)]
mod tests {
    use expedition_core::Direction;

    use super::parse_moves;

    #[test]
    fn parses_move_scripts_with_separators() {
        let directions = parse_moves("uu,rd l").expect("valid script");
        assert_eq!(
            directions,
            vec![
                Direction::Up,
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left,
            ]
        );
    }

    #[test]
    fn rejects_unknown_move_letters() {
        assert!(parse_moves("uxd").is_err());
    }
}
