//! # Headsup CLI
//!
//! Command-line front end for the heads-up hold'em match engine.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses
//! command-line arguments and executes the appropriate subcommand.
//!
//! ## Available Subcommands
//!
//! - `play`: Interactive match against the equity bot
//! - `sim`: Bot-vs-bot simulation with optional JSONL hand history

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use headsup_ai::bot::EquityBot;
use headsup_ai::{run_bot_turns, Opponent};
use headsup_engine::cards::format_cards;
use headsup_engine::engine::{Engine, MatchConfig, Stage};
use headsup_engine::errors::GameError;
use headsup_engine::logger::HandLogger;
use headsup_engine::player::PlayerAction;

const HUMAN_SEAT: usize = 0;
const BOT_SEAT: usize = 1;

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),
    /// Invalid user input or command-line arguments
    InvalidInput(String),
    /// Engine-level structural failure
    Engine(GameError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Engine(e) => write!(f, "Engine error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        CliError::Engine(e)
    }
}

#[derive(Debug, Parser)]
#[command(name = "headsup", about = "Heads-up no-limit hold'em at the terminal")]
struct HeadsupCli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play an interactive match against the bot
    Play {
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Starting stack for both seats
        #[arg(long, default_value_t = 50_000)]
        chips: u32,
        /// Small blind
        #[arg(long, default_value_t = 500)]
        small_blind: u32,
        /// Big blind
        #[arg(long, default_value_t = 1_000)]
        big_blind: u32,
        /// Stop after this many completed hands
        #[arg(long)]
        hands: Option<u32>,
    },
    /// Run a bot-vs-bot simulation
    Sim {
        /// Maximum number of hands to play
        #[arg(long, default_value_t = 100)]
        hands: u32,
        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Write the hand history to this JSONL file
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

/// Parses arguments and dispatches. Returns the process exit code:
/// `0` on success, `2` on errors.
pub fn run<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match HeadsupCli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = write!(err, "{}", e);
            return 2;
        }
    };
    let result = match cli.command {
        Commands::Play {
            seed,
            chips,
            small_blind,
            big_blind,
            hands,
        } => {
            let mut stdin = std::io::stdin().lock();
            handle_play(
                seed,
                chips,
                small_blind,
                big_blind,
                hands,
                &mut stdin,
                out,
            )
        }
        Commands::Sim {
            hands,
            seed,
            history,
        } => handle_sim(hands, seed, history.as_deref(), out),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "error: {}", e);
            2
        }
    }
}

fn match_config(chips: u32, small_blind: u32, big_blind: u32) -> MatchConfig {
    MatchConfig {
        starting_chips: chips,
        small_blind,
        big_blind,
        names: ["You".to_string(), "Bot".to_string()],
    }
}

// what one line of player input asks for
enum Input {
    Action(PlayerAction),
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    let word = match parts.next() {
        Some(w) => w.to_ascii_lowercase(),
        None => return Input::Unknown,
    };
    match word.as_str() {
        "fold" | "f" => Input::Action(PlayerAction::Fold),
        "check" | "k" => Input::Action(PlayerAction::Check),
        "call" | "c" => Input::Action(PlayerAction::Call),
        "allin" | "all-in" | "a" => Input::Action(PlayerAction::AllIn),
        "raise" | "r" => {
            let to = parts.next().and_then(|v| v.parse::<u32>().ok());
            Input::Action(PlayerAction::Raise { to })
        }
        "quit" | "q" => Input::Quit,
        _ => Input::Unknown,
    }
}

fn render(engine: &Engine, out: &mut dyn Write) -> Result<(), CliError> {
    let snap = engine.snapshot();
    writeln!(out)?;
    for line in &snap.log {
        writeln!(out, "| {}", line)?;
    }
    writeln!(out, "Pot: {}", snap.pot)?;
    writeln!(out, "Board: {}", format_cards(&snap.board))?;
    for line in &snap.summary {
        writeln!(out, "{}", line)?;
    }
    for p in &snap.players {
        writeln!(out, "{}: {}  Bet {}", p.name, p.chips, p.bet)?;
    }
    if let Some(hole) = engine.players()[HUMAN_SEAT].hole_cards() {
        writeln!(out, "Your hand: {}", format_cards(&hole))?;
    }
    if let Some(seat) = snap.to_act {
        writeln!(out, "Waiting for {}", snap.players[seat].name)?;
    }
    Ok(())
}

/// Interactive match: the human holds seat 0, the bot seat 1. Reads
/// `fold | check | call | raise [to] | allin | quit` from `stdin`.
pub fn handle_play(
    seed: Option<u64>,
    chips: u32,
    small_blind: u32,
    big_blind: u32,
    hands: Option<u32>,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if chips == 0 {
        return Err(CliError::InvalidInput("chips must be >= 1".to_string()));
    }
    let seed = seed.unwrap_or_else(rand::random);
    writeln!(out, "play: seed={}", seed)?;

    let mut engine = Engine::with_config(match_config(chips, small_blind, big_blind), Some(seed));
    let mut bot = EquityBot::new(seed.wrapping_add(BOT_SEAT as u64));
    engine.start_hand()?;

    let mut line = String::new();
    loop {
        run_bot_turns(&mut engine, &mut bot, BOT_SEAT)?;
        render(&engine, out)?;
        if engine.stage() == Stage::GameOver {
            break;
        }
        if let Some(cap) = hands {
            if engine.hands_played() > cap {
                writeln!(out, "Hand limit reached.")?;
                break;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        match parse_input(&line) {
            Input::Quit => {
                writeln!(out, "Goodbye.")?;
                break;
            }
            Input::Unknown => {
                writeln!(out, "Commands: fold, check, call, raise [to], allin, quit")?;
            }
            Input::Action(action) => {
                let applied = engine.apply_action(HUMAN_SEAT, action)?;
                if !applied {
                    writeln!(out, "That action is not available right now.")?;
                }
            }
        }
    }
    Ok(())
}

/// Bot-vs-bot simulation for up to `hands` hands, optionally recording
/// the hand history as JSONL.
pub fn handle_sim(
    hands: u32,
    seed: Option<u64>,
    history: Option<&std::path::Path>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let seed = seed.unwrap_or_else(rand::random);
    writeln!(out, "sim: hands={} seed={}", hands, seed)?;

    let mut engine = Engine::with_config(
        MatchConfig {
            names: ["Bot A".to_string(), "Bot B".to_string()],
            ..MatchConfig::default()
        },
        Some(seed),
    );
    let mut bots = [
        EquityBot::new(seed.wrapping_add(1)),
        EquityBot::new(seed.wrapping_add(2)),
    ];
    engine.start_hand()?;
    while engine.stage().is_betting() && engine.hands_played() <= hands {
        let seat = engine.turn();
        let action = bots[seat].act(&engine, seat);
        engine.apply_action(seat, action)?;
    }

    if let Some(path) = history {
        let mut logger = HandLogger::create(path)?;
        for record in engine.drain_records() {
            logger.write(&record)?;
        }
        writeln!(out, "history written to {}", path.display())?;
    }

    let completed = if engine.stage() == Stage::GameOver {
        engine.hands_played()
    } else {
        engine.hands_played().saturating_sub(1)
    };
    writeln!(out, "hands completed: {}", completed)?;
    for p in engine.players() {
        writeln!(out, "{}: {}", p.name(), p.chips() + p.bet())?;
    }
    if engine.stage() == Stage::GameOver {
        let players = engine.players();
        let winner = if players[0].chips() >= players[1].chips() {
            &players[0]
        } else {
            &players[1]
        };
        writeln!(out, "winner: {}", winner.name())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_and_aliases() {
        assert!(matches!(
            parse_input("fold"),
            Input::Action(PlayerAction::Fold)
        ));
        assert!(matches!(
            parse_input("RAISE 2500"),
            Input::Action(PlayerAction::Raise { to: Some(2_500) })
        ));
        assert!(matches!(
            parse_input("raise"),
            Input::Action(PlayerAction::Raise { to: None })
        ));
        assert!(matches!(parse_input("q"), Input::Quit));
        assert!(matches!(parse_input("gibberish"), Input::Unknown));
        assert!(matches!(parse_input("   "), Input::Unknown));
    }
}
