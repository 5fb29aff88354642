use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::Stage;
use crate::player::PlayerAction;

/// Records a single player action during a hand.
/// Associates the action with the seat and the street when it occurred.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat index (0 or 1)
    pub player_id: usize,
    /// The betting street when this action occurred
    pub street: Stage,
    /// The action taken by the player
    pub action: PlayerAction,
}

/// Complete record of one hand: all actions, board cards and outcome.
/// Serialized to JSONL for hand history storage and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Identifier within the match (format: H-NNNNNN)
    pub hand_id: String,
    /// RNG seed used for deck shuffling (enables deterministic replay)
    pub seed: Option<u64>,
    /// Chronological list of all player actions
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    /// Hand result summary (winner, pot size, split)
    pub result: Option<String>,
    /// Timestamp when the hand was recorded (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Showdown information if the hand was not ended by a fold
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Seat indices that won the hand
    pub winners: Vec<usize>,
    /// Optional notes about the outcome (e.g. "split pot")
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShowdownInfo {
    pub fn winners(winners: Vec<usize>) -> Self {
        Self {
            winners,
            notes: None,
        }
    }
}

pub fn format_hand_id(seq: u32) -> String {
    format!("H-{:06}", seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends finished hands to a JSONL file, one record per line.
pub struct HandLogger {
    writer: BufWriter<File>,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
