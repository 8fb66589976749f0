use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::betting::Street;
use crate::cards::Card;
use crate::hand::HandStrength;
use crate::player::{PlayerAction, PlayerId};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlindKind {
    Ante,
    SmallBlind,
    BigBlind,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Showdown,
    AllOthersFolded,
}

/// Hole cards shown at showdown, with the strength they evaluated to.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownReveal {
    pub seat: PlayerId,
    pub cards: Vec<Card>,
    pub strength: HandStrength,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotAward {
    pub seat: PlayerId,
    pub amount: u64,
}

/// One entry in the append-only hand log. Events are recorded in the order
/// they happened; replaying them against the same seed reproduces the hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum HandEvent {
    HandStarted {
        hand_no: u64,
        button: PlayerId,
    },
    BlindPosted {
        seat: PlayerId,
        kind: BlindKind,
        amount: u64,
    },
    HoleCardsDealt {
        seat: PlayerId,
        cards: Vec<Card>,
    },
    CommunityDealt {
        street: Street,
        cards: Vec<Card>,
    },
    PlayerActed {
        seat: PlayerId,
        action: PlayerAction,
        /// Chips the action moved into the pot.
        amount: u64,
        pot_after: u64,
    },
    Showdown {
        reveals: Vec<ShowdownReveal>,
        awards: Vec<PotAward>,
    },
    HandEnded {
        winners: Vec<PlayerId>,
        reason: EndReason,
    },
}

/// Append-only event log for the hands of one session.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct HandHistory {
    events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HandEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[HandEvent] {
        &self.events
    }

    /// Events as one viewer is entitled to see them: `HoleCardsDealt` is
    /// kept only for the viewer's own seat and for seats whose cards were
    /// shown at that hand's showdown. Hands still running or ended by folds
    /// leak no cards.
    pub fn redacted(&self, viewer: Option<PlayerId>) -> Vec<HandEvent> {
        let mut out = Vec::with_capacity(self.events.len());
        let mut segment: Vec<&HandEvent> = Vec::new();
        for event in &self.events {
            if matches!(event, HandEvent::HandStarted { .. }) {
                flush_redacted(&mut out, &segment, viewer);
                segment.clear();
            }
            segment.push(event);
        }
        flush_redacted(&mut out, &segment, viewer);
        out
    }

    /// Events of the most recent hand (from the last `HandStarted` on).
    pub fn current_hand(&self) -> &[HandEvent] {
        let start = self
            .events
            .iter()
            .rposition(|e| matches!(e, HandEvent::HandStarted { .. }))
            .unwrap_or(0);
        &self.events[start..]
    }
}

/// Append one hand's events to `out`, dropping hole card deals the viewer
/// is not entitled to.
fn flush_redacted(out: &mut Vec<HandEvent>, segment: &[&HandEvent], viewer: Option<PlayerId>) {
    let shown: Vec<PlayerId> = segment
        .iter()
        .find_map(|e| match e {
            HandEvent::Showdown { reveals, .. } => {
                Some(reveals.iter().map(|r| r.seat).collect())
            }
            _ => None,
        })
        .unwrap_or_default();
    for event in segment {
        match event {
            HandEvent::HoleCardsDealt { seat, .. }
                if Some(*seat) != viewer && !shown.contains(seat) => {}
            _ => out.push((*event).clone()),
        }
    }
}

/// Summary of one completed hand, one JSON line in the hand log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: String,
    pub timestamp: String,
    /// Session RNG seed; replaying the session's actions against it
    /// reproduces the hand.
    pub seed: u64,
    pub button: PlayerId,
    pub board: Vec<Card>,
    pub winners: Vec<PlayerId>,
    pub reason: EndReason,
    /// Stack of every seat after settlement.
    pub stacks: Vec<u64>,
    pub events: Vec<HandEvent>,
}

/// `YYYYMMDD-NNNNNN`, date of play plus the session-local hand counter.
pub fn format_hand_id(hand_no: u64) -> String {
    format!("{}-{:06}", Utc::now().format("%Y%m%d"), hand_no)
}

/// Appends one JSON line per completed hand to a log file.
pub struct HandLogger {
    writer: BufWriter<File>,
}

impl HandLogger {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn log_hand(&mut self, record: &HandRecord) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
