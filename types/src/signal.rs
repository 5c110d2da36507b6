use serde::{Deserialize, Serialize};

use super::{Bet, Dice, Outcome};

/// Audio cues the presenter may play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    Click,
    Roll,
    Win,
    Lose,
}

/// Why a supplemental payment was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Paid on every multiple of the win-streak threshold
    WinStreak { streak: u32 },
    /// Paid on every multiple of the loss-streak threshold
    Consolation { streak: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub amount: u64,
}

/// Everything that happened in a settled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub dice: Dice,
    pub total: u8,
    /// Category produced by the resolver
    pub outcome: Outcome,
    /// Category recorded in history (may differ for triples)
    pub recorded: Outcome,
    pub bet: Bet,
    pub won: bool,
    /// Amount credited for the bet itself (stake + winnings, 0 on loss)
    pub payout: u64,
    pub bonus: Option<Bonus>,
    pub balance: u64,
}

/// Fire-and-forget notification for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    Sound(Sound),
    /// Start the tumbling animation
    Rolling,
    /// Faces are known; play the reveal animation
    Reveal(Dice),
    /// Show the bonus banner
    Bonus(Bonus),
    Resolved(RoundReport),
    /// User-facing message (validation failures, transactions)
    Notice(String),
}
