//! Configurable payout rules.

use serde::{Deserialize, Serialize};
use taixiu_types::{
    Outcome, Side, LOSS_STREAK_CONSOLATION, LOSS_STREAK_THRESHOLD, WIN_STREAK_BONUS_BPS,
    WIN_STREAK_THRESHOLD,
};

/// How a triple is recorded. Bettors lose on a triple under every policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriplePolicy {
    /// Triple is its own category that nobody can select
    #[default]
    House,
    /// Triple is recorded on the side its total falls on
    Side,
}

impl TriplePolicy {
    /// Category written to history for a resolved outcome.
    pub fn recorded(self, outcome: Outcome, total: u8) -> Outcome {
        match (self, outcome) {
            (TriplePolicy::Side, Outcome::Triple) => Side::for_total(total).into(),
            (_, outcome) => outcome,
        }
    }
}

/// Payout and streak rules. A threshold of zero disables that streak payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub triple: TriplePolicy,
    #[serde(default = "default_win_streak_threshold")]
    pub win_streak_threshold: u32,
    #[serde(default = "default_win_streak_bonus_bps")]
    pub win_streak_bonus_bps: u64,
    #[serde(default = "default_loss_streak_threshold")]
    pub loss_streak_threshold: u32,
    #[serde(default = "default_loss_streak_consolation")]
    pub loss_streak_consolation: u64,
}

fn default_win_streak_threshold() -> u32 {
    WIN_STREAK_THRESHOLD
}

fn default_win_streak_bonus_bps() -> u64 {
    WIN_STREAK_BONUS_BPS
}

fn default_loss_streak_threshold() -> u32 {
    LOSS_STREAK_THRESHOLD
}

fn default_loss_streak_consolation() -> u64 {
    LOSS_STREAK_CONSOLATION
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            triple: TriplePolicy::default(),
            win_streak_threshold: WIN_STREAK_THRESHOLD,
            win_streak_bonus_bps: WIN_STREAK_BONUS_BPS,
            loss_streak_threshold: LOSS_STREAK_THRESHOLD,
            loss_streak_consolation: LOSS_STREAK_CONSOLATION,
        }
    }
}

/// True when `streak` lands on a positive multiple of `threshold`.
pub(crate) fn hits_threshold(streak: u32, threshold: u32) -> bool {
    streak > 0 && streak.checked_rem(threshold) == Some(0)
}
