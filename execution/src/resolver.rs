//! Round resolution.
//!
//! [resolve] classifies three dice; [settle] turns a classified roll and a bet
//! into a payout, an optional streak payment and the next streak counters. Both
//! are pure: the session applies the result.

use crate::policy::{hits_threshold, Policy};
use taixiu_types::{Bet, Bonus, BonusKind, Dice, InvalidDie, Outcome, BASIS_POINTS};

/// Classified roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub total: u8,
    pub outcome: Outcome,
}

/// Classify a roll. Triples override the sum ranges.
pub fn resolve(dice: &Dice) -> Resolution {
    let total = dice.total();
    let outcome = if dice.is_triple() {
        Outcome::Triple
    } else if (4..=10).contains(&total) {
        Outcome::Low
    } else {
        // Non-triple totals never reach 3 or 18
        Outcome::High
    };
    Resolution { total, outcome }
}

/// Classify raw faces, rejecting anything outside `1..=6`.
pub fn resolve_faces(d1: u8, d2: u8, d3: u8) -> Result<Resolution, InvalidDie> {
    Ok(resolve(&Dice::new(d1, d2, d3)?))
}

/// Consecutive win and loss counters. At most one is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streak {
    pub wins: u32,
    pub losses: u32,
}

impl Streak {
    pub fn record(self, won: bool) -> Self {
        if won {
            Self {
                wins: self.wins.saturating_add(1),
                losses: 0,
            }
        } else {
            Self {
                wins: 0,
                losses: self.losses.saturating_add(1),
            }
        }
    }
}

/// Result of applying a bet to a resolved roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub won: bool,
    /// Stake plus winnings (1:1), zero on a loss
    pub payout: u64,
    pub bonus: Option<Bonus>,
    pub streak: Streak,
    /// Category to record in history
    pub recorded: Outcome,
}

impl Settlement {
    /// Everything credited back to the player for this round.
    pub fn credited(&self) -> u64 {
        self.payout
            .saturating_add(self.bonus.map_or(0, |bonus| bonus.amount))
    }
}

/// Win-streak bonus for a stake, floored.
pub fn streak_bonus(stake: u64, bps: u64) -> u64 {
    let amount = (stake as u128).saturating_mul(bps as u128) / BASIS_POINTS as u128;
    u64::try_from(amount).unwrap_or(u64::MAX)
}

/// Settle `bet` against `resolution`. Triples are a loss for every side.
pub fn settle(bet: &Bet, resolution: &Resolution, policy: &Policy, streak: Streak) -> Settlement {
    let won = resolution.outcome.side() == Some(bet.side);
    let streak = streak.record(won);

    let (payout, bonus) = if won {
        let bonus = hits_threshold(streak.wins, policy.win_streak_threshold).then(|| Bonus {
            kind: BonusKind::WinStreak {
                streak: streak.wins,
            },
            amount: streak_bonus(bet.stake, policy.win_streak_bonus_bps),
        });
        (bet.stake.saturating_mul(2), bonus)
    } else {
        let bonus = hits_threshold(streak.losses, policy.loss_streak_threshold).then(|| Bonus {
            kind: BonusKind::Consolation {
                streak: streak.losses,
            },
            amount: policy.loss_streak_consolation,
        });
        (0, bonus)
    };

    Settlement {
        won,
        payout,
        // A zero-sized payment is not worth a banner
        bonus: bonus.filter(|bonus| bonus.amount > 0),
        streak,
        recorded: policy.triple.recorded(resolution.outcome, resolution.total),
    }
}
