//! Session controller.
//!
//! A [Session] owns everything a player sees (balance, history, streaks and
//! the round in flight) and moves through a small state machine:
//!
//! ```text
//! idle ──select_side──▶ betting ──place_bet──▶ rolling ──roll delay──▶ revealing
//!   ▲                      │                      │                       │
//!   └──────cancel──────────┴──────cancel──────────┘                 reveal delay
//!   ▲                                                                     ▼
//!   └──────────────────────────acknowledge────────────────────────── resolved
//! ```
//!
//! Timed transitions happen in [Session::tick] (driven by a real clock) or
//! [Session::advance] (driven by the caller). The stake is taken when the bet
//! is placed, so only one round can ever be in flight and the balance can
//! never go negative. Persisted values are written back after every change.

use crate::{
    policy::Policy,
    resolver::{resolve, settle, Streak},
    rng::Roller,
    state::{load_balance, load_history, save_balance, save_history, State},
};
use std::{fmt::Display, time::Duration};
use taixiu_types::{
    Bet, Dice, History, RoundReport, Side, Signal, Sound, DEFAULT_STAKE, INITIAL_BALANCE,
    REVEAL_DELAY_MS, ROLL_DELAY_MS, STAKE_PRESETS,
};
use thiserror::Error;
use tracing::{debug, info};

/// Receiver of presentation signals (sounds, animations, banners, notices).
pub trait Presenter {
    fn signal(&mut self, signal: Signal);
}

/// Presenter that drops every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Presenter for Silent {
    fn signal(&mut self, _: Signal) {}
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn signal(&mut self, signal: Signal) {
        (**self).signal(signal)
    }
}

/// A bet that could not be placed. Messages are shown to the player.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BetError {
    #[error("choose TÀI or XỈU before rolling")]
    NoSide,
    #[error("stake must be greater than zero")]
    InvalidStake,
    #[error("insufficient balance: have {balance}, need {stake}")]
    InsufficientFunds { balance: u64, stake: u64 },
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no stake preset at position {0}")]
    UnknownPreset(usize),
}

/// A deposit or withdrawal that was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("cannot withdraw {amount}: balance is {balance}")]
    InsufficientFunds { balance: u64, amount: u64 },
    #[error("wait for the current round to finish")]
    RoundInProgress,
}

/// An operation that makes no sense in the current phase.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {phase}")]
pub struct PhaseError {
    pub action: &'static str,
    pub phase: &'static str,
}

/// Where the session is in the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Betting { side: Side },
    /// Stake taken, dice tumbling
    Rolling { bet: Bet, elapsed: Duration },
    /// Faces known, settlement pending
    Revealing {
        bet: Bet,
        dice: Dice,
        elapsed: Duration,
    },
    Resolved(RoundReport),
}

impl Phase {
    /// A bet has been placed and not yet settled.
    pub fn in_flight(&self) -> bool {
        matches!(self, Phase::Rolling { .. } | Phase::Revealing { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Betting { .. } => "betting",
            Phase::Rolling { .. } => "rolling",
            Phase::Revealing { .. } => "revealing",
            Phase::Resolved(_) => "resolved",
        }
    }
}

/// Tunables for a [Session].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub policy: Policy,
    /// Balance used when the store has none (or a corrupt one)
    pub initial_balance: u64,
    pub default_stake: u64,
    pub presets: Vec<u64>,
    pub roll_delay: Duration,
    pub reveal_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            initial_balance: INITIAL_BALANCE,
            default_stake: DEFAULT_STAKE,
            presets: STAKE_PRESETS.to_vec(),
            roll_delay: Duration::from_millis(ROLL_DELAY_MS),
            reveal_delay: Duration::from_millis(REVEAL_DELAY_MS),
        }
    }
}

impl SessionConfig {
    /// Same rules with both animation delays removed.
    pub fn without_delays(self) -> Self {
        Self {
            roll_delay: Duration::ZERO,
            reveal_delay: Duration::ZERO,
            ..self
        }
    }
}

pub struct Session<S: State, P: Presenter, R: Roller> {
    state: S,
    presenter: P,
    roller: R,
    config: SessionConfig,

    balance: u64,
    history: History,
    streak: Streak,
    stake: u64,
    phase: Phase,
}

impl<S: State, P: Presenter, R: Roller> Session<S, P, R> {
    /// Load persisted balance and history, falling back to defaults.
    pub fn open(state: S, presenter: P, roller: R, config: SessionConfig) -> Self {
        let balance = load_balance(&state).unwrap_or(config.initial_balance);
        let history = load_history(&state);
        info!(balance, rounds = history.len(), "session opened");

        Self {
            state,
            presenter,
            roller,
            balance,
            history,
            streak: Streak::default(),
            stake: config.default_stake,
            phase: Phase::Idle,
            config,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn streak(&self) -> Streak {
        self.streak
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Side currently selected for the next bet.
    pub fn side(&self) -> Option<Side> {
        match self.phase {
            Phase::Betting { side } => Some(side),
            Phase::Rolling { bet, .. } | Phase::Revealing { bet, .. } => Some(bet.side),
            _ => None,
        }
    }

    fn reject<E: Display>(&mut self, err: E) -> E {
        debug!(error = %err, phase = self.phase.name(), "request rejected");
        self.presenter.signal(Signal::Notice(err.to_string()));
        err
    }

    pub fn select_side(&mut self, side: Side) -> Result<(), BetError> {
        if self.phase.in_flight() {
            return Err(self.reject(BetError::RoundInProgress));
        }
        self.phase = Phase::Betting { side };
        self.presenter.signal(Signal::Sound(Sound::Click));
        Ok(())
    }

    /// Set the stake for the next bet. Checked against the balance at placement.
    pub fn set_stake(&mut self, stake: u64) -> Result<(), BetError> {
        if self.phase.in_flight() {
            return Err(self.reject(BetError::RoundInProgress));
        }
        self.stake = stake;
        Ok(())
    }

    pub fn select_preset(&mut self, index: usize) -> Result<u64, BetError> {
        let Some(stake) = self.config.presets.get(index).copied() else {
            return Err(self.reject(BetError::UnknownPreset(index)));
        };
        self.set_stake(stake)?;
        Ok(stake)
    }

    /// Take the stake and start rolling.
    pub fn place_bet(&mut self) -> Result<Bet, BetError> {
        let side = match self.phase {
            Phase::Betting { side } => side,
            Phase::Rolling { .. } | Phase::Revealing { .. } => {
                return Err(self.reject(BetError::RoundInProgress))
            }
            Phase::Idle | Phase::Resolved(_) => return Err(self.reject(BetError::NoSide)),
        };
        if self.stake == 0 {
            return Err(self.reject(BetError::InvalidStake));
        }
        if self.stake > self.balance {
            return Err(self.reject(BetError::InsufficientFunds {
                balance: self.balance,
                stake: self.stake,
            }));
        }

        let bet = Bet {
            side,
            stake: self.stake,
        };
        self.balance -= bet.stake;
        save_balance(&mut self.state, self.balance);

        self.phase = Phase::Rolling {
            bet,
            elapsed: Duration::ZERO,
        };
        self.presenter.signal(Signal::Sound(Sound::Roll));
        self.presenter.signal(Signal::Rolling);
        info!(side = %bet.side, stake = bet.stake, balance = self.balance, "bet placed");
        Ok(bet)
    }

    /// Clear the selection, or call off a roll whose dice are not drawn yet
    /// (refunding the stake).
    pub fn cancel(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Betting { .. } => {
                self.phase = Phase::Idle;
                Ok(())
            }
            Phase::Rolling { bet, .. } => {
                self.balance = self.balance.saturating_add(bet.stake);
                save_balance(&mut self.state, self.balance);
                self.phase = Phase::Idle;
                self.presenter.signal(Signal::Notice(format!(
                    "bet cancelled, {} refunded",
                    bet.stake
                )));
                info!(stake = bet.stake, balance = self.balance, "bet cancelled");
                Ok(())
            }
            _ => Err(self.reject(PhaseError {
                action: "cancel",
                phase: self.phase.name(),
            })),
        }
    }

    /// Time left on the pending timer, if a round is in flight.
    pub fn time_until_next(&self) -> Option<Duration> {
        match self.phase {
            Phase::Rolling { elapsed, .. } => Some(self.config.roll_delay.saturating_sub(elapsed)),
            Phase::Revealing { elapsed, .. } => {
                Some(self.config.reveal_delay.saturating_sub(elapsed))
            }
            _ => None,
        }
    }

    /// Let `elapsed` pass on the round timers. Returns the report if the round
    /// settled during this tick.
    pub fn tick(&mut self, elapsed: Duration) -> Option<RoundReport> {
        let mut remaining = elapsed;
        loop {
            match &mut self.phase {
                Phase::Rolling { bet, elapsed } => {
                    let total = elapsed.saturating_add(remaining);
                    if total < self.config.roll_delay {
                        *elapsed = total;
                        return None;
                    }
                    remaining = total - self.config.roll_delay;
                    let bet = *bet;
                    self.reveal(bet);
                }
                Phase::Revealing { bet, dice, elapsed } => {
                    let total = elapsed.saturating_add(remaining);
                    if total < self.config.reveal_delay {
                        *elapsed = total;
                        return None;
                    }
                    let (bet, dice) = (*bet, *dice);
                    return Some(self.settle_round(bet, dice));
                }
                _ => return None,
            }
        }
    }

    /// Fire the pending timer now.
    pub fn advance(&mut self) -> Result<Option<RoundReport>, PhaseError> {
        match self.phase {
            Phase::Rolling { bet, .. } => {
                self.reveal(bet);
                Ok(None)
            }
            Phase::Revealing { bet, dice, .. } => Ok(Some(self.settle_round(bet, dice))),
            _ => Err(PhaseError {
                action: "advance",
                phase: self.phase.name(),
            }),
        }
    }

    /// Fire every pending timer, skipping the animations.
    pub fn finish(&mut self) -> Option<RoundReport> {
        loop {
            match self.phase {
                Phase::Rolling { bet, .. } => {
                    self.reveal(bet);
                }
                Phase::Revealing { bet, dice, .. } => return Some(self.settle_round(bet, dice)),
                _ => return None,
            }
        }
    }

    /// Dismiss a settled round.
    pub fn acknowledge(&mut self) -> Result<(), PhaseError> {
        match self.phase {
            Phase::Resolved(_) => {
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(PhaseError {
                action: "acknowledge",
                phase: self.phase.name(),
            }),
        }
    }

    /// Select, stake, place and settle a round in one go.
    pub fn play(&mut self, side: Side, stake: u64) -> Result<RoundReport, BetError> {
        self.select_side(side)?;
        self.set_stake(stake)?;
        let bet = self.place_bet()?;
        let dice = self.reveal(bet);
        Ok(self.settle_round(bet, dice))
    }

    pub fn deposit(&mut self, amount: u64) -> Result<u64, TransactionError> {
        if self.phase.in_flight() {
            return Err(self.reject(TransactionError::RoundInProgress));
        }
        if amount == 0 {
            return Err(self.reject(TransactionError::InvalidAmount));
        }
        self.balance = self.balance.saturating_add(amount);
        save_balance(&mut self.state, self.balance);
        self.presenter.signal(Signal::Notice(format!(
            "deposited {amount}, balance is now {}",
            self.balance
        )));
        info!(amount, balance = self.balance, "deposit");
        Ok(self.balance)
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<u64, TransactionError> {
        if self.phase.in_flight() {
            return Err(self.reject(TransactionError::RoundInProgress));
        }
        if amount == 0 {
            return Err(self.reject(TransactionError::InvalidAmount));
        }
        if amount > self.balance {
            return Err(self.reject(TransactionError::InsufficientFunds {
                balance: self.balance,
                amount,
            }));
        }
        self.balance -= amount;
        save_balance(&mut self.state, self.balance);
        self.presenter.signal(Signal::Notice(format!(
            "withdrew {amount}, balance is now {}",
            self.balance
        )));
        info!(amount, balance = self.balance, "withdrawal");
        Ok(self.balance)
    }

    fn reveal(&mut self, bet: Bet) -> Dice {
        let dice = self.roller.roll();
        self.phase = Phase::Revealing {
            bet,
            dice,
            elapsed: Duration::ZERO,
        };
        self.presenter.signal(Signal::Reveal(dice));
        debug!(%dice, "dice revealed");
        dice
    }

    fn settle_round(&mut self, bet: Bet, dice: Dice) -> RoundReport {
        let resolution = resolve(&dice);
        let settlement = settle(&bet, &resolution, &self.config.policy, self.streak);

        self.balance = self.balance.saturating_add(settlement.credited());
        self.streak = settlement.streak;
        self.history.record(resolution.total, settlement.recorded);
        save_balance(&mut self.state, self.balance);
        save_history(&mut self.state, &self.history);

        let report = RoundReport {
            dice,
            total: resolution.total,
            outcome: resolution.outcome,
            recorded: settlement.recorded,
            bet,
            won: settlement.won,
            payout: settlement.payout,
            bonus: settlement.bonus,
            balance: self.balance,
        };

        let sound = if report.won { Sound::Win } else { Sound::Lose };
        self.presenter.signal(Signal::Sound(sound));
        if let Some(bonus) = report.bonus {
            self.presenter.signal(Signal::Bonus(bonus));
        }
        self.presenter.signal(Signal::Resolved(report));
        self.phase = Phase::Resolved(report);

        info!(
            %dice,
            total = report.total,
            outcome = %report.outcome,
            won = report.won,
            bonus = report.bonus.map_or(0, |b| b.amount),
            balance = self.balance,
            "round settled"
        );
        report
    }
}
