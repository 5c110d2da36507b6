//! Deterministic collaborators for tests.

use crate::{
    rng::Roller,
    session::{Presenter, Session, SessionConfig},
    state::Memory,
};
use std::collections::VecDeque;
use taixiu_types::{Bonus, Dice, Signal, Sound};

/// Build dice from faces, panicking on anything outside `1..=6`.
pub fn dice(d1: u8, d2: u8, d3: u8) -> Dice {
    Dice::new(d1, d2, d3).expect("die faces must be 1-6")
}

/// Rolls a fixed script of dice, cycling once exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    script: VecDeque<Dice>,
}

impl ScriptedDice {
    pub fn new(script: impl IntoIterator<Item = Dice>) -> Self {
        let script: VecDeque<Dice> = script.into_iter().collect();
        assert!(!script.is_empty(), "script must contain at least one roll");
        Self { script }
    }

    /// Always roll the same dice.
    pub fn always(roll: Dice) -> Self {
        Self::new([roll])
    }
}

impl Roller for ScriptedDice {
    fn roll(&mut self) -> Dice {
        let roll = self.script.pop_front().expect("script is never empty");
        self.script.push_back(roll);
        roll
    }
}

/// Presenter that keeps every signal it receives.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub signals: Vec<Signal>,
}

impl Recorder {
    pub fn sounds(&self) -> Vec<Sound> {
        self.signals
            .iter()
            .filter_map(|s| match s {
                Signal::Sound(sound) => Some(*sound),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&str> {
        self.signals
            .iter()
            .filter_map(|s| match s {
                Signal::Notice(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn bonuses(&self) -> Vec<Bonus> {
        self.signals
            .iter()
            .filter_map(|s| match s {
                Signal::Bonus(bonus) => Some(*bonus),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }
}

impl Presenter for Recorder {
    fn signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

pub type TestSession = Session<Memory, Recorder, ScriptedDice>;

/// Session over `state` that rolls `script`, using default rules.
pub fn create_session(state: Memory, script: impl IntoIterator<Item = Dice>) -> TestSession {
    Session::open(
        state,
        Recorder::default(),
        ScriptedDice::new(script),
        SessionConfig::default(),
    )
}
