use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use taixiu_types::{Dice, Die};

/// Source of dice for a session.
pub trait Roller {
    fn roll(&mut self) -> Dice;
}

/// Local pseudo-random dice.
///
/// Seeded explicitly so a simulation can be replayed; [GameRng::from_entropy]
/// picks a fresh seed and remembers it.
#[derive(Clone, Debug)]
pub struct GameRng {
    seed: u64,
    rng: ChaCha20Rng,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a single die (1-6).
    pub fn roll_die(&mut self) -> Die {
        Die::from_offset(self.rng.gen_range(0..6))
    }

    /// Roll the three dice of a round.
    pub fn roll_dice(&mut self) -> Dice {
        Dice([self.roll_die(), self.roll_die(), self.roll_die()])
    }
}

impl Roller for GameRng {
    fn roll(&mut self) -> Dice {
        self.roll_dice()
    }
}
