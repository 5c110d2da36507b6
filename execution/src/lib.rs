pub mod policy;
pub mod resolver;
pub mod rng;
pub mod session;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

#[cfg(test)]
mod integration_tests;

mod state;

pub use policy::{Policy, TriplePolicy};
pub use resolver::{resolve, resolve_faces, settle, Resolution, Settlement, Streak};
pub use rng::{GameRng, Roller};
pub use session::{
    BetError, Phase, PhaseError, Presenter, Session, SessionConfig, Silent, TransactionError,
};
pub use state::{load_balance, load_history, save_balance, save_history, Memory, State};
