//! Interactive table loop and headless simulation.

use crate::{
    command::{Command, HELP},
    terminal::Terminal,
};
use std::{fmt, io::Write};
use taixiu_execution::{
    BetError, GameRng, Memory, Phase, Roller, Session, SessionConfig, Silent, State,
};
use taixiu_types::{BonusKind, Outcome, RoundReport, Side};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt},
    time::{sleep, Instant},
};
use tracing::{debug, info};

type Table<S, W, R> = Session<S, Terminal<W>, R>;

/// Run the interactive table until `quit` or end of input.
///
/// Round timers run on the wall clock between lines of input, so a roll
/// settles on its own even while the player is idle. `quit` refunds a roll
/// still in progress; end of input settles it.
pub async fn play<S, W, R, I>(session: &mut Table<S, W, R>, input: I) -> io::Result<()>
where
    S: State,
    W: Write,
    R: Roller,
    I: AsyncBufRead + Unpin,
{
    welcome(session);

    let mut lines = input.lines();
    let mut last = Instant::now();
    loop {
        advance_clock(session, &mut last);

        let wait = session.time_until_next();
        tokio::select! {
            _ = sleep(wait.unwrap_or_default()), if wait.is_some() => {}
            line = lines.next_line() => {
                advance_clock(session, &mut last);
                let Some(line) = line? else {
                    debug!("input closed");
                    wind_down(session, true);
                    return Ok(());
                };
                if !execute(session, &line) {
                    break;
                }
            }
        }
    }

    wind_down(session, false);
    Ok(())
}

fn welcome<S: State, W: Write, R: Roller>(session: &mut Table<S, W, R>) {
    let balance = session.balance();
    let strip = session.history().strip();
    let terminal = session.presenter_mut();
    terminal.line(format!("TÀI XỈU - balance {balance}. Type 'help' for commands."));
    if !strip.is_empty() {
        terminal.line(format!("Recent: {strip}"));
    }
}

fn advance_clock<S: State, W: Write, R: Roller>(session: &mut Table<S, W, R>, last: &mut Instant) {
    let now = Instant::now();
    let elapsed = now.duration_since(*last);
    *last = now;
    if let Some(report) = session.tick(elapsed) {
        settled(session, &report);
    }
}

/// Dismiss the result and keep the same side selected for the next roll.
fn settled<S: State, W: Write, R: Roller>(session: &mut Table<S, W, R>, report: &RoundReport) {
    if session.acknowledge().is_ok() {
        let _ = session.select_side(report.bet.side);
    }
}

/// Apply one line of input. Returns false when the player quits.
fn execute<S: State, W: Write, R: Roller>(session: &mut Table<S, W, R>, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            session.presenter_mut().line(format!("! {e}"));
            return true;
        }
    };
    debug!(?command, "command");

    // Rejections already reach the terminal as notices
    match command {
        Command::Side(side) => {
            if session.select_side(side).is_ok() {
                let stake = session.stake();
                session
                    .presenter_mut()
                    .line(format!("Betting {stake} on {side}. Type 'roll' to play."));
            }
        }
        Command::Stake(stake) => {
            if session.set_stake(stake).is_ok() {
                session.presenter_mut().line(format!("Stake: {stake}"));
            }
        }
        Command::Preset(index) => {
            if let Ok(stake) = session.select_preset(index) {
                session.presenter_mut().line(format!("Stake: {stake}"));
            }
        }
        Command::Roll => {
            let _ = session.place_bet();
        }
        Command::Cancel => {
            let betting = matches!(session.phase(), Phase::Betting { .. });
            if session.cancel().is_ok() && betting {
                session.presenter_mut().line("Selection cleared.");
            }
        }
        Command::Deposit(amount) => {
            let _ = session.deposit(amount);
        }
        Command::Withdraw(amount) => {
            let _ = session.withdraw(amount);
        }
        Command::History => {
            let history = session.history().clone();
            session.presenter_mut().history(&history);
        }
        Command::Balance => {
            let side = session.side().map_or("none".to_string(), |s| s.to_string());
            let line = format!(
                "Balance: {} | Stake: {} | Side: {side}",
                session.balance(),
                session.stake()
            );
            session.presenter_mut().line(line);
        }
        Command::Help => {
            let presets = session
                .config()
                .presets
                .iter()
                .enumerate()
                .map(|(i, stake)| format!("{}={stake}", i + 1))
                .collect::<Vec<_>>()
                .join(" ");
            let terminal = session.presenter_mut();
            terminal.line(HELP);
            terminal.line(format!("Presets: {presets}"));
        }
        Command::Quit => return false,
    }
    true
}

/// Leave the table without losing a placed stake: either settle the round
/// at once or call off a roll whose dice are not drawn yet.
fn wind_down<S: State, W: Write, R: Roller>(session: &mut Table<S, W, R>, settle: bool) {
    match *session.phase() {
        Phase::Rolling { .. } if !settle => {
            let _ = session.cancel();
        }
        Phase::Rolling { .. } | Phase::Revealing { .. } => {
            if let Some(report) = session.finish() {
                settled(session, &report);
            }
        }
        _ => {}
    }
    let balance = session.balance();
    session
        .presenter_mut()
        .line(format!("Leaving the table with {balance}."));
    info!(balance, settle, "session closed");
}

/// Aggregate result of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub seed: u64,
    pub requested: u64,
    pub played: u64,
    pub wins: u64,
    pub losses: u64,
    pub triples: u64,
    pub win_bonuses: u64,
    pub consolations: u64,
    pub starting_balance: u64,
    pub final_balance: u64,
    /// Ran out of funds before `requested` rounds
    pub busted: bool,
}

impl Summary {
    fn record(&mut self, report: &RoundReport) {
        self.played += 1;
        if report.won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        if report.outcome == Outcome::Triple {
            self.triples += 1;
        }
        match report.bonus.map(|b| b.kind) {
            Some(BonusKind::WinStreak { .. }) => self.win_bonuses += 1,
            Some(BonusKind::Consolation { .. }) => self.consolations += 1,
            None => {}
        }
        self.final_balance = report.balance;
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed:        {}", self.seed)?;
        writeln!(f, "rounds:      {}/{}", self.played, self.requested)?;
        writeln!(f, "wins:        {}", self.wins)?;
        writeln!(f, "losses:      {}", self.losses)?;
        writeln!(f, "triples:     {}", self.triples)?;
        writeln!(f, "bonuses:     {}", self.win_bonuses)?;
        writeln!(f, "consolation: {}", self.consolations)?;
        write!(
            f,
            "balance:     {} -> {}",
            self.starting_balance, self.final_balance
        )?;
        if self.busted {
            write!(f, " (out of funds)")?;
        }
        Ok(())
    }
}

/// Play `rounds` rounds on `side` against seeded dice, in memory.
///
/// Stops early once the balance cannot cover the stake.
pub fn simulate(
    config: SessionConfig,
    rounds: u64,
    side: Side,
    stake: u64,
    seed: u64,
) -> Result<Summary, BetError> {
    run(config, GameRng::seeded(seed), seed, rounds, side, stake)
}

fn run<R: Roller>(
    config: SessionConfig,
    roller: R,
    seed: u64,
    rounds: u64,
    side: Side,
    stake: u64,
) -> Result<Summary, BetError> {
    let mut session = Session::open(Memory::default(), Silent, roller, config.without_delays());
    let mut summary = Summary {
        seed,
        requested: rounds,
        starting_balance: session.balance(),
        final_balance: session.balance(),
        ..Default::default()
    };

    for _ in 0..rounds {
        match session.play(side, stake) {
            Ok(report) => summary.record(&report),
            Err(BetError::InsufficientFunds { .. }) => {
                summary.busted = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    info!(
        seed,
        played = summary.played,
        balance = summary.final_balance,
        "simulation finished"
    );
    Ok(summary)
}
