use std::io::Write;
use taixiu_execution::Presenter;
use taixiu_types::{Bonus, BonusKind, History, RoundReport, Signal, Sound};
use tracing::warn;

/// Presenter that writes plain-text lines to a terminal.
///
/// Animations collapse into single lines. Sounds are dropped, except for an
/// optional bell on wins.
pub struct Terminal<W: Write> {
    writer: W,
    bell: bool,
}

impl<W: Write> Terminal<W> {
    pub fn new(writer: W, bell: bool) -> Self {
        Self { writer, bell }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write one line, logging (not propagating) failures.
    pub fn line(&mut self, text: impl AsRef<str>) {
        if let Err(e) = writeln!(self.writer, "{}", text.as_ref()).and_then(|_| self.writer.flush())
        {
            warn!(error = %e, "failed to write to terminal");
        }
    }

    pub fn history(&mut self, history: &History) {
        if history.is_empty() {
            self.line("No rounds played yet.");
            return;
        }
        self.line(format!("Recent: {}", history.strip()));
        for entry in history.entries() {
            self.line(format!(
                "  #{:<4} {:>2} points  {}",
                entry.id,
                entry.total,
                entry.result.name()
            ));
        }
    }

    fn bonus(&mut self, bonus: &Bonus) {
        let text = match bonus.kind {
            BonusKind::WinStreak { streak } => {
                format!("Hot hand! {streak} wins in a row: +{} bonus", bonus.amount)
            }
            BonusKind::Consolation { streak } => {
                format!(
                    "Don't give up! {streak} losses in a row: +{} consolation",
                    bonus.amount
                )
            }
        };
        self.line(text);
    }

    fn resolved(&mut self, report: &RoundReport) {
        let verdict = if report.won {
            format!("You won {}", report.payout - report.bet.stake)
        } else {
            format!("You lost {}", report.bet.stake)
        };
        self.line(format!(
            "Result: {} points - {}. {verdict}. Balance: {}",
            report.total,
            report.recorded.name(),
            report.balance
        ));
    }
}

impl<W: Write> Presenter for Terminal<W> {
    fn signal(&mut self, signal: Signal) {
        match signal {
            Signal::Sound(Sound::Win) if self.bell => {
                if let Err(e) = write!(self.writer, "\x07").and_then(|_| self.writer.flush()) {
                    warn!(error = %e, "failed to ring bell");
                }
            }
            Signal::Sound(_) => {}
            Signal::Rolling => self.line("Rolling the dice..."),
            Signal::Reveal(dice) => self.line(format!("Dice: {dice}")),
            Signal::Bonus(bonus) => self.bonus(&bonus),
            Signal::Resolved(report) => self.resolved(&report),
            Signal::Notice(message) => self.line(format!("! {message}")),
        }
    }
}
