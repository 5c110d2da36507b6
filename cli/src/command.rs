use std::str::FromStr;
use taixiu_types::Side;
use thiserror::Error;

/// A line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Side(Side),
    Stake(u64),
    /// Zero-based preset index (entered one-based)
    Preset(usize),
    Roll,
    Cancel,
    Deposit(u64),
    Withdraw(u64),
    History,
    Balance,
    Help,
    Quit,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),
    #[error("{command} needs a number")]
    MissingAmount { command: &'static str },
    #[error("not a valid amount: {0}")]
    InvalidAmount(String),
}

pub const HELP: &str = "\
Commands:
  tai | high          bet on TÀI (11-17)
  xiu | low           bet on XỈU (4-10)
  stake <n>           set the stake
  preset <n>          use stake preset n
  roll                place the bet and roll
  cancel              clear the selection or call off a roll
  deposit <n>         add funds
  withdraw <n>        remove funds
  history             show recent rounds
  balance             show balance and stake
  help                show this message
  quit                leave the table (a roll in progress is refunded)";

fn amount(command: &'static str, arg: Option<&str>) -> Result<u64, ParseCommandError> {
    let arg = arg.ok_or(ParseCommandError::MissingAmount { command })?;
    arg.parse()
        .map_err(|_| ParseCommandError::InvalidAmount(arg.to_string()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let arg = words.next();
        let command = match head.to_lowercase().as_str() {
            "stake" | "s" => Command::Stake(amount("stake", arg)?),
            "preset" | "p" => {
                let n = amount("preset", arg)?;
                if n == 0 {
                    return Err(ParseCommandError::InvalidAmount(n.to_string()));
                }
                Command::Preset((n - 1) as usize)
            }
            "roll" | "r" | "bet" => Command::Roll,
            "cancel" | "c" => Command::Cancel,
            "deposit" | "d" => Command::Deposit(amount("deposit", arg)?),
            "withdraw" | "w" => Command::Withdraw(amount("withdraw", arg)?),
            "history" | "h" => Command::History,
            "balance" | "b" => Command::Balance,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => match Side::from_str(other) {
                Ok(side) => Command::Side(side),
                Err(_) => return Err(ParseCommandError::Unknown(head.to_string())),
            },
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("tai".parse(), Ok(Command::Side(Side::High)));
        assert_eq!("  LOW ".parse(), Ok(Command::Side(Side::Low)));
        assert_eq!("xỉu".parse(), Ok(Command::Side(Side::Low)));
        assert_eq!("stake 250".parse(), Ok(Command::Stake(250)));
        assert_eq!("preset 1".parse(), Ok(Command::Preset(0)));
        assert_eq!("roll".parse(), Ok(Command::Roll));
        assert_eq!("deposit 5000".parse(), Ok(Command::Deposit(5_000)));
        assert_eq!("w 10".parse(), Ok(Command::Withdraw(10)));
        assert_eq!("q".parse(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ParseCommandError::Empty));
        assert_eq!(
            "stake".parse::<Command>(),
            Err(ParseCommandError::MissingAmount { command: "stake" })
        );
        assert_eq!(
            "stake -5".parse::<Command>(),
            Err(ParseCommandError::InvalidAmount("-5".into()))
        );
        assert_eq!(
            "preset 0".parse::<Command>(),
            Err(ParseCommandError::InvalidAmount("0".into()))
        );
        assert!(matches!(
            "dance".parse::<Command>(),
            Err(ParseCommandError::Unknown(_))
        ));
    }
}
