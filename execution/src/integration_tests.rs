//! Integration tests for the session state machine.
//!
//! These tests drive full rounds from side selection through settlement,
//! checking balance, streaks, history, persistence and emitted signals.

#[cfg(test)]
mod tests {
    use crate::mocks::{create_session, dice, Recorder, ScriptedDice};
    use crate::session::{BetError, Phase, PhaseError, Session, SessionConfig, TransactionError};
    use crate::state::{load_balance, load_history, Memory, State};
    use crate::{Policy, TriplePolicy};
    use std::time::Duration;
    use taixiu_types::{
        BonusKind, Outcome, Side, Signal, Sound, BALANCE_KEY, HISTORY_KEY, HISTORY_LIMIT,
        INITIAL_BALANCE,
    };

    /// Round (2,1,1) is low; (6,5,4) is high.
    #[test]
    fn test_low_win_scenario() {
        let mut session = create_session(Memory::default(), [dice(2, 1, 1)]);
        assert_eq!(session.balance(), INITIAL_BALANCE);

        session.select_side(Side::Low).unwrap();
        session.set_stake(100).unwrap();
        session.place_bet().unwrap();
        assert_eq!(session.balance(), 9_900);

        assert_eq!(session.advance().unwrap(), None);
        let report = session.advance().unwrap().unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.outcome, Outcome::Low);
        assert!(report.won);
        assert_eq!(report.bonus, None);
        assert_eq!(session.balance(), 10_100);
        assert_eq!(report.balance, 10_100);
        assert!(matches!(session.phase(), Phase::Resolved(_)));
    }

    #[test]
    fn test_triple_is_house_win_for_both_sides() {
        for side in [Side::Low, Side::High] {
            let mut session = create_session(Memory::default(), [dice(6, 6, 6)]);
            let report = session.play(side, 100).unwrap();

            assert_eq!(report.outcome, Outcome::Triple);
            assert!(!report.won);
            assert_eq!(session.balance(), INITIAL_BALANCE - 100);
            assert_eq!(session.history().latest().unwrap().result, Outcome::Triple);
        }
    }

    #[test]
    fn test_triple_recorded_on_side() {
        let config = SessionConfig {
            policy: Policy {
                triple: TriplePolicy::Side,
                ..Policy::default()
            },
            ..SessionConfig::default()
        };
        let mut session = Session::open(
            Memory::default(),
            Recorder::default(),
            ScriptedDice::always(dice(2, 2, 2)),
            config,
        );
        let report = session.play(Side::Low, 100).unwrap();

        assert_eq!(report.outcome, Outcome::Triple);
        assert_eq!(report.recorded, Outcome::Low);
        assert!(!report.won);
        assert_eq!(session.balance(), INITIAL_BALANCE - 100);
        assert_eq!(session.history().latest().unwrap().result, Outcome::Low);
    }

    #[test]
    fn test_stake_over_balance_rejected() {
        let state = Memory::with([(BALANCE_KEY, "300")]);
        let mut session = create_session(state, [dice(2, 1, 1)]);
        assert_eq!(session.balance(), 300);

        session.select_side(Side::High).unwrap();
        session.set_stake(500).unwrap();
        let err = session.place_bet().unwrap_err();

        assert_eq!(
            err,
            BetError::InsufficientFunds {
                balance: 300,
                stake: 500
            }
        );
        assert_eq!(session.balance(), 300);
        assert_eq!(session.phase(), &Phase::Betting { side: Side::High });
        assert_eq!(
            session.presenter().notices(),
            vec!["insufficient balance: have 300, need 500"]
        );
        // Nothing written
        assert_eq!(session.state().get(BALANCE_KEY).as_deref(), Some("300"));
    }

    #[test]
    fn test_guard_conditions() {
        let mut session = create_session(Memory::default(), [dice(2, 1, 1)]);

        // No side selected
        assert_eq!(session.place_bet(), Err(BetError::NoSide));

        // Zero stake
        session.select_side(Side::Low).unwrap();
        session.set_stake(0).unwrap();
        assert_eq!(session.place_bet(), Err(BetError::InvalidStake));

        // Nothing changed
        assert_eq!(session.balance(), INITIAL_BALANCE);
        assert_eq!(session.presenter().notices().len(), 2);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_exact_balance_stake_allowed() {
        let state = Memory::with([(BALANCE_KEY, "500")]);
        let mut session = create_session(state, [dice(6, 5, 4)]);
        let report = session.play(Side::Low, 500).unwrap();
        assert!(!report.won);
        assert_eq!(session.balance(), 0);

        // Broke players cannot bet again
        assert_eq!(
            session.play(Side::Low, 1),
            Err(BetError::InsufficientFunds {
                balance: 0,
                stake: 1
            })
        );
    }

    #[test]
    fn test_one_round_in_flight() {
        let mut session = create_session(Memory::default(), [dice(6, 5, 4)]);
        session.select_side(Side::High).unwrap();
        session.place_bet().unwrap();

        assert_eq!(session.place_bet(), Err(BetError::RoundInProgress));
        assert_eq!(session.select_side(Side::Low), Err(BetError::RoundInProgress));
        assert_eq!(session.set_stake(5), Err(BetError::RoundInProgress));
        assert_eq!(session.deposit(5), Err(TransactionError::RoundInProgress));
        assert_eq!(session.withdraw(5), Err(TransactionError::RoundInProgress));

        // Only one stake was taken
        assert_eq!(session.balance(), INITIAL_BALANCE - 100);
        assert_eq!(session.side(), Some(Side::High));
    }

    #[test]
    fn test_timers_drive_transitions() {
        let mut session = create_session(Memory::default(), [dice(3, 4, 5)]);
        session.select_side(Side::High).unwrap();
        session.place_bet().unwrap();
        assert_eq!(
            session.time_until_next(),
            Some(Duration::from_millis(1_500))
        );

        assert_eq!(session.tick(Duration::from_millis(1_000)), None);
        assert!(matches!(session.phase(), Phase::Rolling { .. }));
        assert_eq!(session.time_until_next(), Some(Duration::from_millis(500)));

        // Overshoot carries into the reveal timer
        assert_eq!(session.tick(Duration::from_millis(700)), None);
        assert!(matches!(session.phase(), Phase::Revealing { .. }));
        assert_eq!(session.time_until_next(), Some(Duration::from_millis(300)));

        let report = session.tick(Duration::from_millis(300)).unwrap();
        assert!(report.won);
        assert_eq!(session.time_until_next(), None);
        assert_eq!(session.tick(Duration::from_secs(5)), None);
    }

    #[test]
    fn test_single_long_tick_settles() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3)]);
        session.select_side(Side::Low).unwrap();
        session.place_bet().unwrap();
        let report = session.tick(Duration::from_secs(10)).unwrap();
        assert_eq!(report.total, 6);
        assert!(report.won);
    }

    #[test]
    fn test_cancel_before_roll_refunds() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3)]);
        session.select_side(Side::Low).unwrap();
        session.set_stake(1_000).unwrap();
        session.place_bet().unwrap();
        assert_eq!(session.balance(), 9_000);

        session.tick(Duration::from_millis(100));
        session.cancel().unwrap();

        assert_eq!(session.balance(), INITIAL_BALANCE);
        assert_eq!(session.phase(), &Phase::Idle);
        assert_eq!(load_balance(session.state()), Some(INITIAL_BALANCE));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_cancel_after_roll_rejected() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3)]);
        session.select_side(Side::Low).unwrap();
        session.place_bet().unwrap();
        session.advance().unwrap();

        assert_eq!(
            session.cancel(),
            Err(PhaseError {
                action: "cancel",
                phase: "revealing"
            })
        );
        // The round still resolves
        let report = session.advance().unwrap().unwrap();
        assert!(report.won);
    }

    #[test]
    fn test_cancel_selection() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3)]);
        assert!(session.cancel().is_err());
        session.select_side(Side::High).unwrap();
        session.cancel().unwrap();
        assert_eq!(session.side(), None);
        assert_eq!(session.place_bet(), Err(BetError::NoSide));
    }

    #[test]
    fn test_acknowledge() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3)]);
        assert!(session.acknowledge().is_err());
        session.play(Side::Low, 100).unwrap();
        session.acknowledge().unwrap();
        assert_eq!(session.phase(), &Phase::Idle);

        // Resolved rounds need a fresh side selection
        session.play(Side::Low, 100).unwrap();
        assert_eq!(session.place_bet(), Err(BetError::NoSide));
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_signal_sequence() {
        let mut session = create_session(Memory::default(), [dice(4, 4, 5)]);
        session.select_side(Side::High).unwrap();
        session.place_bet().unwrap();
        session.finish().unwrap();

        let signals = &session.presenter().signals;
        assert_eq!(signals[0], Signal::Sound(Sound::Click));
        assert_eq!(signals[1], Signal::Sound(Sound::Roll));
        assert_eq!(signals[2], Signal::Rolling);
        assert_eq!(signals[3], Signal::Reveal(dice(4, 4, 5)));
        assert_eq!(signals[4], Signal::Sound(Sound::Win));
        assert!(matches!(signals[5], Signal::Resolved(report) if report.total == 13));
        assert_eq!(signals.len(), 6);
    }

    #[test]
    fn test_losing_round_sounds() {
        let mut session = create_session(Memory::default(), [dice(4, 4, 5)]);
        session.play(Side::Low, 100).unwrap();
        assert_eq!(
            session.presenter().sounds(),
            vec![Sound::Click, Sound::Roll, Sound::Lose]
        );
    }

    #[test]
    fn test_win_streak_bonus_rounds() {
        let mut session = create_session(Memory::default(), [dice(6, 5, 4)]);
        let mut balance = session.balance();
        let mut fired = Vec::new();

        for round in 1..=7u32 {
            let report = session.play(Side::High, 100).unwrap();
            assert!(report.won);
            let bonus = report.bonus.map_or(0, |b| b.amount);
            if bonus > 0 {
                fired.push(round);
                assert_eq!(bonus, 20);
            }
            assert_eq!(session.balance(), balance + 100 + bonus);
            balance = session.balance();
        }

        assert_eq!(fired, vec![3, 6]);
        assert_eq!(session.streak().wins, 7);
        assert_eq!(session.presenter().bonuses().len(), 2);
        assert_eq!(
            session.presenter().bonuses()[1].kind,
            BonusKind::WinStreak { streak: 6 }
        );
    }

    #[test]
    fn test_consolation_after_five_losses() {
        let mut session = create_session(Memory::default(), [dice(6, 5, 4)]);
        for round in 1..=5u32 {
            let report = session.play(Side::Low, 100).unwrap();
            assert!(!report.won);
            assert_eq!(report.bonus.is_some(), round == 5);
        }
        // 5 losses of 100, plus 500 consolation
        assert_eq!(session.balance(), INITIAL_BALANCE);
        assert_eq!(session.streak().losses, 5);
    }

    #[test]
    fn test_streak_interrupted() {
        // win, win, loss, win, win, win
        let script = [
            dice(6, 5, 4),
            dice(6, 5, 4),
            dice(1, 1, 2),
            dice(6, 5, 4),
            dice(6, 5, 4),
            dice(6, 5, 4),
        ];
        let mut session = create_session(Memory::default(), script);
        let bonuses: Vec<bool> = (0..6)
            .map(|_| session.play(Side::High, 100).unwrap().bonus.is_some())
            .collect();
        assert_eq!(bonuses, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_triple_breaks_win_streak() {
        let script = [dice(6, 5, 4), dice(6, 5, 4), dice(5, 5, 5), dice(6, 5, 4)];
        let mut session = create_session(Memory::default(), script);
        for _ in 0..4 {
            session.play(Side::High, 100).unwrap();
        }
        assert_eq!(session.streak().wins, 1);
        assert!(session.presenter().bonuses().is_empty());
    }

    #[test]
    fn test_history_capped_and_persisted() {
        let mut session = create_session(Memory::default(), [dice(1, 2, 3), dice(6, 6, 6)]);
        for _ in 0..25 {
            session.play(Side::Low, 10).unwrap();
        }

        let history = session.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.latest().unwrap().id, 25);
        assert_eq!(history.latest().unwrap().result, Outcome::Low);
        assert_eq!(history.entries()[1].result, Outcome::Triple);

        let stored = load_history(session.state());
        assert_eq!(&stored, history);
        assert_eq!(load_balance(session.state()), Some(session.balance()));
    }

    #[test]
    fn test_reopen_restores_state() {
        let mut state = Memory::default();
        {
            let mut session = Session::open(
                &mut state,
                Recorder::default(),
                ScriptedDice::always(dice(2, 1, 1)),
                SessionConfig::default(),
            );
            session.play(Side::Low, 100).unwrap();
            session.play(Side::Low, 100).unwrap();
        }

        let session = create_session(state, [dice(2, 1, 1)]);
        assert_eq!(session.balance(), 10_200);
        assert_eq!(session.history().len(), 2);
        // Streaks are not persisted
        assert_eq!(session.streak().wins, 0);
    }

    #[test]
    fn test_corrupt_state_uses_defaults() {
        let state = Memory::with([(BALANCE_KEY, "lots"), (HISTORY_KEY, "[oops")]);
        let session = create_session(state, [dice(2, 1, 1)]);
        assert_eq!(session.balance(), INITIAL_BALANCE);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let mut session = create_session(Memory::default(), [dice(2, 1, 1)]);

        assert_eq!(session.deposit(2_500), Ok(12_500));
        assert_eq!(session.withdraw(500), Ok(12_000));
        assert_eq!(load_balance(session.state()), Some(12_000));

        assert_eq!(session.deposit(0), Err(TransactionError::InvalidAmount));
        assert_eq!(session.withdraw(0), Err(TransactionError::InvalidAmount));
        assert_eq!(
            session.withdraw(12_001),
            Err(TransactionError::InsufficientFunds {
                balance: 12_000,
                amount: 12_001
            })
        );
        assert_eq!(session.balance(), 12_000);
        assert_eq!(session.presenter().notices().len(), 5);
    }

    #[test]
    fn test_presets() {
        let mut session = create_session(Memory::default(), [dice(2, 1, 1)]);
        assert_eq!(session.stake(), 100);
        assert_eq!(session.select_preset(2), Ok(1_000));
        assert_eq!(session.stake(), 1_000);
        assert_eq!(session.select_preset(9), Err(BetError::UnknownPreset(9)));
        assert_eq!(session.stake(), 1_000);
    }

    #[test]
    fn test_zero_delay_config_settles_on_first_tick() {
        let mut session = Session::open(
            Memory::default(),
            Recorder::default(),
            ScriptedDice::always(dice(2, 1, 1)),
            SessionConfig::default().without_delays(),
        );
        session.select_side(Side::Low).unwrap();
        session.place_bet().unwrap();
        assert_eq!(session.time_until_next(), Some(Duration::ZERO));
        assert!(session.tick(Duration::ZERO).is_some());
    }

    #[test]
    fn test_seeded_rng_session() {
        let mut a = Session::open(
            Memory::default(),
            Recorder::default(),
            crate::GameRng::seeded(99),
            SessionConfig::default(),
        );
        let mut b = Session::open(
            Memory::default(),
            Recorder::default(),
            crate::GameRng::seeded(99),
            SessionConfig::default(),
        );
        for _ in 0..20 {
            let ra = a.play(Side::High, 50).unwrap();
            let rb = b.play(Side::High, 50).unwrap();
            assert_eq!(ra, rb);
        }
        assert_eq!(a.balance(), b.balance());
    }
}
