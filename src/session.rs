//! The session module holds the state of one sitting at the table and the loop that drives it,
//! from the player introducing themselves to the closing balance.
//!
//! Each round walks the same phases: the bet, the guess, the resolution, then either the
//! zero-balance check or the replay check. The session only ends from one of those two checks, or
//! when the console has no more input to give.

use tracing::{debug, info};

use crate::input::{take_bet, take_choice, take_guess, take_integer, Console, ConsoleError};
use crate::messages;
use crate::rules::{resolve, BetPolicy, Dealer, Round};

/// This enum holds the reasons a session can come to an end.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EndReason {
    /// The player did not want to play another round.
    DeclinedReplay,
    /// The player ran out of money and did not want to add more.
    DeclinedTopUp,
    /// The console ran out of input in the middle of the session.
    InputClosed,
}

/// A summary of a finished session.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Ending {
    /// The balance the player walked away with.
    pub balance: i64,
    /// Why the session ended.
    pub reason: EndReason,
    /// How many rounds were resolved.
    pub rounds: u32,
}

/// The phase the session is in. Opening the session covers the initial phase, so the loop starts
/// at the bet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Phase {
    /// Showing the rules and waiting for a valid bet.
    AwaitBet,
    /// Waiting for a valid guess on an accepted bet.
    AwaitGuess {
        /// The accepted bet.
        bet: i64,
    },
    /// The session is over.
    End(EndReason),
    /// Asking whether to play another round.
    ReplayCheck,
    /// Drawing the winning number and settling the bet.
    Resolve {
        /// The accepted bet.
        bet: i64,
        /// The accepted guess.
        guess: u8,
    },
    /// The balance hit zero; asking whether to add money.
    ZeroBalanceCheck,
}

/// One player's sitting at the table. The dealer is owned by the session, so a random generator is
/// seeded once when the session is built and never again.
#[derive(Debug)]
pub struct Session<D> {
    /// The current balance.
    balance: i64,
    /// The source of winning numbers.
    dealer: D,
    /// The player's name, fixed for the whole session.
    name: String,
    /// How bets are validated.
    policy: BetPolicy,
    /// The number of rounds resolved so far.
    rounds: u32,
}

impl<D: Dealer> Session<D> {
    /// This function creates a session for a player who is already known.
    pub const fn new(name: String, balance: i64, dealer: D, policy: BetPolicy) -> Self {
        Self {
            balance,
            dealer,
            name,
            policy,
            rounds: 0,
        }
    }

    /// This function opens a session by asking the player for their name and starting balance.
    ///
    /// The starting balance is taken as given. Under the strict policy a balance below one sends
    /// the player straight to the question of adding money.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the console fails or closes before both answers are in.
    pub fn open<C: Console>(
        console: &mut C,
        dealer: D,
        policy: BetPolicy,
    ) -> Result<Self, ConsoleError> {
        let name = console.read_line(messages::NAME_PROMPT)?;
        let balance = take_integer(console, &messages::starting_balance_prompt(&name))?;

        info!(player = %name, balance, ?policy, "session opened");
        Ok(Self::new(name, balance, dealer, policy))
    }

    /// The current balance.
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// The player's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This function plays rounds until the player walks away or the input runs out, then prints
    /// the closing balance.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the console fails. A closed input is not an error; it ends the
    /// session with [`EndReason::InputClosed`].
    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<Ending, ConsoleError> {
        let mut phase = Phase::AwaitBet;

        loop {
            if let Phase::End(reason) = phase {
                break self.finish(console, reason);
            }

            phase = match self.advance(console, phase) {
                Ok(next) => next,
                Err(ConsoleError::Closed) => Phase::End(EndReason::InputClosed),
                Err(err) => break Err(err),
            };
        }
    }

    /// Draws the winning number for an accepted bet and guess and applies the outcome.
    pub fn play_round(&mut self, bet: i64, guess: u8) -> Round {
        let drawn = self.dealer.draw();
        let round = resolve(self.balance, bet, guess, drawn);

        self.balance = round.balance;
        self.rounds = self.rounds.saturating_add(1);
        debug!(
            bet,
            guess,
            drawn,
            balance = round.balance,
            outcome = ?round.outcome,
            "round resolved"
        );

        round
    }

    /// Whether the strict policy leaves no bet the balance could cover. Such a balance goes back to
    /// the zero-balance check, where the player can add money or leave.
    const fn cannot_bet(&self) -> bool {
        matches!(self.policy, BetPolicy::Strict) && self.balance < 1
    }

    /// This function runs a single phase and returns the one that follows it.
    fn advance<C: Console>(&mut self, console: &mut C, phase: Phase) -> Result<Phase, ConsoleError> {
        match phase {
            Phase::AwaitBet if self.cannot_bet() => Ok(Phase::ZeroBalanceCheck),
            Phase::AwaitBet => {
                console.clear_screen()?;
                for line in messages::rules() {
                    console.write_line(&line)?;
                }
                console.write_line(&messages::current_balance(self.balance))?;

                let bet = take_bet(console, &self.name, self.balance, self.policy)?;
                Ok(Phase::AwaitGuess { bet })
            }
            Phase::AwaitGuess { bet } => {
                let guess = take_guess(console)?;
                Ok(Phase::Resolve { bet, guess })
            }
            Phase::Resolve { bet, guess } => {
                let round = self.play_round(bet, guess);
                for line in messages::round_report(&self.name, &round) {
                    console.write_line(&line)?;
                }

                if self.balance == 0 || self.cannot_bet() {
                    Ok(Phase::ZeroBalanceCheck)
                } else {
                    Ok(Phase::ReplayCheck)
                }
            }
            Phase::ZeroBalanceCheck => {
                console.write_line(messages::NO_MONEY)?;
                if !take_choice(console, messages::TOP_UP_PROMPT)? {
                    return Ok(Phase::End(EndReason::DeclinedTopUp));
                }

                self.balance = take_integer(console, messages::TOP_UP_AMOUNT_PROMPT)?;
                info!(balance = self.balance, "balance topped up");

                if self.cannot_bet() {
                    Ok(Phase::ZeroBalanceCheck)
                } else {
                    Ok(Phase::ReplayCheck)
                }
            }
            Phase::ReplayCheck => {
                if take_choice(console, messages::REPLAY_PROMPT)? {
                    Ok(Phase::AwaitBet)
                } else {
                    Ok(Phase::End(EndReason::DeclinedReplay))
                }
            }
            Phase::End(reason) => Ok(Phase::End(reason)),
        }
    }

    /// Prints the closing balance and sums the session up.
    fn finish<C: Console>(&self, console: &mut C, reason: EndReason) -> Result<Ending, ConsoleError> {
        console.write_line(&messages::farewell(self.balance))?;

        let ending = Ending {
            balance: self.balance,
            reason,
            rounds: self.rounds,
        };
        info!(?ending, "session ended");
        Ok(ending)
    }
}

/// This function plays a whole session on `console`: the welcome banner, the player's name and
/// balance, and every round until the session ends.
///
/// Returns `None` when the input closes before the session could even be opened.
///
/// # Errors
///
/// Returns a [`ConsoleError`] if the console fails.
pub fn play<C: Console, D: Dealer>(
    console: &mut C,
    dealer: D,
    policy: BetPolicy,
) -> Result<Option<Ending>, ConsoleError> {
    console.write_line(&messages::welcome())?;

    let mut session = match Session::open(console, dealer, policy) {
        Ok(session) => session,
        Err(ConsoleError::Closed) => {
            info!("input closed before the session was opened");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    session.run(console).map(Some)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::input::StreamConsole;

    /// Deals a fixed sequence of numbers, repeating the last one.
    struct Rigged(Vec<u8>);

    impl Dealer for Rigged {
        fn draw(&mut self) -> u8 {
            if self.0.len() > 1 {
                self.0.remove(0)
            } else {
                self.0.first().copied().unwrap_or(1)
            }
        }
    }

    fn scripted(script: &[&str]) -> StreamConsole<Cursor<Vec<u8>>, Vec<u8>> {
        let input: String = script.iter().map(|line| format!("{line}\n")).collect();
        StreamConsole::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    #[test]
    fn playing_a_round_updates_balance_and_count() {
        let mut session = Session::new(
            "Alice".to_owned(),
            100,
            Rigged(vec![7, 2]),
            BetPolicy::Strict,
        );

        let won = session.play_round(10, 7);
        assert_eq!(won.balance, 200, "a win pays ten times the bet");
        let lost = session.play_round(50, 7);
        assert_eq!(lost.balance, 150, "a loss costs the bet");

        assert_eq!(session.balance(), 150, "balance should follow the rounds");
        assert_eq!(session.rounds, 2, "both rounds should count");
        assert_eq!(session.name(), "Alice", "the name never changes");
    }

    #[test]
    fn top_up_replaces_the_balance_and_continues() {
        let mut console = scripted(&["100", "3", "y", "40", "n"]);
        let mut session = Session::new(
            "Carol".to_owned(),
            100,
            Rigged(vec![9]),
            BetPolicy::Strict,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: 40,
                reason: EndReason::DeclinedReplay,
                rounds: 1,
            }),
            "the top up should replace the balance"
        );
    }

    #[test]
    fn replay_starts_another_round() {
        let mut console = scripted(&["10", "4", "y", "20", "4", "n"]);
        let mut session = Session::new(
            "Dan".to_owned(),
            100,
            Rigged(vec![1, 4]),
            BetPolicy::Strict,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: 290,
                reason: EndReason::DeclinedReplay,
                rounds: 2,
            }),
            "the second round should be played"
        );
    }

    #[test]
    fn closed_input_mid_round_ends_gracefully() {
        let mut console = scripted(&["10"]);
        let mut session = Session::new(
            "Eve".to_owned(),
            100,
            Rigged(vec![1]),
            BetPolicy::Strict,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: 100,
                reason: EndReason::InputClosed,
                rounds: 0,
            }),
            "closing the input should end the session"
        );
    }

    #[test]
    fn closed_input_before_opening_yields_nothing() {
        let mut console = scripted(&["Frank"]);
        let played = play(&mut console, Rigged(vec![1]), BetPolicy::Strict);
        assert!(matches!(played, Ok(None)), "nothing should be played");
    }

    #[test]
    fn topping_up_to_nothing_asks_again() {
        let mut console = scripted(&["100", "3", "y", "0", "n"]);
        let mut session = Session::new(
            "Gil".to_owned(),
            100,
            Rigged(vec![9]),
            BetPolicy::Strict,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: 0,
                reason: EndReason::DeclinedTopUp,
                rounds: 1,
            }),
            "an empty top up should lead back to the top-up question"
        );

        let output = String::from_utf8_lossy(&console.into_output()).into_owned();
        assert_eq!(output.matches("add more money").count(), 2, "{output}");
        assert!(!output.contains("play again"), "{output}");
    }

    #[test]
    fn strict_session_without_funds_skips_the_bet() {
        let mut console = scripted(&["n"]);
        let mut session = Session::new(
            "Hana".to_owned(),
            -20,
            Rigged(vec![1]),
            BetPolicy::Strict,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: -20,
                reason: EndReason::DeclinedTopUp,
                rounds: 0,
            }),
            "no bet can be placed, so only the top-up question is left"
        );

        let output = String::from_utf8_lossy(&console.into_output()).into_owned();
        assert!(!output.contains("enter amount to bet"), "{output}");
    }

    #[test]
    fn permissive_session_still_bets_from_nothing() {
        let mut console = scripted(&["0", "5", "n"]);
        let mut session = Session::new(
            "Ida".to_owned(),
            0,
            Rigged(vec![1]),
            BetPolicy::Permissive,
        );

        let ending = session.run(&mut console).ok();
        assert_eq!(
            ending,
            Some(Ending {
                balance: 0,
                reason: EndReason::DeclinedTopUp,
                rounds: 1,
            }),
            "a zero bet goes through when the policy allows it"
        );
    }
}
