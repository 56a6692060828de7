//! The rules module holds everything that decides a round without touching the console: the range
//! of numbers in play, the payout, what counts as an acceptable bet or guess, and the resolution
//! of a round once the winning number has been drawn.

use fastrand::Rng;
use thiserror::Error;

/// The highest number that can be guessed or drawn.
pub const HIGHEST: u8 = 10;
/// The lowest number that can be guessed or drawn.
pub const LOWEST: u8 = 1;
/// The factor applied to the bet when the guess matches the drawn number.
pub const PAYOUT_MULTIPLIER: i64 = 10;

/// This enum holds the reasons a bet gets turned down before a round is played.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BetError {
    /// The bet asks for more money than the player holds.
    #[error("betting amount can't be more than the current balance of ${balance}")]
    ExceedsBalance {
        /// The balance the bet was checked against.
        balance: i64,
    },
    /// The bet is zero or negative, which the strict policy does not allow.
    #[error("betting amount must be at least $1")]
    NotPositive,
}

/// This enum holds the two ways a bet can be validated against the current balance.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum BetPolicy {
    /// Only the upper bound is enforced, so zero and negative bets go through as long as they do
    /// not exceed the balance.
    Permissive,
    /// Bets must be strictly positive and no larger than the balance.
    #[default]
    Strict,
}

impl BetPolicy {
    /// This function checks a bet against the balance it would be played from.
    ///
    /// # Errors
    ///
    /// Returns [`BetError::ExceedsBalance`] when the bet is above the balance, and
    /// [`BetError::NotPositive`] when the policy is strict and the bet is below one.
    pub const fn check(self, bet: i64, balance: i64) -> Result<(), BetError> {
        if bet > balance {
            return Err(BetError::ExceedsBalance { balance });
        }

        match self {
            Self::Strict if bet <= 0 => Err(BetError::NotPositive),
            Self::Permissive | Self::Strict => Ok(()),
        }
    }
}

/// A source of winning numbers. The session draws exactly once per round through this trait, so
/// anything that can produce a number in `LOWEST..=HIGHEST` can stand in for the random generator.
pub trait Dealer {
    /// Draws the winning number for one round.
    fn draw(&mut self) -> u8;
}

impl Dealer for Rng {
    fn draw(&mut self) -> u8 {
        self.u8(LOWEST..=HIGHEST)
    }
}

/// The guess fell outside of the numbers in play.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("number should be between {} and {}, got {}", LOWEST, HIGHEST, .0)]
pub struct GuessError(pub i64);

/// This enum holds the result of a single round along with the amount of money that moved.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// The guess was wrong and the bet is gone.
    Lose {
        /// The amount taken from the balance.
        loss: i64,
    },
    /// The guess matched the drawn number.
    Win {
        /// The amount added to the balance.
        payout: i64,
    },
}

/// A resolved round, with both numbers that were compared and the balance left afterwards.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Round {
    /// The balance after the outcome was applied.
    pub balance: i64,
    /// The amount that was bet.
    pub bet: i64,
    /// The winning number.
    pub drawn: u8,
    /// The number picked by the player.
    pub guess: u8,
    /// Whether the round was won or lost, and by how much.
    pub outcome: Outcome,
}

/// This function turns a raw number into a guess, as long as it lies within the numbers in play.
///
/// # Errors
///
/// Returns a [`GuessError`] carrying the rejected number when it is not in `LOWEST..=HIGHEST`.
pub fn check_guess(number: i64) -> Result<u8, GuessError> {
    u8::try_from(number)
        .ok()
        .filter(|guess| (LOWEST..=HIGHEST).contains(guess))
        .ok_or(GuessError(number))
}

/// This function settles a round: a matching guess pays the bet times [`PAYOUT_MULTIPLIER`], any
/// other guess costs the bet. Arithmetic saturates at the bounds of `i64`.
#[must_use]
pub const fn resolve(balance: i64, bet: i64, guess: u8, drawn: u8) -> Round {
    let (balance, outcome) = if guess == drawn {
        let payout = bet.saturating_mul(PAYOUT_MULTIPLIER);
        (balance.saturating_add(payout), Outcome::Win { payout })
    } else {
        (balance.saturating_sub(bet), Outcome::Lose { loss: bet })
    };

    Round {
        balance,
        bet,
        drawn,
        guess,
        outcome,
    }
}
