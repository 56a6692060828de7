//! The library components of the game. They allow initializing the game, talking to the player
//! through a console, drawing the winning number and settling each round.
//!
//! The starting point of the library is the game.rs file, which sets everything up and hands over
//! to the session loop in session.rs.

mod game;
mod input;
mod messages;
mod rules;
mod session;

pub use game::init;
pub use input::{
    parse_choice, parse_integer, Console, ConsoleError, ParseError, StreamConsole, TermConsole,
};
pub use rules::{
    check_guess, resolve, BetError, BetPolicy, Dealer, GuessError, Outcome, Round, HIGHEST, LOWEST,
    PAYOUT_MULTIPLIER,
};
pub use session::{play, EndReason, Ending, Session};
