//! # casino
//!
//! A console casino game about guessing numbers. The player sits down with a starting balance,
//! bets part of it on a number between 1 and 10, and wins ten times the bet when the draw matches.
//! A wrong guess costs the bet. The player keeps going until they decline another round, or until
//! they run dry and decline to add more money.

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use anyhow::Result;
use casino_guess::init;

fn main() -> Result<()> {
    init()
}
