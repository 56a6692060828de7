//! All the text the player gets to see. Prompts and report lines are built here so that the session
//! only decides *what* to say.

use std::fmt::Display;

use console::style;

use crate::rules::{Outcome, Round, HIGHEST, LOWEST, PAYOUT_MULTIPLIER};

/// Prompt for the number to bet on.
pub(crate) const GUESS_PROMPT: &str = "Guess any betting number between 1 & 10 :";

/// Prompt for the player's name.
pub(crate) const NAME_PROMPT: &str = "What's your Name:";

/// Shown when a round leaves the player with nothing.
pub(crate) const NO_MONEY: &str = "You have no money to play.";

/// Asked at the end of every round that did not end the session.
pub(crate) const REPLAY_PROMPT: &str = "-->Do you want to play again (y/n)?";

/// Asked once the balance hits zero.
pub(crate) const TOP_UP_PROMPT: &str = "Do you want to add more money to your balance? (y/n)";

/// Prompt for the replacement balance after agreeing to a top up.
pub(crate) const TOP_UP_AMOUNT_PROMPT: &str = "How much money did you want to add? $";

/// Banner printed once, before the player introduces themselves.
pub(crate) fn welcome() -> String {
    format!(
        "{}",
        style("======== WELCOME TO CASINO NUMBER GUESSING =======").bold()
    )
}

/// The rules, as shown at the top of every round.
pub(crate) fn rules() -> Vec<String> {
    vec![
        format!(
            "{}",
            style("====== CASINO NUMBER GUESSING RULES! ======").bold()
        ),
        format!("  1. Choose a number between {LOWEST} to {HIGHEST}."),
        format!("  2. Winner gets {PAYOUT_MULTIPLIER} times of the money bet."),
        "  3. Wrong bet, and you lose the amount you bet.".to_owned(),
    ]
}

pub(crate) fn starting_balance_prompt(name: &str) -> String {
    format!("{name}, please enter the starting balance to play game: $")
}

pub(crate) fn current_balance(balance: i64) -> String {
    format!("Your current balance is ${balance}")
}

pub(crate) fn bet_prompt(name: &str) -> String {
    format!("Hey {name}, enter amount to bet : $")
}

/// Explains why an answer was turned down, before it is asked for again.
pub(crate) fn rejected<E: Display>(err: &E) -> String {
    let mut reason = err.to_string();
    if let Some(first) = reason.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    format!("{}", style(format!("{reason}! Please try again.")).yellow())
}

/// This function renders the lines reporting a resolved round: what was won or lost, the winning
/// number and the balance left to the player.
pub(crate) fn round_report(name: &str, round: &Round) -> Vec<String> {
    let verdict = match round.outcome {
        Outcome::Win { payout } => {
            format!("{}", style(format!("You are in luck!! You have won ${payout}")).bold().green())
        }
        Outcome::Lose { loss } => {
            format!("{}", style(format!("Oops, better luck next time! You lost ${loss}")).bold())
        }
    };

    vec![
        verdict,
        format!("The winning number was: {}", round.drawn),
        format!("{name}, You have a balance of ${}", round.balance),
    ]
}

pub(crate) fn farewell(balance: i64) -> String {
    format!("Thanks for playing the game. Your balance is ${balance}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{resolve, BetError};

    #[test]
    fn rejection_is_capitalised() {
        console::set_colors_enabled(false);
        assert_eq!(
            rejected(&BetError::NotPositive),
            "Betting amount must be at least $1! Please try again.",
            "rejections read as a sentence"
        );
    }

    #[test]
    fn report_mentions_the_winning_number_and_balance() {
        console::set_colors_enabled(false);
        let lines = round_report("Alice", &resolve(100, 10, 7, 7));

        assert_eq!(
            lines,
            vec![
                "You are in luck!! You have won $100".to_owned(),
                "The winning number was: 7".to_owned(),
                "Alice, You have a balance of $200".to_owned(),
            ],
            "a win reports payout, number and balance"
        );
    }
}
