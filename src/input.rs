//! This module contains everything related to taking input from the player. Reads go through the
//! [`Console`] trait so that the same validation runs on a real terminal, on piped input and in
//! tests.
//!
//! Numbers are never trusted: every numeric read is parsed into a named [`ParseError`] first, and
//! the `take_*` helpers keep prompting until the value passes both parsing and the game rules.

use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::messages;
use crate::rules::{check_guess, BetPolicy};

/// An optionally signed run of ASCII digits, with nothing around it.
#[expect(
    clippy::unwrap_used,
    reason = "The pattern is a literal and is covered by the parsing tests."
)]
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A[+-]?[0-9]+\z").unwrap());

/// A line-oriented console the session talks through.
///
/// Only `read_line` and `write_line` are required. Clearing the display is optional and does
/// nothing unless the implementation knows how to do it.
pub trait Console {
    /// Clears whatever the player currently sees.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the underlying display fails.
    fn clear_screen(&mut self) -> Result<(), ConsoleError> {
        Ok(())
    }

    /// Shows `prompt` and reads back a single line, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Closed`] once there is nothing left to read, or the I/O error that
    /// interrupted the read.
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    /// Writes one full line of output.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the output cannot be written.
    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError>;
}

/// This enum holds the ways talking to the player can fail.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The input reached its end; no more answers will come.
    #[error("input closed")]
    Closed,
    /// Reading or writing the underlying streams failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The interactive prompt failed.
    #[error("prompt failed: {0}")]
    Prompt(dialoguer::Error),
}

impl From<dialoguer::Error> for ConsoleError {
    /// A terminal that hits end of file surfaces it as an I/O error from the prompt, which still
    /// means the player is gone.
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(ref source) if source.kind() == io::ErrorKind::UnexpectedEof => {
                Self::Closed
            }
            other => Self::Prompt(other),
        }
    }
}

/// This enum holds the reasons a line of text could not be read as a whole number.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// The text is not an optionally signed sequence of digits.
    #[error("{input:?} is not a whole number")]
    Malformed {
        /// The offending text, trimmed.
        input: String,
    },
    /// The text is a number, but too large to hold.
    #[error("{input} is too large")]
    Overflow {
        /// The offending text, trimmed.
        input: String,
    },
}

/// A [`Console`] over any pair of line-based streams. It is what the game falls back to when stdin
/// is not a terminal, and what the tests drive the session with.
#[derive(Debug)]
pub struct StreamConsole<R, W> {
    /// Where the answers are read from.
    input: R,
    /// Where prompts and output lines go.
    output: W,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    /// This function wraps a reader and a writer into a console.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// This function gives back the writer, with everything the session wrote to it.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

/// A [`Console`] on an interactive terminal, with themed prompts and optional screen clearing.
pub struct TermConsole {
    /// Whether `clear_screen` actually clears the terminal.
    clear: bool,
    /// The terminal all reads and writes go through.
    term: Term,
    /// The look of the prompts.
    theme: ColorfulTheme,
}

impl TermConsole {
    /// This function sets up the terminal for the game: the window title is set to the name of the
    /// game, and `clear` decides whether the screen is wiped between rounds.
    #[must_use]
    pub fn new(term: Term, clear: bool) -> Self {
        term.set_title("casino");

        Self {
            clear,
            term,
            theme: ColorfulTheme::default(),
        }
    }
}

impl Console for TermConsole {
    fn clear_screen(&mut self) -> Result<(), ConsoleError> {
        if self.clear {
            self.term.clear_screen()?;
        }
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        let input: String = Input::with_theme(&self.theme)
            .with_prompt(format!("{}", style(prompt).bold()))
            .allow_empty(true)
            .interact_text_on(&self.term)?;

        Ok(input)
    }

    fn write_line(&mut self, line: &str) -> Result<(), ConsoleError> {
        self.term.write_line(line)?;
        Ok(())
    }
}

/// This function reads a whole number out of a line, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] for anything that is not an optionally signed run of digits,
/// and [`ParseError::Overflow`] for numbers that do not fit in an `i64`.
pub fn parse_integer(text: &str) -> Result<i64, ParseError> {
    let text = text.trim();

    if !INTEGER_RE.is_match(text) {
        return Err(ParseError::Malformed {
            input: text.to_owned(),
        });
    }

    text.parse().map_err(|_err| ParseError::Overflow {
        input: text.to_owned(),
    })
}

/// This function reads a yes/no answer the way the game always has: only the first non-blank
/// character counts, and only `y` or `Y` means yes.
#[must_use]
pub fn parse_choice(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('y' | 'Y'))
}

/// This function prompts for a bet until one fits both the balance and the bet policy.
pub(crate) fn take_bet<C: Console>(
    console: &mut C,
    name: &str,
    balance: i64,
    policy: BetPolicy,
) -> Result<i64, ConsoleError> {
    loop {
        let bet = take_integer(console, &messages::bet_prompt(name))?;

        match policy.check(bet, balance) {
            Ok(()) => break Ok(bet),
            Err(err) => {
                debug!(bet, balance, %err, "bet rejected");
                console.write_line(&messages::rejected(&err))?;
            }
        }
    }
}

/// This function is in charge of taking the guess, prompting again for anything outside of the
/// numbers in play.
pub(crate) fn take_guess<C: Console>(console: &mut C) -> Result<u8, ConsoleError> {
    loop {
        let number = take_integer(console, messages::GUESS_PROMPT)?;

        match check_guess(number) {
            Ok(guess) => break Ok(guess),
            Err(err) => {
                debug!(%err, "guess rejected");
                console.write_line(&messages::rejected(&err))?;
            }
        }
    }
}

/// Prompts for a whole number until one parses.
pub(crate) fn take_integer<C: Console>(console: &mut C, prompt: &str) -> Result<i64, ConsoleError> {
    loop {
        let line = console.read_line(prompt)?;

        match parse_integer(&line) {
            Ok(number) => break Ok(number),
            Err(err) => {
                debug!(%err, "numeric input rejected");
                console.write_line(&messages::rejected(&err))?;
            }
        }
    }
}

/// Asks a yes/no question.
pub(crate) fn take_choice<C: Console>(console: &mut C, prompt: &str) -> Result<bool, ConsoleError> {
    let line = console.read_line(prompt)?;
    Ok(parse_choice(&line))
}
