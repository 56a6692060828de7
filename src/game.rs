//! The game module contains everything needed before the first prompt: command-line parsing,
//! logging, the random generator and the choice of console.
//!
//! It contains the `init()` function, which sets those up and then hands over to the session.

use std::io::{self, IsTerminal as _};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use console::Term;
use fastrand::Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::input::{Console, StreamConsole, TermConsole};
use crate::rules::BetPolicy;
use crate::session::play;

/// This struct holds the command-line interface of the game, as parsed by clap. Every option has a
/// sensible default, so running the game bare is the common case.
#[derive(Parser)]
#[command(name = "casino", version, about)]
#[command(next_line_help = true)]
struct Cli {
    /// Keep earlier rounds on screen instead of clearing it before each one.
    #[arg(long)]
    no_clear: bool,
    /// Accept bets of zero or less, as long as they do not exceed the balance.
    ///
    /// By default a bet has to be at least 1. With this flag only the upper bound is checked, as in
    /// the classic console version of the game.
    #[arg(long)]
    permissive_bets: bool,
    /// The seed for the winning numbers; the current time in seconds by default.
    ///
    /// Setting it makes every draw of a session reproducible.
    #[arg(long, env = "CASINO_SEED", value_name = "SEED")]
    seed: Option<u64>,
    /// Log debug events to stderr. `RUST_LOG` takes precedence when set.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// This function maps the bet flag onto the policy the session enforces.
    const fn policy(&self) -> BetPolicy {
        if self.permissive_bets {
            BetPolicy::Permissive
        } else {
            BetPolicy::Strict
        }
    }
}

/// Initializes the game and plays a full session. This is a `main()` function of sorts though it
/// is still called from main.rs.
///
/// The generator is created here, once, and moved into the session so it is never reseeded. When
/// both stdin and stdout are terminals the session gets themed prompts; otherwise it reads plain
/// lines, which keeps piped input working.
///
/// # Errors
///
/// Returns the console error that stopped the session, if any. Running out of input is not an
/// error.
pub fn init() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let seed = cli.seed.unwrap_or_else(seed_from_clock);
    debug!(seed, "seeded the generator");
    let rng = Rng::with_seed(seed);

    if io::stdin().is_terminal() && console::user_attended() {
        let mut console = TermConsole::new(Term::stdout(), !cli.no_clear);
        run(&mut console, rng, cli.policy())
    } else {
        let mut console = StreamConsole::new(io::stdin().lock(), io::stdout().lock());
        run(&mut console, rng, cli.policy())
    }
}

/// Plays the session and logs how it went.
fn run<C: Console>(console: &mut C, rng: Rng, policy: BetPolicy) -> Result<()> {
    match play(console, rng, policy)? {
        Some(ending) => info!(
            balance = ending.balance,
            rounds = ending.rounds,
            reason = ?ending.reason,
            "thanks for playing"
        ),
        None => info!("no session was played"),
    }

    Ok(())
}

/// This function installs the log subscriber. Logs go to stderr so they never land between a
/// prompt and its answer, and stay at `warn` unless asked otherwise.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Seconds since the Unix epoch, or zero for a clock set before it.
fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
