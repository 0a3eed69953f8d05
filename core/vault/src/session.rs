//! Interactive session state machine.
//!
//! The controller decides *what* happens — which store operation runs and
//! which snapshot gets rendered — while a [`Console`] collaborator owns
//! *how* anything reaches the terminal. One redraw per return to idle, no
//! timers: refresh only happens on explicit user action.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use otpvault_common::Result;
use otpvault_crypto::MasterKey;
use otpvault_totp::{self as totp, OtpCodePair};

use crate::store::VaultStore;

/// Commands recognized by the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove,
    Refresh,
    Dump,
    Quit,
}

impl Command {
    /// Parse one line of user input, case-insensitively. Unrecognized or
    /// empty input is an implicit refresh.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "a" => Self::Add,
            "r" => Self::Remove,
            "f" => Self::Refresh,
            "d" => Self::Dump,
            "q" => Self::Quit,
            _ => Self::Refresh,
        }
    }
}

/// Lifecycle states of a session.
///
/// The locked state precedes construction: [`Session::unlock`] either
/// yields an idle session or fails, and unlock failure is fatal for the
/// process (no retry loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Adding,
    Removing,
    Dumping,
    Terminated,
}

/// One dashboard line: an entry name with its current and upcoming codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCodes {
    pub name: String,
    pub codes: OtpCodePair,
}

/// Snapshot handed to the console on every redraw.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Seconds until the next 30-second boundary, accurate at draw time.
    pub seconds_remaining: u64,
    pub timestamp_utc: DateTime<Utc>,
    /// Entries sorted by name.
    pub entries: Vec<EntryCodes>,
}

/// Rendering and prompting boundary, implemented by the terminal layer.
pub trait Console {
    /// Redraw the whole screen from a dashboard snapshot.
    fn redraw(&mut self, dashboard: &Dashboard) -> Result<()>;

    /// Show a prompt and read one line of input.
    fn prompt(&mut self, message: &str) -> Result<String>;

    /// Show a one-line report.
    fn notify(&mut self, message: &str) -> Result<()>;

    /// Render the raw serialized document.
    fn show_document(&mut self, raw: &str) -> Result<()>;

    /// Block until the user acknowledges.
    fn acknowledge(&mut self) -> Result<()>;
}

/// The command loop over an unlocked vault.
#[derive(Debug)]
pub struct Session {
    store: VaultStore,
    state: SessionState,
}

impl Session {
    /// Unlock the vault at `path` and enter the idle state.
    ///
    /// # Errors
    /// Propagates [`VaultStore::open`] failures; all of them are fatal at
    /// this point since there is no password retry.
    pub fn unlock(path: impl Into<PathBuf>, key: MasterKey) -> Result<Self> {
        Ok(Self::new(VaultStore::open(path, key)?))
    }

    /// Wrap an already opened store.
    pub fn new(store: VaultStore) -> Self {
        Self {
            store,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Run the blocking read-eval-redraw loop until the user quits.
    ///
    /// Recoverable failures (invalid seed, persist error) are reported via
    /// the console and the loop continues; fatal errors and console I/O
    /// errors propagate out.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        while self.state != SessionState::Terminated {
            console.redraw(&self.dashboard())?;
            let line = console.prompt("Enter option: ")?;
            self.dispatch(Command::parse(&line), console)?;
        }
        Ok(())
    }

    /// Execute one command and return to idle (or terminate).
    pub fn dispatch(&mut self, command: Command, console: &mut dyn Console) -> Result<()> {
        debug!(?command, "dispatch");
        match command {
            Command::Add => self.transition(SessionState::Adding, console, Self::handle_add),
            Command::Remove => {
                self.transition(SessionState::Removing, console, Self::handle_remove)
            }
            Command::Dump => self.transition(SessionState::Dumping, console, Self::handle_dump),
            Command::Refresh => Ok(()),
            Command::Quit => {
                self.state = SessionState::Terminated;
                Ok(())
            }
        }
    }

    fn transition(
        &mut self,
        state: SessionState,
        console: &mut dyn Console,
        handler: fn(&mut Self, &mut dyn Console) -> Result<()>,
    ) -> Result<()> {
        self.state = state;
        let outcome = handler(self, console);
        self.state = SessionState::Idle;
        outcome
    }

    fn handle_add(&mut self, console: &mut dyn Console) -> Result<()> {
        let name = console.prompt("Enter name for the OTP: ")?;
        let seed = console.prompt("Enter the secret key: ")?;

        match self.store.add(&name, &seed) {
            Ok(()) => console.notify(&format!("Added OTP for {}", name))?,
            Err(err) if !err.is_fatal() => {
                console.notify(&format!("Failed to add OTP: {}", err))?
            }
            Err(err) => return Err(err),
        }
        console.acknowledge()
    }

    fn handle_remove(&mut self, console: &mut dyn Console) -> Result<()> {
        let name = console.prompt("Enter name of OTP to remove: ")?;

        match self.store.remove(&name) {
            Ok(true) => console.notify(&format!("Removed OTP for {}", name))?,
            Ok(false) => console.notify(&format!("No OTP found with name {}", name))?,
            Err(err) if !err.is_fatal() => {
                console.notify(&format!("Failed to remove OTP: {}", err))?
            }
            Err(err) => return Err(err),
        }
        console.acknowledge()
    }

    fn handle_dump(&mut self, console: &mut dyn Console) -> Result<()> {
        let raw = self.store.raw_document()?;
        console.show_document(&raw)?;
        console.acknowledge()
    }

    /// Compute the snapshot for the next redraw: seconds to the boundary,
    /// the current UTC instant, and codes for every entry sorted by name.
    ///
    /// An entry whose stored seed no longer yields a code is skipped with
    /// a warning instead of wedging the loop; `add` validation means this
    /// only happens to documents written by something else.
    pub fn dashboard(&self) -> Dashboard {
        let mut names = self.store.list_names();
        names.sort();

        let entries = names
            .into_iter()
            .filter_map(|name| {
                let seed = self.store.seed(&name)?;
                match totp::current_and_next(seed) {
                    Ok(codes) => Some(EntryCodes { name, codes }),
                    Err(err) => {
                        warn!(name = %name, %err, "skipping entry with unusable seed");
                        None
                    }
                }
            })
            .collect();

        Dashboard {
            seconds_remaining: totp::seconds_remaining(),
            timestamp_utc: Utc::now(),
            entries,
        }
    }
}
