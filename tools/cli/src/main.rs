//! otpvault CLI - encrypted TOTP vault with a live code display.
//!
//! Unlocks the vault with a master password (from the OS credential store
//! when available, otherwise an interactive prompt) and runs the
//! read-eval-redraw session loop in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

use otpvault_common::Error;
use otpvault_crypto::{derive_key, KdfParams, Salt};
use otpvault_vault::Session;

mod credential;
mod ui;

/// Vault file name under the user's home directory.
const VAULT_FILENAME: &str = ".otp_secrets.enc";

#[derive(Parser)]
#[command(name = "otpvault")]
#[command(about = "Encrypted TOTP secret vault and code generator")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let vault_path = dirs::home_dir()
        .context("Could not determine home directory")?
        .join(VAULT_FILENAME);

    let password = Zeroizing::new(match credential::get_master_password() {
        Some(password) => password,
        None => rpassword::prompt_password("Enter master password: ")
            .context("Failed to read password")?,
    });

    let key = derive_key(password.as_bytes(), &Salt::embedded(), &KdfParams::standard());

    if !vault_path.exists() {
        println!("First time setup. Creating encrypted storage.");
    }

    let mut session = match Session::unlock(&vault_path, key) {
        Ok(session) => session,
        Err(Error::WrongPasswordOrCorruptFile) => {
            anyhow::bail!("Failed to load secrets. Password might be incorrect.")
        }
        Err(err @ Error::CorruptDocument(_)) => {
            anyhow::bail!("Vault file is damaged: {err}")
        }
        Err(err) => {
            return Err(err).context(format!("Failed to open vault at {}", vault_path.display()))
        }
    };
    info!(path = %vault_path.display(), "vault unlocked");

    let mut console = ui::TerminalConsole::new();
    session.run(&mut console).context("Session failed")?;

    Ok(())
}
