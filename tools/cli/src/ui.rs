//! Terminal rendering for the session loop.

use std::io::{self, Write};

use otpvault_common::Result;
use otpvault_vault::{Console, Dashboard};

const RULE: &str = "==================================================";

/// ANSI-terminal implementation of the session's rendering boundary.
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn redraw(&mut self, dashboard: &Dashboard) -> Result<()> {
        clear_screen()?;

        println!(
            "OTP Generator - New codes in {} seconds",
            dashboard.seconds_remaining
        );
        println!("{}", RULE);
        println!(
            "Current Time (UTC): {}",
            dashboard.timestamp_utc.format("%Y-%m-%d %H:%M:%S")
        );
        println!("{}", RULE);

        if dashboard.entries.is_empty() {
            println!("No OTP entries found. Add one using option 'a'.");
        } else {
            for (idx, entry) in dashboard.entries.iter().enumerate() {
                println!(
                    "{}. {}: current={}, next={}",
                    idx + 1,
                    entry.name,
                    entry.codes.current,
                    entry.codes.next
                );
            }
        }

        println!();
        println!("Options:");
        println!("a - Add new OTP secret");
        println!("r - Remove OTP secret");
        println!("f - Refresh codes");
        println!("d - Dump raw keys file contents");
        println!("q - Quit");
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        print!("\n{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }

    fn show_document(&mut self, raw: &str) -> Result<()> {
        clear_screen()?;
        println!("\x1b[1;34mDisplaying contents of encrypted keys file:\x1b[0m");
        println!();
        println!("{}", raw);
        Ok(())
    }

    fn acknowledge(&mut self) -> Result<()> {
        self.prompt("Press Enter to continue...").map(|_| ())
    }
}

fn clear_screen() -> Result<()> {
    print!("\x1b[2J\x1b[1;1H");
    io::stdout().flush()?;
    Ok(())
}
