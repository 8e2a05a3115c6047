//! Operator-facing channel.
//!
//! Human-readable progress text, out-of-band notifications, and the single
//! yes/no confirmation gate before dispatch. Opaque to the core; the CLI
//! uses the console implementation, tests use a scripted double.

use std::io::{self, BufRead, Write};

pub trait Operator: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    /// Out-of-band notification, the desktop-toast equivalent for runs
    /// left unattended in a terminal.
    fn notify(&self, message: &str);

    /// Synchronous yes/no gate. Returning `false` aborts before dispatch.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Console implementation used by the CLI.
pub struct ConsoleOperator {
    assume_yes: bool,
}

impl ConsoleOperator {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Operator for ConsoleOperator {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("WARNING: {}", message);
    }

    fn notify(&self, message: &str) {
        println!("*** {} ***", message);
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        println!("{}", title);
        println!("{}", message);

        if self.assume_yes {
            println!("Continuing (--yes).");
            return true;
        }

        print!("Continue? [y/N] ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
