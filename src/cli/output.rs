//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::AccountInfo;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Overwrite the current stderr line with search progress.
pub fn progress(tried: u64, percent: f64) {
    eprint!(
        "\r{} {} addresses tried ({:.2}% of estimate)",
        style("\u{2026}").cyan(),
        tried,
        percent
    );
}

/// End a run of `progress` lines.
pub fn progress_done() {
    eprintln!();
}

/// Print a table of accounts (Address, Memo).
pub fn print_accounts_table(accounts: &[AccountInfo]) {
    if accounts.is_empty() {
        info("No accounts in this vault yet.");
        tip("Run `coldvault create --memo <LABEL>` or `coldvault import --memo <LABEL>`.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Address", "Memo"]);

    for a in accounts {
        table.add_row(vec![a.address.clone(), a.memo.clone()]);
    }

    println!("{table}");
}
