//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database setup (init) and shared utilities (open_db)
//! - `transactions` - Transaction commands (add, edit, delete, show, list, totals, clear)
//! - `reports` - Report commands (month, categories, year)
//! - `export` - CSV export and restore
//! - `analysis` - Remote analysis commands (analyze, advise)

pub mod analysis;
pub mod core;
pub mod export;
pub mod reports;
pub mod transactions;

// Re-export command functions for main.rs
pub use analysis::*;
pub use self::core::*;
pub use export::*;
pub use reports::*;
pub use transactions::*;

use std::io::{self, BufRead, Write};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print `message` and ask for a `[y/N]` answer on stdin
pub fn confirm(message: &str) -> anyhow::Result<bool> {
    print!("{}\n\nAre you sure? [y/N] ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Money with two decimals
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
