use std::io::{self, Write};

use colored::Colorize;

/// Print a success message with a green checkmark.
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print progress text with no trailing newline, flushing immediately so it
/// is visible before the next blocking operation starts.
pub fn progress(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

/// Overwrite the current progress line in place via a carriage return.
pub fn progress_line(text: &str) {
    print!("\r{text}");
    let _ = io::stdout().flush();
}

/// Print an error message with a red cross to stderr.
/// Additional lines are treated as hints and prefixed with a blue arrow.
pub fn error(message: &str) {
    let mut lines = message.lines();
    if let Some(first) = lines.next() {
        eprintln!("{} {}", "×".red(), first);
        for line in lines {
            eprintln!("  {} {}", "›".blue(), line);
        }
    }
}
