//! Stateless console formatting for the pipeline driver.
//!
//! Every function writes a fully styled line and returns; there is no shared
//! UI state. Styling degrades to plain text automatically when stdout is not
//! a terminal.

use chrono::Local;
use console::style;

/// Print a stage banner: a timestamped header line followed by the stage
/// message, matching the operator-facing rhythm of the pipeline.
pub fn stage_banner(stage: &str, msg: &str) {
    println!(
        "{} {}",
        style(format!("[{}]", Local::now().format("%H:%M:%S"))).magenta(),
        style(format!("== {} ==", stage)).blue().bold()
    );
    println!("{}\n", style(msg).green());
}

/// Print a dim informational line.
pub fn info(msg: &str) {
    println!("{}", style(msg).dim());
}

/// Print a yellow warning line to stderr.
pub fn warn(msg: &str) {
    eprintln!("{}", style(format!("warning: {}", msg)).yellow());
}

/// Print a bold red error line to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", style(msg).red().bold());
}
