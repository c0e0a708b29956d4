use std::fmt;

use colored::Colorize as _;

pub fn error(msg: impl fmt::Display) {
    eprintln!("{} {} {msg}", "✗".red(), "Error:".red());
}

pub fn hint(msg: impl fmt::Display) {
    eprintln!("{} {}", "✗ Hint:".yellow(), msg.to_string().yellow());
}

pub fn warning(msg: impl fmt::Display) {
    eprintln!("{} {msg}", "!".yellow());
}

pub fn success(msg: impl fmt::Display) {
    println!("{} {msg}", "✓".green());
}

pub fn print(msg: impl fmt::Display) {
    println!("{msg}");
}

pub fn help(name: &str, version: &str, description: &str, usage: &str) {
    println!("patchset-{name} {version}\n{description}\n{usage}");
}

pub fn usage(name: &str, usage: &str) {
    eprintln!(
        "{} {}\n{}",
        "✗".red(),
        format!("Error: patchset-{name}: invalid usage").red(),
        usage.trim_end().dimmed()
    );
}
