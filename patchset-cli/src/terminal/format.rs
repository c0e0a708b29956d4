use colored::{ColoredString, Colorize as _};

use patchset::PatchSet;

/// Format a content hash in its short form.
pub fn sha(sha: &str) -> ColoredString {
    sha.get(..7).unwrap_or(sha).yellow()
}

/// Format the work in progress state of a patch set, padded to `width`.
pub fn wip(patch_set: &PatchSet, width: usize) -> ColoredString {
    match patch_set.wip {
        Some(true) => format!("{:<width$}", "wip").magenta(),
        Some(false) => format!("{:<width$}", "ready").green(),
        None => format!("{:<width$}", "-").dimmed(),
    }
}

/// Format a patch set number, right-aligned to `width`.
pub fn num(patch_set: &PatchSet, width: usize) -> ColoredString {
    let num = format!("{:>width$}", patch_set.num.to_string());

    if patch_set.num.is_edit() {
        num.cyan().italic()
    } else {
        num.bold()
    }
}
