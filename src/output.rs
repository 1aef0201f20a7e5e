//! Terminal output formatting for the purchaser CLI.
//!
//! Cargo-style status lines with a right-aligned coloured verb. Everything
//! here goes to stderr; stdout only ever carries the `--json` report.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// How a status line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    /// Progress: `Building`, `Finished`.
    Progress,
    /// Neutral notes: `Loading`, `Skipping`, verbose detail.
    Note,
    /// Something the user should look at: `Warning`.
    Attention,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Progress => "\x1b[32m",
            Tone::Note => "\x1b[36m",
            Tone::Attention => "\x1b[33m",
        }
    }
}

/// Status printer for a build run.
///
/// Colour is used only when stderr is a terminal. Verbose lines are dropped
/// unless enabled with [`Printer::with_verbose`].
pub struct Printer {
    color: bool,
    verbose: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// e.g. "    Building loco1 (1x) -> 1x/loco1_purchase.png"
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(Tone::Progress, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(Tone::Note, verb, message);
    }

    /// Detail only shown with `--verbose`, dimmed.
    pub fn verbose(&self, verb: &str, message: &str) {
        if self.verbose {
            self.emit(Tone::Note, verb, &self.dim(message));
        }
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(Tone::Attention, verb, message);
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn emit(&self, tone: Tone, verb: &str, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{}", self.format_line(tone, verb, message));
    }

    fn format_line(&self, tone: Tone, verb: &str, message: &str) -> String {
        if self.color {
            format!("{BOLD}{}{verb:>VERB_WIDTH$}{RESET} {message}", tone.ansi())
        } else {
            format!("{verb:>VERB_WIDTH$} {message}")
        }
    }
}

/// Label for one unit pass: `loco1 (2x)`.
pub fn unit_label(id: &str, scale: u32) -> String {
    format!("{} ({}x)", id, scale)
}

/// The `Finished` line of a build.
pub fn build_summary(written: usize, fresh: usize, failed: usize) -> String {
    format!(
        "{} written, {} fresh, {} failed",
        plural(written, "icon", "icons"),
        fresh,
        failed
    )
}

/// Pluralize a count: `plural(1, "unit", "units")` → "1 unit".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { pluralized })
}

/// Path relative to the working directory when it lies below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Printer {
        Printer {
            color: false,
            verbose: true,
        }
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "unit", "units"), "1 unit");
        assert_eq!(plural(0, "unit", "units"), "0 units");
        assert_eq!(plural(5, "icon", "icons"), "5 icons");
    }

    #[test]
    fn test_display_path_absolute() {
        let p = Path::new("/nonexistent/path/to/units.csv");
        assert_eq!(display_path(p), "/nonexistent/path/to/units.csv");
    }

    #[test]
    fn test_display_path_cwd_is_dot() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd), ".");
    }

    #[test]
    fn test_plain_line_right_aligns_verb() {
        let line = plain().format_line(Tone::Progress, "Building", "loco1 (1x)");
        assert_eq!(line, "    Building loco1 (1x)");
        assert_eq!(plain().dim("1x/loco_purchase.png"), "1x/loco_purchase.png");
    }

    #[test]
    fn test_coloured_line_wraps_verb() {
        let printer = Printer {
            color: true,
            verbose: false,
        };
        let line = printer.format_line(Tone::Attention, "Warning", "odd");
        assert!(line.starts_with("\x1b[1m\x1b[33m"));
        assert!(line.ends_with("\x1b[0m odd"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(unit_label("emu", 2), "emu (2x)");
        assert_eq!(build_summary(1, 2, 0), "1 icon written, 2 fresh, 0 failed");
    }
}
