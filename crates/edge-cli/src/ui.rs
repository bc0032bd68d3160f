//! Status messages and color handling for terminal output.
//!
//! Status lines go to stderr so they never mix with JSON on stdout; the
//! `explain` summary is built from [`heading`] and [`field`].
//!
//! # Examples
//!
//! ```no_run
//! use edge_cli::ui;
//!
//! ui::init_colors(false);
//! println!("{}", ui::heading("Settings"));
//! println!("{}", ui::field("env", "production"));
//! ui::success("Wrote 19 passes to babel.json");
//! ```

use owo_colors::{OwoColorize, Stream, Style};

/// Whether stderr should get ANSI colors.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

/// Apply the color decision globally.
///
/// # Arguments
///
/// * `no_color` - `--no-color` was passed; wins over `FORCE_COLOR`
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
    owo_colors::set_override(enabled);
}

/// Print a success message to stderr.
///
/// # Arguments
///
/// * `message` - Message to display
///
/// # Examples
///
/// ```no_run
/// use edge_cli::ui::success;
///
/// success("Wrote 19 passes to babel.json");
/// ```
pub fn success(message: &str) {
    let mark = Style::new().green().bold();
    eprintln!("{} {}", "✓".if_supports_color(Stream::Stderr, |t| t.style(mark)), message);
}

/// A `label: value` line for summaries, label dimmed.
///
/// Labels are right-aligned so values line up in a column.
///
/// # Arguments
///
/// * `label` - Setting name
/// * `value` - Anything displayable
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{} {}", console::style(format!("{label:>14}:")).dim(), value)
}

/// Section heading for summaries.
pub fn heading(title: &str) -> String {
    format!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn no_color_disables_colors() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
        assert!(!should_use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    #[serial]
    fn plain_fields_are_aligned() {
        init_colors(true);
        assert_eq!(field("env", "production"), "           env: production");
    }
}
