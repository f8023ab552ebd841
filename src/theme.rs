//! Colors for CLI output.
//!
//! Colors are switched off when `NO_COLOR` is set or the stream being written
//! is not a terminal, so piped summaries and errors stay plain text.

/// Terminal colors used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Gray,
    DarkGray,
}

/// Color theme for CLI output.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary text color (used for most content)
    pub text_primary: Color,
    /// Secondary/dimmed text color
    pub text_secondary: Color,
    /// Warning color (annotation mismatches, skipped backups)
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    /// Emit escape codes at all
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: Color::Gray,
            text_secondary: Color::DarkGray,
            warning: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            enabled: true,
        }
    }
}

impl Theme {
    /// Same colors, no escape codes.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color_to_ansi(color), text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    /// Format text with the primary color (for CLI output).
    pub fn primary_text(&self, text: &str) -> String {
        self.paint(self.text_primary, text)
    }

    /// Format text with the secondary color (for CLI output).
    pub fn secondary_text(&self, text: &str) -> String {
        self.paint(self.text_secondary, text)
    }

    pub fn warning_text(&self, text: &str) -> String {
        self.paint(self.warning, text)
    }

    /// Format text with the error color (for CLI output).
    pub fn error_text(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    /// Format text with the success color (for CLI output).
    pub fn success_text(&self, text: &str) -> String {
        self.paint(self.success, text)
    }
}

/// ANSI reset sequence
const ANSI_RESET: &str = "\x1b[0m";

fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Red => "\x1b[31m",
        Color::Green => "\x1b[32m",
        Color::Yellow => "\x1b[33m",
        Color::Gray => "\x1b[37m",
        Color::DarkGray => "\x1b[90m",
    }
}

fn theme_when(no_color: bool, is_tty: bool) -> Theme {
    if no_color || !is_tty {
        Theme::plain()
    } else {
        Theme::default()
    }
}

fn theme_for(stream: atty::Stream) -> Theme {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    theme_when(no_color, atty::is(stream))
}

/// Theme for text written to stdout, honoring `NO_COLOR` and TTY detection.
pub fn current_theme() -> Theme {
    theme_for(atty::Stream::Stdout)
}

/// Theme for text written to stderr.
pub fn error_theme() -> Theme {
    theme_for(atty::Stream::Stderr)
}
