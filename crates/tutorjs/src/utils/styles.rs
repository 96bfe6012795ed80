use anstyle::{AnsiColor, Color, Style};
use bridge_relay::{LogEvent, LogLevel, LogTranscript};
use clap::builder::Styles;

use crate::utils::{CHECK, MARK};

const ACCENT: Color = Color::Ansi(AnsiColor::Yellow);
const OK: Color = Color::Ansi(AnsiColor::Green);
const FAIL: Color = Color::Ansi(AnsiColor::Red);

pub fn get_styles() -> Styles {
    let heading = Style::new().bold().underline().fg_color(Some(ACCENT));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(Style::new().fg_color(Some(OK)))
        .invalid(Style::new().bold().fg_color(Some(FAIL)))
        .error(Style::new().bold().fg_color(Some(FAIL)))
        .valid(Style::new().bold().underline().fg_color(Some(OK)))
        .placeholder(Style::new().dimmed())
}

/// How a transcript line of `level` is shown in the terminal log panel.
pub(crate) fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Style::new(),
        LogLevel::Error => Style::new().bold().fg_color(Some(FAIL)),
    }
}

fn fmt_style(msg: &str, style: &Style) -> String {
    format!("{style}{msg}{style:#}")
}

/// One log panel line, `> message`, styled by level.
pub(crate) fn fmt_event(event: &LogEvent) -> String {
    fmt_style(&format!("> {}", event.message), &level_style(event.level))
}

/// `session N: X lines, Y errors`, with the error count highlighted when
/// there are any.
pub(crate) fn fmt_transcript_summary(transcript: &LogTranscript) -> String {
    let errors = transcript.errors().count();
    let error_text = format!("{errors} errors");
    let error_text = if errors > 0 {
        fmt_style(&error_text, &level_style(LogLevel::Error))
    } else {
        fmt_dimmed(&error_text)
    };

    format!(
        "session {}: {}, {error_text}",
        transcript.session(),
        fmt_dimmed(&format!("{} lines", transcript.len()))
    )
}

pub(crate) fn fmt_bold(msg: &str) -> String {
    fmt_style(msg, &Style::new().bold())
}

pub(crate) fn fmt_dimmed(msg: &str) -> String {
    fmt_style(msg, &Style::new().dimmed())
}

pub(crate) fn fmt_success(msg: &str) -> String {
    format!("{} {msg}", fmt_style(CHECK, &Style::new().fg_color(Some(OK))))
}

pub(crate) fn fmt_error(msg: &str) -> String {
    format!("{} {msg}", fmt_style(MARK, &level_style(LogLevel::Error)))
}
