//! Numbered pattern prompt for `save-window`.

use crate::selection::{Choice, PendingSave};
use std::io::{BufRead, Write};

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choose(Choice),
    Cancel,
}

/// Parse one answer: a number, `global`, `cancel`, or `custom <text>`.
/// Returns `None` for anything else.
pub fn parse_answer(input: &str) -> Option<Answer> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return Some(Answer::Choose(Choice::Number(n)));
    }

    let lower = input.to_lowercase();
    match lower.as_str() {
        "global" | "g" => return Some(Answer::Choose(Choice::Global)),
        "cancel" | "c" | "q" => return Some(Answer::Cancel),
        _ => {}
    }

    let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    if command.eq_ignore_ascii_case("custom") {
        return Some(Answer::Choose(Choice::Custom(rest.trim().to_string())));
    }
    None
}

/// Write the numbered suggestion list
pub fn render_choices(pending: &PendingSave, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "Choose a window pattern for {:?} at ({}, {}):",
        pending.name, pending.x, pending.y
    )?;
    writeln!(out, "  0. global (every window)")?;
    for (i, suggestion) in pending.suggestions.iter().enumerate() {
        match suggestion.kind.label() {
            Some(label) => writeln!(
                out,
                "  {}. {} [{}] {}",
                i + 1,
                suggestion.pattern,
                label,
                suggestion.description
            )?,
            None => writeln!(out, "  {}. {}", i + 1, suggestion.pattern)?,
        }
    }
    writeln!(out, "Enter a number, `global`, `custom <text>` or `cancel`:")
}

/// Read lines until one parses. End of input counts as cancel.
pub fn read_answer(input: &mut impl BufRead, out: &mut impl Write) -> std::io::Result<Answer> {
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Answer::Cancel);
        }
        match parse_answer(&line) {
            Some(answer) => return Ok(answer),
            None if line.trim().is_empty() => {}
            None => writeln!(out, "Unrecognised answer {:?}", line.trim())?,
        }
    }
}
