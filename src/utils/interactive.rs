use crate::utils::error::AppResult;
use std::io::{BufRead, Write};

/// Print `prompt` and read one line.
///
/// Returns `None` at end of input; otherwise the line without surrounding
/// whitespace.
pub fn prompt_input(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> AppResult<Option<String>> {
    writeln!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unrecognized,
}

pub fn parse_yes_no(input: &str) -> Answer {
    match input.trim() {
        "Y" | "y" | "yes" | "Yes" | "YES" => Answer::Yes,
        "N" | "n" | "no" | "No" | "NO" => Answer::No,
        _ => Answer::Unrecognized,
    }
}
