use crate::core::data::Journal;
use colored::*;
use std::io::{self, Write};

pub struct OutputStyle;

impl OutputStyle {
    pub fn title(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn print_field(out: &mut dyn Write, label: &str, value: &str) -> io::Result<()> {
        writeln!(out, "{:>12}: {}", Self::label(label), value)
    }

    /// "Found N total documents, first M documents:"
    pub fn print_page_header(out: &mut dyn Write, total: usize, shown: usize) -> io::Result<()> {
        writeln!(
            out,
            "Found {} total documents, first {} documents:",
            Self::info(&total.to_string()),
            Self::info(&shown.to_string())
        )
    }

    pub fn print_journal(out: &mut dyn Write, journal: &Journal) -> io::Result<()> {
        writeln!(out, "{}", Self::separator())?;
        Self::print_field(out, "ID", &journal.id.to_string())?;
        Self::print_field(out, "Title", &Self::title(&journal.title).to_string())?;
        Self::print_field(out, "Year", &journal.year.to_string())?;
        if journal.articles.is_empty() {
            Self::print_field(out, "Articles", &Self::muted("none").to_string())?;
        } else {
            Self::print_field(out, "Articles", &journal.articles.len().to_string())?;
            for article in &journal.articles {
                writeln!(
                    out,
                    "              - {} ({}) by {}",
                    article.title,
                    article.year,
                    article.authors.join(", ")
                )?;
            }
        }
        Ok(())
    }
}

pub fn print_success(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "✅ {}", OutputStyle::success(message))
}

pub fn print_warning(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "⚠️  {}", OutputStyle::warning(message))
}

pub fn print_empty_result(out: &mut dyn Write, item_type: &str) -> io::Result<()> {
    writeln!(out, "{}", OutputStyle::muted(&format!("No {} found", item_type)))
}
