//! Interactive menu input
//!
//! [`CommandReader`] turns a line-oriented input stream into a lazy sequence
//! of [`MenuCommand`]s. The sequence ends when the user answers "no" or the
//! input runs out, so a scripted input drives the menu exactly like a
//! terminal does.

use crate::utils::error::AppResult;
use crate::utils::interactive::{Answer, parse_yes_no, prompt_input};
use crate::utils::output::{OutputStyle, print_warning};
use std::io::{BufRead, Write};

pub const YES_NO_PROMPT: &str = "Do you want to make a request[Y/N]?";

const MENU: [&str; 6] = [
    "1 - Get the list of journals",
    "2 - Find a journal by its name",
    "3 - Add new documents",
    "4 - Update journal information",
    "5 - Purge a table",
    "6 - Delete a table",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// List journals, oldest first
    ListJournals,

    /// Find journals whose title contains the given text
    SearchJournals { title: String },

    /// Insert the built-in articles and journals
    SeedDemoData,

    /// Set the year of every journal whose title contains `title`
    UpdateJournalYear { title: String, year: String },

    /// Remove every record of a namespace
    PurgeTable { namespace: String },

    /// Remove a namespace entirely
    DeleteTable { namespace: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingYesNo,
    AwaitingCommand,
    Terminated,
}

pub struct CommandReader<R, W> {
    input: R,
    out: W,
    state: State,
}

impl<R: BufRead, W: Write> CommandReader<R, W> {
    /// Read commands from `input`, writing prompts to `out`
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            state: State::AwaitingYesNo,
        }
    }

    fn ask(&mut self, prompt: &str) -> AppResult<Option<String>> {
        prompt_input(&mut self.input, &mut self.out, prompt)
    }

    fn print_menu(&mut self) -> AppResult<()> {
        writeln!(
            self.out,
            "{}",
            OutputStyle::header("Choose options(for instance \"1\"): ")
        )?;
        for entry in MENU {
            writeln!(self.out, "{}", entry)?;
        }
        Ok(())
    }

    /// Read the follow-up answers for `selector`.
    ///
    /// `Ok(None)` means the selection was not a menu entry, or input ended
    /// before the command was complete.
    fn read_command(&mut self, selector: &str) -> AppResult<Option<MenuCommand>> {
        let command = match selector.parse::<u8>() {
            Ok(1) => MenuCommand::ListJournals,
            Ok(2) => {
                let Some(title) = self.ask("Enter the title of the journal you are looking for: ")? else {
                    return Ok(None);
                };
                MenuCommand::SearchJournals { title }
            }
            Ok(3) => MenuCommand::SeedDemoData,
            Ok(4) => {
                let Some(title) = self.ask("Enter the title of the journal you want to update:")? else {
                    return Ok(None);
                };
                let Some(year) =
                    self.ask("Specify the new value for the field \"year\" you want to enter:")?
                else {
                    return Ok(None);
                };
                MenuCommand::UpdateJournalYear { title, year }
            }
            Ok(5) => {
                let Some(namespace) = self.ask("Enter the table name you want to purge")? else {
                    return Ok(None);
                };
                MenuCommand::PurgeTable { namespace }
            }
            Ok(6) => {
                let Some(namespace) = self.ask("Enter the table you want to delete")? else {
                    return Ok(None);
                };
                MenuCommand::DeleteTable { namespace }
            }
            _ => {
                tracing::debug!(selector, "ignoring unknown menu selection");
                return Ok(None);
            }
        };
        Ok(Some(command))
    }

    fn next_command(&mut self) -> AppResult<Option<MenuCommand>> {
        loop {
            match self.state {
                State::Terminated => return Ok(None),
                State::AwaitingYesNo => {
                    let Some(answer) = self.ask(YES_NO_PROMPT)? else {
                        self.state = State::Terminated;
                        continue;
                    };
                    match parse_yes_no(&answer) {
                        Answer::Yes => self.state = State::AwaitingCommand,
                        Answer::No => self.state = State::Terminated,
                        Answer::Unrecognized => {
                            print_warning(&mut self.out, "You need to choose \"Y\" or \"N\"")?;
                        }
                    }
                }
                State::AwaitingCommand => {
                    self.print_menu()?;
                    let Some(selector) = self.ask("")? else {
                        self.state = State::Terminated;
                        continue;
                    };
                    self.state = State::AwaitingYesNo;
                    if let Some(command) = self.read_command(&selector)? {
                        return Ok(Some(command));
                    }
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Iterator for CommandReader<R, W> {
    type Item = AppResult<MenuCommand>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_command() {
            Ok(command) => command.map(Ok),
            Err(e) => {
                self.state = State::Terminated;
                Some(Err(e))
            }
        }
    }
}
