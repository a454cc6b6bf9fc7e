pub mod delete;
pub mod list;
pub mod search;
pub mod seed;
pub mod update;

use crate::cli::MenuCommand;
use crate::core::operations::StoreGateway;
use crate::utils::error::{AppResult, report_error};
use std::io::Write;

/// Runs menu commands against the store gateway.
///
/// Store failures are printed and the loop goes on; only failures of the
/// command source itself (reading input, writing prompts) end the run.
pub struct Dispatcher<'a> {
    gateway: &'a StoreGateway,
}

impl<'a> Dispatcher<'a> {
    pub fn new(gateway: &'a StoreGateway) -> Self {
        Self { gateway }
    }

    /// Execute every command in order and return how many were run
    pub async fn run<I>(&self, commands: I, out: &mut dyn Write) -> AppResult<usize>
    where
        I: IntoIterator<Item = AppResult<MenuCommand>>,
    {
        let mut executed = 0;
        for command in commands {
            self.execute(&command?, out).await;
            executed += 1;
        }
        Ok(executed)
    }

    pub async fn execute(&self, command: &MenuCommand, out: &mut dyn Write) {
        tracing::debug!(?command, "executing menu command");
        let result = match command {
            MenuCommand::ListJournals => list::handle_list_command(self.gateway, out).await,
            MenuCommand::SearchJournals { title } => {
                search::handle_search_command(self.gateway, title, out).await
            }
            MenuCommand::SeedDemoData => seed::handle_seed_command(self.gateway, out).await,
            MenuCommand::UpdateJournalYear { title, year } => {
                update::handle_update_command(self.gateway, title, year, out).await
            }
            MenuCommand::PurgeTable { namespace } => {
                delete::handle_purge_command(self.gateway, namespace, out).await
            }
            MenuCommand::DeleteTable { namespace } => {
                delete::handle_delete_command(self.gateway, namespace, out).await
            }
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "menu command failed");
            report_error(out, &e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::utils::error::AppError;

    #[tokio::test]
    async fn test_run_counts_commands() {
        let gateway = open_gateway().await;
        let mut out = Vec::new();
        let commands = vec![Ok(MenuCommand::SeedDemoData), Ok(MenuCommand::ListJournals)];

        let executed = Dispatcher::new(&gateway).run(commands, &mut out).await.unwrap();
        assert_eq!(executed, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("IT industry"));
    }

    #[tokio::test]
    async fn test_store_errors_do_not_stop_the_run() {
        let gateway = open_gateway().await;
        let mut out = Vec::new();
        let commands = vec![
            Ok(MenuCommand::PurgeTable {
                namespace: "missing".to_string(),
            }),
            Ok(MenuCommand::SeedDemoData),
        ];

        let executed = Dispatcher::new(&gateway).run(commands, &mut out).await.unwrap();
        assert_eq!(executed, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("missing"));
        assert!(text.contains("3 articles"));
    }

    #[tokio::test]
    async fn test_input_errors_end_the_run() {
        let gateway = open_gateway().await;
        let mut out = Vec::new();
        let commands = vec![
            Err(AppError::Io("stdin closed".to_string())),
            Ok(MenuCommand::SeedDemoData),
        ];

        let err = Dispatcher::new(&gateway).run(commands, &mut out).await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
