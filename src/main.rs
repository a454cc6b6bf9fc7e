use docshelf::cli::CommandReader;
use docshelf::commands::Dispatcher;
use docshelf::config::Config;
use docshelf::core::operations::StoreGateway;
use docshelf::store::{self, ConnectOptions};
use docshelf::utils::error::{AppError, report_error};
use docshelf::utils::output::OutputStyle;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(err: &AppError) -> ExitCode {
    report_error(&mut io::stderr(), err);
    ExitCode::from(err.exit_code())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };
    init_tracing(&config.log.level);

    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "{}", OutputStyle::muted(&config.summary()));

    let store = match store::connect(
        &config.db.connection_string(),
        ConnectOptions::create_db_if_missing().http_port(config.db.http_port),
    )
    .await
    {
        Ok(store) => store,
        Err(e) => return fail(&e),
    };
    let gateway = StoreGateway::new(store);

    for (namespace, result) in gateway.open_all().await {
        match result {
            Ok(()) => {
                let _ = writeln!(stdout, "Table '{}' was opened!", namespace);
            }
            Err(e) => {
                tracing::warn!(namespace, error = %e, "failed to open namespace");
                let _ = writeln!(stdout, "Table '{}' was not opened!", namespace);
                report_error(&mut stdout, &e);
            }
        }
    }

    let reader = CommandReader::new(io::stdin().lock(), io::stdout());
    let outcome = Dispatcher::new(&gateway).run(reader, &mut stdout).await;

    if let Err(e) = gateway.close().await {
        tracing::warn!(error = %e, "failed to close the store");
    }

    match outcome {
        Ok(executed) => {
            tracing::info!(executed, "session finished");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
