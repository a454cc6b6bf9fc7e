use crate::core::operations::StoreGateway;
use crate::core::samples;
use crate::utils::error::{AppResult, report_error};
use crate::utils::output::{print_success, print_warning};
use std::io::Write;

/// Insert the built-in articles and journals.
///
/// Every record is attempted; failed inserts are printed one by one and do
/// not abort the rest.
pub async fn handle_seed_command(gateway: &StoreGateway, out: &mut dyn Write) -> AppResult<()> {
    let report = gateway.seed(&samples::articles(), &samples::journals()).await;

    for err in &report.errors {
        report_error(out, err);
    }

    let summary = format!(
        "Added {} articles and {} journals",
        report.articles, report.journals
    );
    if report.errors.is_empty() {
        print_success(out, &summary)?;
    } else {
        print_warning(out, &format!("{} ({} failed)", summary, report.errors.len()))?;
    }
    Ok(())
}
