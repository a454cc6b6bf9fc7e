use crate::core::data::Journal;
use crate::core::operations::StoreGateway;
use crate::utils::error::AppResult;
use crate::utils::output::{print_success, print_warning};
use std::io::Write;

/// Set `year` on every journal whose title contains `title`
pub async fn handle_update_command(
    gateway: &StoreGateway,
    title: &str,
    year: &str,
    out: &mut dyn Write,
) -> AppResult<()> {
    let updated = gateway
        .update_field::<Journal>("title", title, "year", year)
        .await?;

    if updated == 0 {
        print_warning(out, &format!("No journal title contains '{}'", title))?;
    } else {
        print_success(out, &format!("Updated {} journal(s)", updated))?;
    }
    Ok(())
}
