use crate::core::data::Journal;
use crate::core::operations::{Page, QuerySpec, StoreGateway};
use crate::utils::error::AppResult;
use crate::utils::output::{OutputStyle, print_empty_result};
use std::io::Write;

pub async fn handle_list_command(gateway: &StoreGateway, out: &mut dyn Write) -> AppResult<()> {
    let page: Page<Journal> = gateway.query(&QuerySpec::sorted_by("year", false)).await?;
    print_journal_page(out, &page)
}

pub(crate) fn print_journal_page(out: &mut dyn Write, page: &Page<Journal>) -> AppResult<()> {
    if page.items.is_empty() {
        print_empty_result(out, "journals")?;
        return Ok(());
    }

    OutputStyle::print_page_header(out, page.total, page.items.len())?;
    for journal in &page.items {
        OutputStyle::print_journal(out, journal)?;
    }
    Ok(())
}
