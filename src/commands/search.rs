use crate::commands::list::print_journal_page;
use crate::core::data::Journal;
use crate::core::operations::{Page, QuerySpec, StoreGateway};
use crate::utils::error::AppResult;
use std::io::Write;

/// Show journals whose title contains `title`, matched case-sensitively
pub async fn handle_search_command(
    gateway: &StoreGateway,
    title: &str,
    out: &mut dyn Write,
) -> AppResult<()> {
    let spec = QuerySpec::sorted_by("year", false).containing("title", title);
    let page: Page<Journal> = gateway.query(&spec).await?;
    print_journal_page(out, &page)
}
