use crate::core::operations::StoreGateway;
use crate::utils::error::{AppError, AppResult};
use crate::utils::output::print_success;
use std::io::Write;

fn namespace_name(input: &str) -> AppResult<&str> {
    let name = input.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Table name cannot be empty".to_string()));
    }
    Ok(name)
}

/// Remove every record of a namespace, keeping its indexes
pub async fn handle_purge_command(
    gateway: &StoreGateway,
    namespace: &str,
    out: &mut dyn Write,
) -> AppResult<()> {
    let namespace = namespace_name(namespace)?;
    gateway.truncate(namespace).await?;
    print_success(out, &format!("Table '{}' was purged", namespace))?;
    Ok(())
}

pub async fn handle_delete_command(
    gateway: &StoreGateway,
    namespace: &str,
    out: &mut dyn Write,
) -> AppResult<()> {
    let namespace = namespace_name(namespace)?;
    gateway.drop_namespace(namespace).await?;
    print_success(out, &format!("Table '{}' was deleted", namespace))?;
    Ok(())
}
