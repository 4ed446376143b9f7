//! Column suggestions from the extraction service

use anyhow::{Context, Result};
use console::style;
use statement_client::ColumnSuggestions;

use crate::context::AppContext;

/// Fetch suggestions, treating a blank bank name as "no bank".
pub async fn fetch_suggestions(ctx: &AppContext, bank: Option<&str>) -> Result<ColumnSuggestions> {
    let bank = bank.map(str::trim).filter(|b| !b.is_empty());
    ctx.client
        .column_suggestions(bank)
        .await
        .context("Failed to fetch column suggestions")
}

/// `statements suggest [--bank NAME]`
pub async fn suggest(ctx: &AppContext, bank: Option<&str>) -> Result<()> {
    let suggestions = fetch_suggestions(ctx, bank).await?;

    match &suggestions {
        ColumnSuggestions::ForBank {
            bank,
            suggested_columns,
        } => {
            ctx.print_header(&format!("Suggested columns for {}", bank));
            for column in suggested_columns {
                println!("  {}", column);
            }
        }
        ColumnSuggestions::Catalogue {
            all_bank_suggestions,
            generic_columns,
        } => {
            ctx.print_header("Generic columns");
            for column in generic_columns {
                println!("  {}", column);
            }
            for (bank, columns) in all_bank_suggestions {
                ctx.print_header(bank);
                println!("  {}", style(columns.join(", ")).dim());
            }
        }
    }
    Ok(())
}
