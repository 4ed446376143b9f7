//! Service health check

use anyhow::{anyhow, Context, Result};
use console::style;

use crate::context::AppContext;

/// `statements health`
pub async fn check_health(ctx: &AppContext) -> Result<()> {
    ctx.print_header(&format!("Extraction service at {}", ctx.client.base_url()));

    let health = ctx
        .client
        .health()
        .await
        .context("Failed to reach the extraction service")?;

    if health.is_healthy() {
        println!("{:<10} {}", health.service, style("OK").green());
        Ok(())
    } else {
        println!("{:<10} {}", health.service, style(&health.status).yellow());
        Err(anyhow!("Service reported status '{}'", health.status))
    }
}
