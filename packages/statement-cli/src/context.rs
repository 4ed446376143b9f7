//! Application context with shared state and utilities

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use statement_client::StatementClient;
use statement_session::{ExtractionGateway, Session, TempDirPreviews};
use std::sync::Arc;

use crate::config::Config;
use crate::render::format_error;

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: Config,
    pub client: StatementClient,
}

impl AppContext {
    pub fn new(config: Config, quiet: bool) -> Result<Self> {
        let client = StatementClient::new(config.client_config())
            .context("Failed to build the extraction API client")?;
        Ok(Self {
            quiet,
            config,
            client,
        })
    }

    /// A fresh session whose previews live in the configured directory
    pub fn new_session(&self) -> Session {
        Session::new(Arc::new(TempDirPreviews::new(&self.config.preview_dir)))
    }

    /// The client as a shareable gateway, for spawned extraction tasks
    pub fn gateway(&self) -> Arc<dyn ExtractionGateway> {
        Arc::new(self.client.clone())
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    /// Failures go to stderr, quiet or not
    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", format_error(msg));
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}
