//! `pw nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use pw_sitemap::{NavItem, PageTable};

use crate::error::CliError;
use crate::output::Output;
use crate::router::load_config;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover pageway.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the menu as JSON.
    #[arg(long)]
    json: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), None)?;
        let navigation = PageTable::new(&config.pages).navigation();

        if self.json {
            output.print(&serde_json::to_string_pretty(&navigation)?);
            return Ok(());
        }

        if navigation.is_empty() {
            output.note("Navigation menu is empty");
            return Ok(());
        }
        let mut lines = Vec::new();
        render_menu(&navigation, &mut lines);
        for line in lines {
            output.print(&line);
        }

        Ok(())
    }
}

fn render_menu(items: &[NavItem], lines: &mut Vec<String>) {
    for item in items {
        let indent = "  ".repeat(item.level.saturating_sub(1));
        match &item.subtitle {
            Some(subtitle) => {
                lines.push(format!("{indent}- {} ({}): {subtitle}", item.name, item.url));
            }
            None => lines.push(format!("{indent}- {} ({})", item.name, item.url)),
        }
        render_menu(&item.children, lines);
    }
}
