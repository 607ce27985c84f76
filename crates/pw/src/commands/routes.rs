//! `pw routes` command implementation.

use std::path::PathBuf;

use clap::Args;
use pw_sitemap::{ComponentRef, FlatPage, PageTable};

use crate::error::CliError;
use crate::output::Output;
use crate::router::{load_config, warn_unknown_keys};

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Path to configuration file (default: auto-discover pageway.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), None)?;
        warn_unknown_keys(&output, &config);

        let table = PageTable::new(&config.pages);
        if table.is_empty() {
            output.warning("No pages configured");
            return Ok(());
        }

        for page in table.pages() {
            output.print(&format_route(page));
        }
        output.success(&format!("{} routes", table.len()));

        Ok(())
    }
}

/// Component reference as shown to the user.
pub(crate) fn component_label(reference: Option<&ComponentRef<String>>) -> &str {
    match reference {
        Some(ComponentRef::Key(key) | ComponentRef::Direct(key)) => key,
        None => "-",
    }
}

/// One line of the routing table, indented by level.
fn format_route(page: &FlatPage<String>) -> String {
    let mut line = format!(
        "{}{}",
        "  ".repeat(page.level.saturating_sub(1)),
        if page.url.is_empty() { "(no url)" } else { page.url.as_str() }
    );
    if let Some(mask) = page.mask() {
        line.push_str(&format!(" [{mask}]"));
    }
    line.push_str(&format!(
        " -> {} ({})",
        component_label(page.component.as_ref()),
        page.name
    ));
    if page.requires_roles() {
        line.push_str(&format!(" roles: {}", page.roles.join(", ")));
    }
    if !page.visible {
        line.push_str(" (hidden)");
    }
    line
}
