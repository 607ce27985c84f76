//! `pw resolve` command implementation.

use std::path::PathBuf;

use clap::Args;
use pw_config::CliSettings;
use pw_router::{FailoverSlot, Layout, RenderInstruction};
use pw_sitemap::{BreadcrumbItem, Params};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;
use crate::router::{dispatcher, load_config, warn_unknown_keys};

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Navigated path, e.g. `/user/42`.
    path: String,

    /// Path to configuration file (default: auto-discover pageway.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Roles held by the current user, comma separated (overrides config).
    #[arg(long, value_delimiter = ',')]
    roles: Option<Vec<String>>,

    /// Print the render instruction as JSON.
    #[arg(long)]
    json: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load or the matched page
    /// has no component to render.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings { roles: self.roles };
        let config = load_config(self.config.as_deref(), Some(&cli_settings))?;
        warn_unknown_keys(&output, &config);

        let dispatcher = dispatcher(&config);
        let instruction = dispatcher.dispatch(&self.path)?;
        tracing::debug!(
            path = %self.path,
            matched = instruction.as_ref().is_some_and(|i| !i.is_not_found()),
            "Path dispatched"
        );

        if self.json {
            let view = instruction.as_ref().map(InstructionView::new);
            output.print(&serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        match instruction {
            Some(instruction) => {
                for line in describe(&instruction) {
                    output.print(&line);
                }
            }
            None => output.warning(&format!("No route for {}", self.path)),
        }

        Ok(())
    }
}

/// JSON view of a render instruction.
#[derive(Debug, Serialize)]
struct InstructionView<'a> {
    path: &'a str,
    page: Option<PageView<'a>>,
    params: &'a Params,
    component: &'a str,
    layout: &'a Layout<String>,
    roles_dont_match: bool,
    failover_for: Option<FailoverSlot>,
    breadcrumbs: Vec<BreadcrumbItem>,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    name: &'a str,
    url: &'a str,
    level: usize,
}

impl<'a> InstructionView<'a> {
    fn new(instruction: &'a RenderInstruction<String>) -> Self {
        let resolution = &instruction.resolution;
        let context = &instruction.context;
        Self {
            path: &context.path,
            page: context.page().map(|page| PageView {
                name: &page.name,
                url: &page.url,
                level: page.level,
            }),
            params: &context.params,
            component: &resolution.component,
            layout: &resolution.layout,
            roles_dont_match: resolution.roles_dont_match,
            failover_for: resolution.failover_for,
            breadcrumbs: context.breadcrumbs(),
        }
    }
}

/// Human readable description of a render instruction.
fn describe(instruction: &RenderInstruction<String>) -> Vec<String> {
    let resolution = &instruction.resolution;
    let context = &instruction.context;

    let mut lines = vec![format!("path:      {}", context.path)];
    match context.page() {
        Some(page) => lines.push(format!("page:      {} ({})", page.name, page.url)),
        None => lines.push("page:      (not found)".to_owned()),
    }
    lines.push(format!("component: {}", resolution.component));
    lines.push(format!(
        "layout:    {}",
        resolution
            .layout
            .component()
            .map_or("(passthrough)", String::as_str)
    ));
    if !context.params.is_empty() {
        let params: Vec<String> = context
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        lines.push(format!("params:    {}", params.join(", ")));
    }
    if resolution.roles_dont_match {
        lines.push("roles:     mismatch".to_owned());
    }
    if let Some(slot) = resolution.failover_for {
        lines.push(format!("failover:  {slot}"));
    }
    let breadcrumbs = context.breadcrumbs();
    if !breadcrumbs.is_empty() {
        let trail: Vec<&str> = breadcrumbs.iter().map(|item| item.name.as_str()).collect();
        lines.push(format!("trail:     {}", trail.join(" > ")));
    }
    lines
}
