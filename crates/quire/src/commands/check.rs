//! `quire check` command implementation.
//!
//! Builds the site into a scratch directory, then navigates to every page
//! through the same loader the preview server uses.

use std::sync::Arc;

use clap::Args;
use quire_loader::{ChunkLoader, FsFetcher, NavigationOutcome, Navigator};
use quire_site::SiteBuilder;

use super::SiteArgs;
use super::build::print_report;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or any page fails to load.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load(None, None)?;

        let scratch = tempfile::tempdir()?;
        let report = SiteBuilder::new(&config)
            .with_out_dir(scratch.path().to_path_buf())
            .build()?;
        print_report(&output, &report);

        let registry = Arc::new(report.registry);
        let fetcher = FsFetcher::new(scratch.path().join("assets"));
        let navigator = Navigator::new(Arc::clone(&registry), Arc::new(ChunkLoader::new(fetcher)));

        let mut failures = 0usize;
        for entry in registry.entries() {
            match navigator.navigate(entry.route.as_str()).await {
                NavigationOutcome::Rendered(page) => {
                    tracing::debug!(route = %page.route, chunk = %page.chunk, "Page rendered");
                }
                NavigationOutcome::NotFound(route) => {
                    failures += 1;
                    output.error(&format!("{route}: not found in registry"));
                }
                NavigationOutcome::Failed { route, error } => {
                    failures += 1;
                    output.error(&format!("{route}: {error}"));
                }
                NavigationOutcome::Superseded => {}
            }
        }

        if failures > 0 {
            return Err(CliError::Validation(format!(
                "{failures} of {} pages failed to load",
                registry.len()
            )));
        }
        output.success(&format!("All {} pages load", registry.len()));
        Ok(())
    }
}
