//! `quire build` command implementation.

use clap::Args;
use quire_site::{BuildReport, SiteBuilder};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the build fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load(None, None)?;

        output.info(&format!(
            "Building {} from {}",
            config.site.title,
            config.paths.src_dir.display()
        ));
        let report = SiteBuilder::new(&config).build()?;
        print_report(&output, &report);
        Ok(())
    }
}

/// Print build warnings and a one-line summary.
pub(super) fn print_report(output: &Output, report: &BuildReport) {
    for path in &report.shadowed {
        output.warning(&format!("Skipped {path}: another file already serves its route"));
    }
    for dead in &report.dead_links {
        output.warning(&format!("Dead link: {dead}"));
    }

    output.success(&format!(
        "Built {} pages into {} ({} chunks written, {} unchanged, {} removed)",
        report.registry.len(),
        report.out_dir.display(),
        report.chunks_written,
        report.chunks_unchanged,
        report.chunks_removed,
    ));
}
