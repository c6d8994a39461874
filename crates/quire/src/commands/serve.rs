//! `quire serve` command implementation.

use clap::Args;
use quire_server::run_server;
use quire_site::SiteBuilder;

use super::SiteArgs;
use super::build::print_report;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve the existing build output without rebuilding.
    #[arg(long)]
    no_build: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the build fails or the server
    /// fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let no_build = self.no_build;
        let config = self.site.load(self.host, self.port)?;

        if no_build {
            output.info(&format!(
                "Using existing build in {}",
                config.paths.out_dir.display()
            ));
        } else {
            let report = SiteBuilder::new(&config).build()?;
            print_report(&output, &report);
        }

        output.separator();
        output.highlight(&format!(
            "Serving {} at http://{}:{}{}",
            config.site.title,
            config.server.host,
            config.server.port,
            config.site.base_route(),
        ));
        output.separator();

        run_server(config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
