//! `quire routes` command implementation.

use clap::Args;
use quire_nav::flatten;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// List the nav bar instead of the sidebar.
    #[arg(long)]
    nav: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let nav = self.nav;
        let config = self.site.load(None, None)?;

        let (name, tree) = if nav {
            ("nav", &config.nav)
        } else {
            ("sidebar", &config.sidebar)
        };
        let flat = flatten(tree);
        if flat.is_empty() {
            output.warning(&format!("No routes in {name}"));
            return Ok(());
        }

        output.highlight(&format!("{} routes in {name}", flat.len()));
        for route in &flat {
            let indent = "  ".repeat(route.depth);
            output.listing(&format!("{indent}{}", route.route), Some(&route.label));
        }
        Ok(())
    }
}
