use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use phpgen_core::PhpVersion;
use phpgen_manifest::PhpgenToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to phpgen.toml (defaults to ./phpgen.toml)
    #[arg(short, long, default_value = "phpgen.toml")]
    pub config: PathBuf,

    /// Check against this PHP version instead of the manifest's
    #[arg(short, long)]
    pub target: Option<PhpVersion>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let phpgen_toml = PhpgenToml::open(&self.config).unwrap_or_exit();
        let manifest = phpgen_toml.manifest();

        let target = self.target.unwrap_or(manifest.project.target);
        let project = manifest.lower(target).unwrap_or_exit();

        let report = ops::check(manifest, &project, &self.config)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
