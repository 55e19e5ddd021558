use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use phpgen_core::PhpVersion;
use phpgen_manifest::PhpgenToml;
use tracing::debug;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RenderCommand {
    /// Path to phpgen.toml (defaults to ./phpgen.toml)
    #[arg(short, long, default_value = "phpgen.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to project.source_dir next to the manifest)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target PHP version (overrides phpgen.toml setting)
    #[arg(short, long)]
    pub target: Option<PhpVersion>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl RenderCommand {
    /// Run the render command
    pub fn run(&self) -> Result<()> {
        let phpgen_toml = PhpgenToml::open(&self.config).unwrap_or_exit();
        let manifest = phpgen_toml.manifest();

        // Use CLI flag if provided, otherwise use manifest setting
        let target = self.target.unwrap_or(manifest.project.target);
        let project = manifest.lower(target).unwrap_or_exit();

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| phpgen_toml.base_dir().join(&project.source_dir));
        debug!(output = %output.display(), %target, dry_run = self.dry_run, "rendering");

        let report = ops::render(&project, &output, self.dry_run)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
