//! `tradedesk init` - write the sample order dataset

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::data_path;
use crate::cli::GlobalOpts;
use crate::core::dataset;
use crate::core::Config;
use crate::yaml::DocumentFormat;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing dataset
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let path = data_path(global, config);

    if path.exists() && !args.force {
        return Err(miette::miette!(
            help = "Pass --force to overwrite it",
            "Dataset already exists: {}",
            path.display()
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }

    let count = match DocumentFormat::from_path(&path) {
        DocumentFormat::Yaml => {
            let content = dataset::sample_yaml()?;
            std::fs::write(&path, &content).into_diagnostic()?;
            dataset::sample_records()?.len()
        }
        DocumentFormat::Json => {
            let records = dataset::sample_records()?;
            dataset::save_records(&path, &records)?;
            records.len()
        }
    };

    if !global.quiet {
        println!(
            "{} Wrote {} sample orders to {}",
            style("✓").green(),
            count,
            style(path.display()).cyan()
        );
    }
    Ok(())
}
