//! CLI for the urlicon link annotator.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use urlicon_core::annotate::Mode;
use urlicon_core::config::{self, UrlIconConfig};

use commands::{run_annotate, run_config, run_key, run_resolve};

/// Top-level CLI for urlicon.
#[derive(Debug, Parser)]
#[command(name = "urlicon")]
#[command(about = "urlicon: add favicons to external links in HTML", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/urlicon/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Annotation mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Append each site's favicon.
    Favicon,
    /// Append the generic external-link icon.
    Icon,
    /// Only add CSS classes.
    Class,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Favicon => Mode::Favicon,
            ModeArg::Icon => Mode::GenericIcon,
            ModeArg::Class => Mode::ClassOnly,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Annotate external links in an HTML file (or stdin) and print the result.
    Annotate {
        /// Input file; `-` or omitted reads stdin.
        path: Option<PathBuf>,
        /// Override the configured mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Resolve and cache the favicon for one URL.
    Resolve {
        /// Page URL whose host's favicon to resolve.
        url: String,
    },

    /// Show the cache key and icon path for a host.
    Key {
        /// Host name, e.g. www.example.com.
        host: String,
    },

    /// Show the effective configuration.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<UrlIconConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Annotate { path, mode } => {
                run_annotate(&cfg, path.as_deref(), mode.map(Mode::from)).await?
            }
            CliCommand::Resolve { url } => run_resolve(&cfg, &url).await?,
            CliCommand::Key { host } => run_key(&cfg, &host)?,
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
