use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfilePreset {
    /// Original rule set: independent size/branch findings, no
    /// justification mechanism
    Baseline,
    /// Self-auditing rule set: composite score, blocking ceilings,
    /// justification-aware (default)
    Strict,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => crate::io::OutputFormat::Yaml,
            OutputFormat::Json => crate::io::OutputFormat::Json,
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "archmap")]
#[command(about = "Architecture and cohesion audit engine for layered Python codebases", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a source tree and emit the finding report
    Analyze {
        /// Root of the tree to audit
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Profile TOML file; overrides --profile entirely
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Built-in profile preset
        #[arg(long, value_enum, default_value = "strict")]
        profile: ProfilePreset,
    },
    /// Write a commented archmap.toml with the default profile
    Init {
        /// Overwrite an existing archmap.toml
        #[arg(long)]
        force: bool,
    },
}
