use std::path::PathBuf;

use answer_normalizer::DEFAULT_SEARCH_BASE_URL;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "answer-normalizer",
    version,
    about = "Structural normalization of assistant markdown answers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Normalize(NormalizeArgs),
    Inspect(InspectArgs),
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Markdown answer to read; stdin when absent or `-`.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Destination for the normalized text; stdout when absent or `-`.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_SEARCH_BASE_URL)]
    pub search_base_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the JSON report; stdout when absent.
    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_SEARCH_BASE_URL)]
    pub search_base_url: String,
}
