use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "elicit",
    version,
    about = "Run a confidence-gated discovery interview or quiz in the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Three-anchor voice interview
    Interview(InterviewArgs),
    /// Gap-driven quiz over the eight confidence categories
    Quiz(QuizArgs),
    /// Load and validate a configuration file
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the final state as JSON on stdout; prompts go to stderr
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InterviewArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug, Clone)]
pub struct QuizArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,

    #[arg(long)]
    pub employees: Option<u32>,

    /// Known technology; repeat for several
    #[arg(long = "tech")]
    pub technologies: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[arg(long)]
    pub config: PathBuf,

    /// Also send one tiny request to the configured model
    #[arg(long, default_value_t = false)]
    pub ping: bool,
}
