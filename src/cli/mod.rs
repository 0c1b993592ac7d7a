pub mod audit;
pub mod init;
pub mod run;
pub mod schema;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plan-quorum")]
#[command(
    author,
    version,
    about = "Quorum-gated change planning across OpenAI, Vertex AI and Anthropic"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a plan from all three providers and gate it on quorum
    Run(RunArgs),

    /// Inspect stored audit records
    Audit(AuditArgs),

    /// Write a default config file
    Init(InitArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "plan-quorum.yaml")]
    pub config: PathBuf,

    /// Change request text
    #[arg(long, conflicts_with = "spec_file", required_unless_present = "spec_file")]
    pub spec: Option<String>,

    /// Read the change request from a file
    #[arg(long)]
    pub spec_file: Option<PathBuf>,

    /// JSON file describing the target data model
    #[arg(long)]
    pub schema_context: Option<PathBuf>,

    /// Override audit directory
    #[arg(long)]
    pub audit_dir: Option<PathBuf>,

    /// Override per-provider timeout in seconds
    #[arg(long)]
    pub timeout_sec: Option<u64>,
}

#[derive(Parser, Clone)]
pub struct AuditArgs {
    /// Config file (for the audit directory)
    #[arg(short, long, default_value = "plan-quorum.yaml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: AuditCommand,
}

#[derive(Subcommand, Clone)]
pub enum AuditCommand {
    /// Print one audit record as JSON
    Show(AuditShowArgs),

    /// List stored run ids
    List(AuditListArgs),
}

#[derive(Args, Clone)]
pub struct AuditShowArgs {
    /// Run id (the `auditId` of a result)
    pub run_id: String,

    /// Override audit directory
    #[arg(long)]
    pub audit_dir: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct AuditListArgs {
    /// Override audit directory
    #[arg(long)]
    pub audit_dir: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    /// Where to write the config
    #[arg(short, long, default_value = "plan-quorum.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
