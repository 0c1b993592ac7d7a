use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::{AuditCommand, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Only show debug logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("plan_quorum=debug")
    } else {
        EnvFilter::new("plan_quorum=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Audit(args) => match args.command {
            AuditCommand::Show(show) => cli::audit::show(&args.config, show).await,
            AuditCommand::List(list) => cli::audit::list(&args.config, list).await,
        },
        Commands::Init(args) => cli::init::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
