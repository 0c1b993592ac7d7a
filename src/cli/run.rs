use crate::cli::RunArgs;
use anyhow::Context;
use plan_quorum::config::Config;
use plan_quorum::request::{ChangeSpec, SchemaContext};
use plan_quorum::Orchestrator;
use tracing::info;

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(dir) = args.audit_dir {
        config.audit.dir = dir;
    }
    if let Some(timeout) = args.timeout_sec {
        config.provider_timeout_sec = timeout;
    }

    let spec = match (args.spec, args.spec_file) {
        (Some(text), _) => ChangeSpec::new(text),
        (None, Some(path)) => ChangeSpec::new(
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read spec file {:?}", path))?,
        ),
        (None, None) => anyhow::bail!("Either --spec or --spec-file is required"),
    };

    let schema = match args.schema_context {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read schema context {:?}", path))?;
            SchemaContext::new(
                serde_json::from_str(&content)
                    .with_context(|| format!("Schema context {:?} is not valid JSON", path))?,
            )
        }
        None => SchemaContext::default(),
    };

    let orchestrator = Orchestrator::from_config(&config)?;
    let result = orchestrator.orchestrate(spec, schema).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}
