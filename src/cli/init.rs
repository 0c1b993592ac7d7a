use crate::cli::InitArgs;
use plan_quorum::config::Config;

pub fn execute(args: InitArgs) -> anyhow::Result<()> {
    if args.config.exists() && !args.force {
        anyhow::bail!(
            "{:?} already exists; pass --force to overwrite",
            args.config
        );
    }

    let yaml = serde_yaml::to_string(&Config::default())?;
    std::fs::write(&args.config, yaml)?;

    println!("Wrote default config to {:?}", args.config);
    Ok(())
}
