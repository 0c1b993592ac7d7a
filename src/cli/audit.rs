use crate::cli::{AuditListArgs, AuditShowArgs};
use plan_quorum::audit::{AuditStore, FileAuditStore};
use plan_quorum::config::Config;
use std::path::{Path, PathBuf};

fn open_store(config: &Path, audit_dir: Option<PathBuf>) -> anyhow::Result<FileAuditStore> {
    let dir = match audit_dir {
        Some(dir) => dir,
        None => Config::load_or_default(config)?.audit.dir,
    };
    Ok(FileAuditStore::new(dir))
}

pub async fn show(config: &Path, args: AuditShowArgs) -> anyhow::Result<()> {
    let store = open_store(config, args.audit_dir)?;
    let record = store.get(&args.run_id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub async fn list(config: &Path, args: AuditListArgs) -> anyhow::Result<()> {
    let store = open_store(config, args.audit_dir)?;
    let run_ids = store.list().await?;

    if run_ids.is_empty() {
        eprintln!("No audit records in {:?}", store.dir());
        return Ok(());
    }

    for run_id in run_ids {
        println!("{}", run_id);
    }
    Ok(())
}
