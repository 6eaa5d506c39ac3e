use crate::config::PipelineConfig;
use anyhow::Context;
use rollup_io::{read_table_with, write_versioned, OutputFormat, VersionedOutput};
use rollup_sql::{Table, TransformResult};
use std::path::Path;

/// The tables a pipeline reads, by role.
#[derive(Clone, Debug, PartialEq)]
pub struct Sources {
    pub primary: Table,
    pub reference: Option<Table>,
}

pub fn extract(config: &PipelineConfig, raw_dir: &Path) -> anyhow::Result<Sources> {
    let primary_path = raw_dir.join(&config.inputs.primary);
    let primary = read_table_with(&primary_path, &config.inputs.csv)
        .with_context(|| format!("read primary input {}", primary_path.display()))?;

    let reference = match &config.inputs.reference {
        Some(path) => {
            let path = raw_dir.join(path);
            let table = read_table_with(&path, &config.inputs.csv)
                .with_context(|| format!("read reference input {}", path.display()))?;
            Some(table)
        }
        None => None,
    };

    Ok(Sources { primary, reference })
}

/// Run every step of `config` in order, starting from the primary input.
pub fn transform(config: &PipelineConfig, sources: &Sources) -> TransformResult<Table> {
    let reference = sources.reference.as_ref();
    let mut table = sources.primary.clone();
    for (idx, step) in config.steps.iter().enumerate() {
        table = step.apply(&table, reference)?;
        log::debug!(
            "[{}] step {} ({}): {} rows x {} columns",
            config.name,
            idx + 1,
            step.name(),
            table.row_count(),
            table.columns().len()
        );
    }
    Ok(table)
}

/// Extract, transform, then persist the result under `output_root`.
///
/// Nothing is written unless every step succeeds.
pub fn run(
    config: &PipelineConfig,
    raw_dir: &Path,
    output_root: &Path,
    format: OutputFormat,
) -> anyhow::Result<VersionedOutput> {
    let table = extract_and_transform(config, raw_dir)?;

    log::info!("[{}] load -> {}", config.name, output_root.display());
    let output = write_versioned(&table, output_root, format)
        .with_context(|| format!("write output under {}", output_root.display()))?;
    Ok(output)
}

/// Extract and transform without persisting anything.
pub fn extract_and_transform(config: &PipelineConfig, raw_dir: &Path) -> anyhow::Result<Table> {
    config
        .validate()
        .with_context(|| format!("invalid pipeline `{}`", config.name))?;

    log::info!("[{}] extract from {}", config.name, raw_dir.display());
    let sources = extract(config, raw_dir)?;

    log::info!(
        "[{}] transform ({} steps, {} input rows)",
        config.name,
        config.steps.len(),
        sources.primary.row_count()
    );
    let table = transform(config, &sources)
        .with_context(|| format!("transform pipeline `{}`", config.name))?;
    Ok(table)
}
