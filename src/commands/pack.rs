//! Handle pack command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PackerConfig;
use crate::error::Error;
use crate::record::{self, FileRecord};
use crate::walker::{Cancellation, Walker};

/// Pack every selected file under `source_dir` into a JSON archive at `output_file`
pub fn handle(
    source_dir: &Path,
    output_file: &Path,
    config: &PackerConfig,
    cancellation: &Cancellation,
) -> Result<()> {
    let records = collect(source_dir, config, cancellation)?;

    cancellation.check()?;
    let json = record::to_json(&records)?;
    fs::write(output_file, json)
        .with_context(|| format!("Failed to write archive {:?}", output_file))?;

    tracing::info!("Packed {} file(s) into {:?}", records.len(), output_file);
    Ok(())
}

/// Walk `source_dir` and read each selected file, in walk order
pub fn collect(
    source_dir: &Path,
    config: &PackerConfig,
    cancellation: &Cancellation,
) -> Result<Vec<FileRecord>> {
    let walker = Walker::new(
        source_dir,
        |path: &Path| config.include_file(path),
        |path: &Path| config.exclude_dir(path),
        cancellation.clone(),
    )?;

    let mut records = Vec::new();
    for file_path in walker {
        let file_path = file_path?;

        cancellation.check()?;
        let content = fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read {:?}", file_path))?;

        let relative = file_path.strip_prefix(source_dir).unwrap_or(&file_path);
        let relative = relative
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(file_path.clone()))?;

        tracing::debug!("Packing {}", relative);
        records.push(FileRecord::new(relative, content));
    }

    Ok(records)
}
