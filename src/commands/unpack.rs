//! Handle unpack command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::record;
use crate::walker::Cancellation;

/// Restore every record of the archive at `archive_file` under `output_dir`.
///
/// Records are written in archive order; a later record with the same path
/// overwrites an earlier one. Files already written stay on disk if a later
/// record fails.
pub fn handle(archive_file: &Path, output_dir: &Path, cancellation: &Cancellation) -> Result<()> {
    cancellation.check()?;
    let content = fs::read_to_string(archive_file)
        .with_context(|| format!("Failed to read archive {:?}", archive_file))?;
    let records = record::from_json(&content)?;

    for file in &records {
        cancellation.check()?;
        let file_path = file.resolve(output_dir)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&file_path, &file.content)
            .with_context(|| format!("Failed to write {:?}", file_path))?;
        tracing::debug!("Unpacked {}", file.path);
    }

    tracing::info!("Unpacked {} file(s) into {:?}", records.len(), output_dir);
    Ok(())
}
