use std::path::Path;

/// Fixed selection policy for packing
#[derive(Debug, Clone)]
pub struct PackerConfig {
    /// File extensions (without the dot) that get packed
    pub extensions: Vec<String>,
    /// Any directory whose full path contains one of these is skipped
    pub excluded_dir_fragments: Vec<String>,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            extensions: defaults::extensions(),
            excluded_dir_fragments: defaults::excluded_dir_fragments(),
        }
    }
}

impl PackerConfig {
    /// Whether a file should be included in the archive
    pub fn include_file(&self, path: &Path) -> bool {
        match file_extension(path) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed == ext),
            None => false,
        }
    }

    /// Whether a directory (and everything below it) should be skipped.
    ///
    /// Matches on the whole path string, not on path segments, so `robin/`
    /// and `binary/` are skipped as well as `bin/`.
    pub fn exclude_dir(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.excluded_dir_fragments
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }
}

/// Text after the last dot of the file name.
///
/// Unlike `Path::extension`, a leading dot counts, so `.editorconfig`
/// yields `editorconfig`.
fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    let ext = &name[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

mod defaults {
    pub(crate) fn extensions() -> Vec<String> {
        [
            "cs",
            "csproj",
            "sln",
            "editorconfig",
            "xaml",
            "vsct",
            "vsixmanifest",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub(crate) fn excluded_dir_fragments() -> Vec<String> {
        vec!["bin".to_string(), "obj".to_string()]
    }
}
