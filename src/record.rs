use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One packed file: its path relative to the packed root and its text
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        FileRecord {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Join the record path onto `root`.
    ///
    /// Rejects empty, absolute, and `..`-containing paths so that a record
    /// can never land outside `root`.
    pub fn resolve(&self, root: &Path) -> Result<PathBuf, Error> {
        let relative = Path::new(&self.path);
        if self.path.is_empty() {
            return Err(Error::UnsafePath(self.path.clone()));
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::UnsafePath(self.path.clone()));
                }
            }
        }

        Ok(root.join(relative))
    }
}

/// Serialize records as an indented JSON array, in the given order
pub fn to_json(records: &[FileRecord]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse an archive document into its records
pub fn from_json(content: &str) -> Result<Vec<FileRecord>, Error> {
    // `null` parses as None
    let records: Option<Vec<FileRecord>> = serde_json::from_str(content)?;
    records.ok_or_else(|| {
        Error::InvalidArchive(serde::de::Error::custom("archive is null"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_pretty_output() {
        let records = vec![FileRecord::new("Program.cs", "class P {}\n")];
        let json = to_json(&records).unwrap();

        assert!(json.starts_with("[\n  {\n"));
        assert!(json.contains("\"path\": \"Program.cs\""));
        assert!(json.contains("\"content\": \"class P {}\\n\""));
        assert!(json.find("\"path\"").unwrap() < json.find("\"content\"").unwrap());
    }

    #[test]
    fn test_parse_preserves_order_and_field_order() {
        let json = r#"[
            { "content": "b", "path": "B.cs" },
            { "path": "A.cs", "content": "a" }
        ]"#;
        let records = from_json(json).unwrap();
        assert_eq!(
            records,
            vec![FileRecord::new("B.cs", "b"), FileRecord::new("A.cs", "a")]
        );
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_reject_malformed_archives() {
        for input in [
            "",
            "   ",
            "null",
            "\"not an array\"",
            "{}",
            "[{\"path\": \"a.cs\"}]",
            "[{\"path\": \"a.cs\", \"content\": 3}]",
            "[{\"path\": \"a.cs\", \"content\": \"x\", \"extra\": 1}]",
        ] {
            let err = from_json(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArchive(_)),
                "expected invalid archive for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_resolve_nested_path() {
        let root = Path::new("/out");
        let record = FileRecord::new("a/b/c/File.txt", "");
        assert_eq!(record.resolve(root).unwrap(), PathBuf::from("/out/a/b/c/File.txt"));

        let record = FileRecord::new("./Program.cs", "");
        assert!(record.resolve(root).is_ok());
    }

    #[test]
    fn test_resolve_rejects_escaping_paths() {
        let root = Path::new("/out");
        for path in ["", "../evil.cs", "a/../../evil.cs", "/etc/passwd"] {
            let err = FileRecord::new(path, "").resolve(root).unwrap_err();
            assert!(matches!(err, Error::UnsafePath(_)), "accepted {:?}", path);
        }
    }
}
