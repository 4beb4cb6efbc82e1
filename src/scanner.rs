use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Scanner for directories of definition files.
///
/// The `FileScanner` recursively walks a directory to find every JSON definition
/// document. Hidden directories (those starting with `.`) are skipped.
///
/// # Example
///
/// ```no_run
/// use rpc_api_docs::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./protos"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} definition files", result.definition_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Paths to all discovered `.json` files, sorted
    pub definition_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.json` files.
    ///
    /// Files are returned in sorted path order so that merging definitions from
    /// several files is reproducible. Inaccessible entries are logged and
    /// recorded as warnings; scanning continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut definition_files = Vec::new();
        let mut warnings = Vec::new();

        if !self.root_path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root_path.display());
        }

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                !e.file_name().to_string_lossy().starts_with('.')
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
                    {
                        definition_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        definition_files.sort();

        Ok(ScanResult {
            definition_files,
            warnings,
        })
    }
}
