use anyhow::{Context, Result};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Path of an entry file inside a corpus directory
    // @params: dir, entry_id, extension
    pub fn entry_path<P: AsRef<Path>>(dir: P, entry_id: &str, extension: &str) -> PathBuf {
        let mut name = entry_id.to_string();
        name.push('.');
        name.push_str(extension.trim_start_matches('.'));
        dir.as_ref().join(name)
    }

    /// List entry identifiers (file stems) with the given extension, sorted
    pub fn list_entry_ids<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
        let wanted = extension.trim_start_matches('.');
        let mut ids = Vec::new();

        let read = fs::read_dir(dir.as_ref())
            .with_context(|| format!("Failed to read directory: {:?}", dir.as_ref()))?;
        for entry in read {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext_matches = path
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(wanted))
                .unwrap_or(false);
            if ext_matches {
                if let Some(stem) = path.file_stem() {
                    ids.push(stem.to_string_lossy().to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Find files with a specific extension in a directory tree
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(&normalized_ext[1..]) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append a line to a file, creating it if needed
    pub fn append_line<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open file for append: {:?}", path.as_ref()))?;

        writeln!(file, "{}", content)
            .with_context(|| format!("Failed to append to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Last modification time of a file
    pub fn modified_time<P: AsRef<Path>>(path: P) -> Result<SystemTime> {
        let meta = fs::metadata(&path)
            .with_context(|| format!("Failed to stat file: {:?}", path.as_ref()))?;
        meta.modified()
            .with_context(|| format!("No modification time for: {:?}", path.as_ref()))
    }
}
