use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Entry points calibre writes when converting to an HTML directory, in lookup order
pub const HTML_ENTRY_POINTS: [&str; 2] = ["index.html", "index1.html"];

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

    // @generates: Output path for an annotated book, next to the source
    // @params: source_file, suffix, extension
    pub fn generate_output_path<P: AsRef<Path>>(
        source_file: P,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let source_file = source_file.as_ref();

        // Get the file stem (filename without extension)
        let stem = source_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension);

        match source_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Locate the HTML entry point calibre produced inside `html_dir`
    pub fn find_html_entry_point<P: AsRef<Path>>(html_dir: P) -> Option<PathBuf> {
        HTML_ENTRY_POINTS
            .iter()
            .map(|name| html_dir.as_ref().join(name))
            .find(|candidate| Self::file_exists(candidate))
    }

    /// Find a cover image in `html_dir`.
    ///
    /// Names are tried in order at the top level first; if none is there, the
    /// first match one directory further down is used.
    pub fn find_cover<P: AsRef<Path>>(html_dir: P, cover_names: &[String]) -> Option<PathBuf> {
        let html_dir = html_dir.as_ref();

        if let Some(top_level) = cover_names
            .iter()
            .map(|name| html_dir.join(name))
            .find(|candidate| Self::file_exists(candidate))
        {
            return Some(top_level);
        }

        WalkDir::new(html_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| {
                let name = entry.file_name().to_string_lossy().to_lowercase();
                cover_names.iter().any(|cover| cover.eq_ignore_ascii_case(&name))
            })
            .map(|entry| entry.into_path())
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

    /// Remove a file or directory tree if it exists
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if Self::dir_exists(path) {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove directory: {:?}", path))?;
        } else if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {:?}", path))?;
        }
        Ok(())
    }
}
