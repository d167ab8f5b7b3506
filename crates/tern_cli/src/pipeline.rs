//! Shared helpers for CLI commands: configuration lookup, loading files
//! from disk and rendering diagnostics.

use std::path::PathBuf;

use tern_cache::{DiskFile, ParsedFile};
use tern_config::TernConfig;
use tern_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use tern_source::PositionSpace;

use crate::GlobalArgs;

/// Loads the configuration named by `--config`, or `tern.toml` in the
/// current directory, or the defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<TernConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) if path.is_dir() => tern_config::load_config(path)?,
        Some(path) => tern_config::load_config_file(path)?,
        None => tern_config::load_config(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Snapshots every file from disk. Fails on the first unreadable file.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<DiskFile>, Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = DiskFile::load(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

/// Renders a file's diagnostics against the batch position space.
pub fn render_diagnostics(file: &ParsedFile, space: &PositionSpace, color: bool) -> Vec<String> {
    let renderer = TerminalRenderer::new(color);
    file.diagnostics()
        .iter()
        .map(|diag| renderer.render(diag, space))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_cache::{CancellationToken, ParseCache, ParseDepth};

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config,
        }
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[parse_cache]\ncapacity = 7\n").unwrap();
        let config = load_settings(&global(Some(path))).unwrap();
        assert_eq!(config.parse_cache.capacity, 7);
    }

    #[test]
    fn config_directory_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_settings(&global(Some(dir.path().to_path_buf()))).unwrap();
        assert_eq!(config, TernConfig::default());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tern.toml");
        std::fs::write(&path, "[parse_cache]\ncapacity = 0\n").unwrap();
        assert!(load_settings(&global(Some(path))).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_files(&[PathBuf::from("/nonexistent/x.tn")]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/x.tn"));
    }

    #[test]
    fn diagnostics_render_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tn");
        std::fs::write(&path, "package p\nvar = 1\n").unwrap();
        let files = load_files(&[path]).unwrap();

        let cache = ParseCache::default();
        let (parsed, space) = cache
            .resolve(&CancellationToken::new(), ParseDepth::Full, &files)
            .unwrap();
        let rendered = render_diagnostics(&parsed[0], &space, false);
        assert!(!rendered.is_empty());
        assert!(rendered[0].contains("bad.tn:2:"));
    }
}
