//! `tern locate`: translate a line and column to a position and back.

use std::path::Path;

use tern_cache::{CancellationToken, ParseCache, ParseDepth};
use tern_config::TernConfig;
use tern_source::{Pos, ResolvedPos};

use crate::pipeline::load_files;
use crate::{GlobalArgs, LocateArgs};

/// Where a (line, column) lands.
#[derive(Debug, PartialEq, Eq)]
pub struct Location {
    /// The position in the batch position space.
    pub pos: Pos,
    /// The position resolved back to file coordinates.
    pub resolved: ResolvedPos,
    /// Kind and name of the enclosing top-level declaration.
    pub enclosing: Option<(&'static str, String)>,
}

/// Resolves `path` and maps (line, col) through the batch position space.
pub fn locate(
    cache: &ParseCache,
    path: &Path,
    line: u32,
    col: u32,
) -> Result<Location, Box<dyn std::error::Error>> {
    let handles = load_files(&[path.to_path_buf()])?;
    let (files, space) = cache.resolve(&CancellationToken::new(), ParseDepth::Full, &handles)?;
    let file = files.first().ok_or("no file resolved")?;

    let pos = space
        .pos_at(file.path(), line, col)
        .ok_or_else(|| format!("{}:{line}:{col} is outside the file", path.display()))?;
    let resolved = space
        .resolve(pos)
        .ok_or_else(|| format!("position {pos} does not resolve"))?;
    let enclosing = file.tree().decl_at(pos).map(|decl| {
        let name = decl
            .name()
            .map(|n| cache.interner().resolve(n.ident).to_string())
            .unwrap_or_default();
        (decl.kind_name(), name)
    });

    Ok(Location {
        pos,
        resolved,
        enclosing,
    })
}

/// Runs the `tern locate` command.
pub fn run(
    args: &LocateArgs,
    global: &GlobalArgs,
    config: &TernConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let cache = ParseCache::new(config.parse_cache);
    let location = locate(&cache, &args.file, args.line, args.col)?;

    if global.quiet {
        println!("{}", location.pos);
        return Ok(0);
    }
    println!("{} -> position {}", location.resolved, location.pos);
    match location.enclosing {
        Some((kind, name)) => println!("  in {kind} {name}"),
        None => println!("  outside any declaration"),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(text: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.tn");
        std::fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn finds_enclosing_function() {
        let (_dir, path) = write("package calc\n\nfunc Add(a int, b int) int {\n\treturn a + b\n}\n");
        let cache = ParseCache::default();
        let location = locate(&cache, &path, 4, 9).unwrap();

        assert_eq!((location.resolved.line, location.resolved.col), (4, 9));
        assert_eq!(location.resolved.file_path, path);
        assert_eq!(location.enclosing, Some(("func", "Add".to_string())));
    }

    #[test]
    fn between_declarations() {
        let (_dir, path) = write("package calc\n\nvar x = 1\n");
        let cache = ParseCache::default();
        let location = locate(&cache, &path, 2, 1).unwrap();
        assert!(location.enclosing.is_none());
    }

    #[test]
    fn repeated_lookups_reuse_the_parse() {
        let (_dir, path) = write("package calc\nvar x = 1\n");
        let cache = ParseCache::default();
        let first = locate(&cache, &path, 2, 5).unwrap();
        let second = locate(&cache, &path, 2, 5).unwrap();
        assert_eq!(first.pos, second.pos);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn out_of_range_coordinates() {
        let (_dir, path) = write("package calc\n");
        let cache = ParseCache::default();
        assert!(locate(&cache, &path, 40, 1).is_err());
    }
}
