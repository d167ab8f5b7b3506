//! `tern parse`: resolve files in one batch and report on each.

use serde::Serialize;
use tracing::debug;

use tern_cache::{CancellationToken, ParseCache, ParseDepth, ParsedFile};
use tern_config::TernConfig;
use tern_diagnostics::Severity;
use tern_source::PositionSpace;

use crate::pipeline::{load_files, render_diagnostics};
use crate::{GlobalArgs, ParseArgs, ReportFormat};

/// One top-level declaration.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DeclReport {
    /// `const`, `var`, `type`, `func` or `method`.
    pub kind: &'static str,
    /// Declared name.
    pub name: String,
    /// Line of the declaration's first token.
    pub line: u32,
    /// Column of the declaration's first token.
    pub col: u32,
}

/// One diagnostic, resolved to source coordinates.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code, e.g. `E101`.
    pub code: String,
    /// Main message.
    pub message: String,
    /// `path:line:col` of the primary span, if it resolves.
    pub location: Option<String>,
}

/// What `tern parse` reports for one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The file's location.
    pub path: String,
    /// Depth it was parsed at.
    pub depth: ParseDepth,
    /// First position of the file's slice.
    pub base: u64,
    /// Length of the file's slice.
    pub extent: u64,
    /// Named top-level declarations in source order.
    pub declarations: Vec<DeclReport>,
    /// Lexer and parser diagnostics.
    pub diagnostics: Vec<DiagnosticReport>,
}

/// Builds the report for one parsed file.
pub fn report(cache: &ParseCache, file: &ParsedFile, space: &PositionSpace) -> FileReport {
    let tree = file.tree();
    let declarations = tree
        .decls
        .iter()
        .filter_map(|decl| {
            let name = decl.name()?;
            let start = file.resolve(decl.span().start)?;
            Some(DeclReport {
                kind: decl.kind_name(),
                name: cache.interner().resolve(name.ident).to_string(),
                line: start.line,
                col: start.col,
            })
        })
        .collect();
    let diagnostics = file
        .diagnostics()
        .iter()
        .map(|diag| DiagnosticReport {
            severity: diag.severity,
            code: diag.code.to_string(),
            message: diag.message.clone(),
            location: space.resolve(diag.primary_span.start).map(|p| p.to_string()),
        })
        .collect();

    FileReport {
        path: file.path().display().to_string(),
        depth: file.depth(),
        base: file.base().as_raw(),
        extent: file.extent(),
        declarations,
        diagnostics,
    }
}

/// Runs the `tern parse` command.
///
/// Returns exit code 1 if any file has syntax errors, 0 otherwise.
pub fn run(
    args: &ParseArgs,
    global: &GlobalArgs,
    config: &TernConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let depth = if args.header {
        ParseDepth::Header
    } else {
        ParseDepth::Full
    };
    let handles = load_files(&args.files)?;
    let cache = ParseCache::new(config.parse_cache);
    let (files, space) = cache.resolve(&CancellationToken::new(), depth, &handles)?;
    debug!(files = files.len(), %depth, "parsed batch");

    let reports: Vec<FileReport> = files.iter().map(|f| report(&cache, f, &space)).collect();
    match args.format {
        ReportFormat::Text => {
            for (file, report) in files.iter().zip(&reports) {
                if !global.quiet {
                    println!(
                        "{} ({}, {} declarations)",
                        report.path,
                        report.depth,
                        report.declarations.len()
                    );
                    for decl in &report.declarations {
                        println!(
                            "  {:<6} {:<24} {}:{}",
                            decl.kind, decl.name, decl.line, decl.col
                        );
                    }
                }
                for rendered in render_diagnostics(file, &space, global.color) {
                    eprintln!("{rendered}");
                }
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    let failed = files.iter().filter(|f| f.has_errors()).count();
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Result: {failed} of {} file(s) with errors", files.len());
    }
    Ok(if failed > 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_cache::MemoryFile;

    const SOURCE: &str = "\
package geo

type Point struct {
\tx int
\ty int
}

func (p *Point) Norm() int {
\treturn p.x*p.x + p.y*p.y
}

var origin Point
";

    fn build(text: &str, depth: ParseDepth) -> FileReport {
        let cache = ParseCache::default();
        let (files, space) = cache
            .resolve(
                &CancellationToken::new(),
                depth,
                &[MemoryFile::new("geo.tn", text)],
            )
            .unwrap();
        report(&cache, &files[0], &space)
    }

    #[test]
    fn lists_declarations() {
        let report = build(SOURCE, ParseDepth::Full);
        assert_eq!(
            report.declarations,
            vec![
                DeclReport {
                    kind: "type",
                    name: "Point".into(),
                    line: 3,
                    col: 1
                },
                DeclReport {
                    kind: "method",
                    name: "Norm".into(),
                    line: 8,
                    col: 1
                },
                DeclReport {
                    kind: "var",
                    name: "origin".into(),
                    line: 12,
                    col: 1
                },
            ]
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn header_depth_lists_the_same_declarations() {
        let full = build(SOURCE, ParseDepth::Full);
        let header = build(SOURCE, ParseDepth::Header);
        assert_eq!(full.declarations, header.declarations);
        assert_eq!(header.depth, ParseDepth::Header);
    }

    #[test]
    fn diagnostics_carry_locations() {
        let report = build("package p\nfunc f() {\n\tx.\n}\n", ParseDepth::Full);
        assert_eq!(report.diagnostics.len(), 1);
        let diag = &report.diagnostics[0];
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.location.as_deref(), Some("geo.tn:3:3"));
    }

    #[test]
    fn json_shape() {
        let report = build("package p\nvar x int\n", ParseDepth::Header);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["path"], "geo.tn");
        assert_eq!(json["depth"], "header");
        assert_eq!(json["declarations"][0]["kind"], "var");
        assert_eq!(json["declarations"][0]["name"], "x");
        assert!(json["base"].as_u64().unwrap() >= 1);
    }
}
