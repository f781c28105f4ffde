//! ljc-drv - Compiler driver and façade for the Ljos compiler.
//!
//! The façade composes lexer → parser → generator. A compilation is
//! reported failed when any phase produced an error-severity diagnostic,
//! but the best-effort artifact is still carried in the result for
//! tooling that wants partial output.
//!
//! The core is single-threaded and synchronous: each [`Compiler`] owns
//! its source map and every `compile` call owns its lexer, parser and
//! generator. [`compile_project`] exploits that disjoint ownership by
//! compiling independent files in parallel with no coordination.
//!
//! # Examples
//!
//! ```
//! use ljc_drv::{Compiler, Options};
//!
//! let mut compiler = Compiler::new();
//! let output = compiler
//!     .compile("const x = 1 + 2", "main.lj", &Options::default())
//!     .unwrap();
//!
//! assert!(output.ok);
//! assert!(output.code.unwrap().contains("const x = (1 + 2);"));
//! ```

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use ljc_gen::{EmitOptions, GenError, ModuleResolution};
use ljc_par::Parser;
use ljc_util::{Diagnostic, Handler, SourceMap};

/// Driver-level failure: I/O problems and internal compiler errors.
/// User-input problems are never errors; they are diagnostics on the
/// [`Output`].
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Codegen(#[from] GenError),
}

/// Compilation options recognized by the façade.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Directory compiled files are written to; defaults to the source
    /// file's directory.
    pub out_dir: Option<PathBuf>,
    /// Emit a source-map hint trailer next to the output name.
    pub source_map: bool,
    /// Target tag; affects only a header comment.
    pub target: Option<String>,
    /// Import specifier translation strategy.
    pub module_resolution: ModuleResolution,
}

/// Result of one compilation.
#[derive(Debug)]
pub struct Output {
    /// False when any error-severity diagnostic was produced.
    pub ok: bool,
    /// Emitted target code (best-effort even on failure).
    pub code: Option<String>,
    /// All diagnostics, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Where `compile_file` wrote the artifact, when it did.
    pub written: Option<PathBuf>,
}

/// The compiler façade. Owns the source map used to render diagnostics.
#[derive(Default)]
pub struct Compiler {
    sources: SourceMap,
}

impl Compiler {
    /// Create a fresh compiler with an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The source map of everything this compiler has seen.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Compile source text.
    pub fn compile(
        &mut self,
        source: &str,
        source_name: &str,
        options: &Options,
    ) -> Result<Output, DriverError> {
        let file_id = self.sources.add_file(source_name, source);
        let handler = Handler::new();

        debug!(file = source_name, "parsing");
        let program = Parser::parse_source(source, &handler, file_id);

        debug!(file = source_name, "generating");
        let emit_opts = EmitOptions {
            target: options.target.clone(),
            source_map_hint: options
                .source_map
                .then(|| format!("{}.map", output_file_name(source_name))),
            module_resolution: options.module_resolution,
        };
        let code = ljc_gen::generate(&program, &handler, &emit_opts, source_name)?;

        Ok(Output {
            ok: !handler.has_errors(),
            code: Some(code),
            diagnostics: handler.diagnostics(),
            written: None,
        })
    }

    /// Compile a file and, on success, write the artifact next to it (or
    /// into `options.out_dir`).
    pub fn compile_file(&mut self, path: &Path, options: &Options) -> Result<Output, DriverError> {
        let source = std::fs::read_to_string(path).map_err(|e| DriverError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path.display().to_string();
        let mut output = self.compile(&source, &name, options)?;

        if output.ok {
            if let Some(code) = &output.code {
                let out_path = output_path(path, options);
                if let Some(parent) = out_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| DriverError::WriteFailed {
                            path: out_path.clone(),
                            source: e,
                        })?;
                    }
                }
                std::fs::write(&out_path, code).map_err(|e| DriverError::WriteFailed {
                    path: out_path.clone(),
                    source: e,
                })?;
                debug!(out = %out_path.display(), "wrote artifact");
                output.written = Some(out_path);
            }
        }
        Ok(output)
    }

    /// Render this compiler's view of a diagnostic list, one line each.
    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics
            .iter()
            .map(|d| d.render(&self.sources))
            .collect()
    }
}

/// Summary of a project build.
#[derive(Debug)]
pub struct ProjectOutcome {
    /// Files compiled.
    pub compiled: usize,
    /// Files whose compilation failed.
    pub failed: usize,
    /// Rendered diagnostic lines from every file, in path order.
    pub rendered: Vec<String>,
}

impl ProjectOutcome {
    /// True when every file compiled cleanly.
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Compile every `.lj` file under `root`, in parallel.
///
/// Each file gets its own [`Compiler`]; inputs are independent, so no
/// coordination is needed beyond collecting results.
pub fn compile_project(root: &Path, options: &Options) -> Result<ProjectOutcome, DriverError> {
    let mut files = Vec::new();
    discover_sources(root, &mut files)?;
    files.sort();

    let results: Vec<(bool, Vec<String>)> = files
        .par_iter()
        .map(|path| {
            let mut compiler = Compiler::new();
            match compiler.compile_file(path, options) {
                Ok(output) => (output.ok, compiler.render_diagnostics(&output.diagnostics)),
                Err(err) => (false, vec![format!("{}: {}", path.display(), err)]),
            }
        })
        .collect();

    let failed = results.iter().filter(|(ok, _)| !ok).count();
    let rendered = results.into_iter().flat_map(|(_, lines)| lines).collect();
    Ok(ProjectOutcome {
        compiled: files.len(),
        failed,
        rendered,
    })
}

/// Recursively collect `.lj` files.
pub fn discover_sources(root: &Path, files: &mut Vec<PathBuf>) -> Result<(), DriverError> {
    if root.is_file() {
        files.push(root.to_path_buf());
        return Ok(());
    }
    let entries = std::fs::read_dir(root).map_err(|e| DriverError::ReadFailed {
        path: root.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| DriverError::ReadFailed {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            discover_sources(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "lj") {
            files.push(path);
        }
    }
    Ok(())
}

/// Output file name for a source name: `.lj` becomes `.js`.
fn output_file_name(source_name: &str) -> String {
    let path = Path::new(source_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("{}.js", stem)
}

/// Where to write the artifact for `path`.
fn output_path(path: &Path, options: &Options) -> PathBuf {
    let file_name = output_file_name(&path.display().to_string());
    match &options.out_dir {
        Some(dir) => dir.join(file_name),
        None => path.with_extension("js"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_ok() {
        let mut compiler = Compiler::new();
        let output = compiler
            .compile("const x = 1", "main.lj", &Options::default())
            .unwrap();
        assert!(output.ok);
        assert!(output.diagnostics.is_empty());
        assert!(output.code.is_some());
    }

    #[test]
    fn test_compile_failure_keeps_partial_output() {
        let mut compiler = Compiler::new();
        let output = compiler
            .compile("const x = \nconst y = 2", "main.lj", &Options::default())
            .unwrap();
        assert!(!output.ok);
        assert!(!output.diagnostics.is_empty());
        // Best-effort artifact still present for tooling.
        let code = output.code.unwrap();
        assert!(code.contains("const y = 2;"));
    }

    #[test]
    fn test_rendered_diagnostics_carry_file_and_position() {
        let mut compiler = Compiler::new();
        let output = compiler
            .compile("const = 1", "bad.lj", &Options::default())
            .unwrap();
        let rendered = compiler.render_diagnostics(&output.diagnostics);
        assert!(!rendered.is_empty());
        assert!(rendered[0].starts_with("bad.lj:1:"));
        assert!(rendered[0].contains("error["));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("src/app.lj"), "app.js");
        assert_eq!(output_file_name("app.lj"), "app.js");
    }

    #[test]
    fn test_independent_compilations_are_isolated() {
        // Diagnostics from one compilation never leak into another.
        let mut a = Compiler::new();
        let bad = a.compile("const = ", "a.lj", &Options::default()).unwrap();
        assert!(!bad.ok);

        let mut b = Compiler::new();
        let good = b.compile("const x = 1", "b.lj", &Options::default()).unwrap();
        assert!(good.ok);
        assert!(good.diagnostics.is_empty());
    }
}
