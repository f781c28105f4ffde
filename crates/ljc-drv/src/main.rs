//! ljc - command-line driver for the Ljos compiler.
//!
//! Commands: `compile` (one file), `build` (every `.lj` under a
//! directory, in parallel), `watch` (recompile on change). Exit codes:
//! 0 on success, 1 on compilation errors, 2 on I/O or usage errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ljc_drv::{compile_project, discover_sources, Compiler, Options};
use ljc_gen::ModuleResolution;
use ljc_lex::Lexer;
use ljc_util::{FileId, Handler};

/// The Ljos compiler.
#[derive(ClapParser, Debug)]
#[command(name = "ljc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiler for the Ljos language", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a single source file
    Compile(CompileCommand),

    /// Compile every .lj file under a directory
    Build(BuildCommand),

    /// Watch a file or directory and recompile on change
    Watch(WatchCommand),
}

#[derive(ClapParser, Debug)]
struct CompileCommand {
    /// Source file to compile
    file: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Recompile whenever the file changes
    #[arg(short, long)]
    watch: bool,

    /// What to emit (for pipeline debugging)
    #[arg(long, value_enum, default_value_t = EmitKind::Js)]
    emit: EmitKind,

    /// Target tag written into a header comment
    #[arg(long)]
    target: Option<String>,

    /// Append a source-map hint to the output
    #[arg(long)]
    source_map: bool,

    /// Import specifier translation
    #[arg(long, value_enum, default_value_t = ResolutionKind::Preserve)]
    module_resolution: ResolutionKind,
}

#[derive(ClapParser, Debug)]
struct BuildCommand {
    /// Directory to compile
    dir: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapParser, Debug)]
struct WatchCommand {
    /// File or directory to watch
    path: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EmitKind {
    /// Lexer output
    Tokens,
    /// Parser output
    Ast,
    /// Generated JavaScript
    Js,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ResolutionKind {
    /// Leave specifiers as written
    Preserve,
    /// Rewrite `.lj` to `.js`
    LjToJs,
    /// Rewrite leading `/std/` to the runtime package
    StdRewrite,
}

impl From<ResolutionKind> for ModuleResolution {
    fn from(kind: ResolutionKind) -> Self {
        match kind {
            ResolutionKind::Preserve => ModuleResolution::Preserve,
            ResolutionKind::LjToJs => ModuleResolution::LjToJs,
            ResolutionKind::StdRewrite => ModuleResolution::StdRewrite,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Compile(args) => run_compile(args),
        Commands::Build(args) => run_build(args),
        Commands::Watch(args) => run_watch(args),
    }
}

fn run_compile(args: CompileCommand) -> anyhow::Result<ExitCode> {
    let options = Options {
        out_dir: args.output,
        source_map: args.source_map,
        target: args.target,
        module_resolution: args.module_resolution.into(),
    };

    if args.watch {
        return watch_loop(&args.file, &options);
    }

    match args.emit {
        EmitKind::Tokens => {
            let source = std::fs::read_to_string(&args.file)?;
            let handler = Handler::new();
            for token in Lexer::tokenize(&source, &handler, FileId::DUMMY) {
                println!("{:?} @ {}:{}", token.kind, token.span.line, token.span.column);
            }
            return Ok(exit_for(!handler.has_errors()));
        }
        EmitKind::Ast => {
            let source = std::fs::read_to_string(&args.file)?;
            let handler = Handler::new();
            let program = ljc_par::Parser::parse_source(&source, &handler, FileId::DUMMY);
            println!("{:#?}", program);
            return Ok(exit_for(!handler.has_errors()));
        }
        EmitKind::Js => {}
    }

    let mut compiler = Compiler::new();
    let output = compiler.compile_file(&args.file, &options)?;
    for line in compiler.render_diagnostics(&output.diagnostics) {
        eprintln!("{}", line);
    }
    if let Some(written) = &output.written {
        info!("wrote {}", written.display());
    }
    Ok(exit_for(output.ok))
}

fn run_build(args: BuildCommand) -> anyhow::Result<ExitCode> {
    let options = Options {
        out_dir: args.output,
        ..Options::default()
    };
    let outcome = compile_project(&args.dir, &options)?;
    for line in &outcome.rendered {
        eprintln!("{}", line);
    }
    info!(
        "compiled {} file(s), {} failed",
        outcome.compiled, outcome.failed
    );
    Ok(exit_for(outcome.ok()))
}

fn run_watch(args: WatchCommand) -> anyhow::Result<ExitCode> {
    let options = Options {
        out_dir: args.output,
        ..Options::default()
    };
    watch_loop(&args.path, &options)
}

/// Poll mtimes and recompile whatever changed.
fn watch_loop(root: &Path, options: &Options) -> anyhow::Result<ExitCode> {
    let mut seen: HashMap<PathBuf, SystemTime> = HashMap::new();

    info!("watching {} (ctrl-c to stop)", root.display());
    loop {
        let mut files = Vec::new();
        discover_sources(root, &mut files)?;
        for path in files {
            let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(_) => continue,
            };
            let changed = seen.insert(path.clone(), modified) != Some(modified);
            if changed {
                let mut compiler = Compiler::new();
                match compiler.compile_file(&path, options) {
                    Ok(output) => {
                        for line in compiler.render_diagnostics(&output.diagnostics) {
                            eprintln!("{}", line);
                        }
                        if output.ok {
                            info!("compiled {}", path.display());
                        }
                    }
                    Err(err) => eprintln!("error: {:#}", err),
                }
            }
        }
        std::thread::sleep(Duration::from_millis(300));
    }
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
