use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{anyhow, Context};
use clap::Parser;
use malang::{codegen, lexer, parser, util::fmt::tree};
use tracing_subscriber::EnvFilter;

mod run;

/// Compiles a Malang program to Go and runs it.
#[derive(Debug, Parser)]
#[command(name = "malangc", version, about, long_about = None)]
struct Cli {
    /// Malang source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the token list
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Print the generated Go source
    #[arg(long)]
    go: bool,

    /// Write the generated Go source to PATH instead of running it
    #[arg(long, value_name = "PATH")]
    emit: Option<PathBuf>,

    /// Stop once the Go source is generated
    #[arg(long)]
    check: bool,

    /// Go toolchain used to run the program [default: `go` from PATH]
    #[arg(long, env = "MALANG_GO", value_name = "PATH")]
    go_bin: Option<PathBuf>,

    /// Log every compilation stage
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let located = |e: malang::Error| anyhow!("{}:{e}", cli.input.display());

    let tokens = lexer::lex_in_new(&src).map_err(|e| located(e.into()))?;
    if cli.tokens {
        let mut out = io::stdout().lock();
        for token in &tokens {
            writeln!(out, "{token:?}")?;
        }
    }

    let program = parser::parse_program(&tokens).map_err(|e| located(e.into()))?;
    if cli.ast {
        tree::print_program(&mut io::stdout().lock(), &program)?;
    }

    let code = codegen::generate(&program).map_err(|e| located(e.into()))?;
    if cli.go {
        io::stdout().lock().write_all(code.as_bytes())?;
    }

    if let Some(path) = &cli.emit {
        fs::write(path, &code).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote Go source");
        return Ok(ExitCode::SUCCESS);
    }
    if cli.check {
        return Ok(ExitCode::SUCCESS);
    }

    let go = match &cli.go_bin {
        Some(go) => go.clone(),
        None => which::which("go")
            .context("could not find `go` on PATH (pass --go-bin or set MALANG_GO)")?,
    };
    let status = run::go_run(&go, &code)?;
    if status.success() {
        return Ok(ExitCode::SUCCESS);
    }
    tracing::debug!(%status, "program exited unsuccessfully");
    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MALANG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
