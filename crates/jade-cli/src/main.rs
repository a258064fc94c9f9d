use clap::{ArgAction, Parser, Subcommand};
use jade_lexer::{Lexer, LexerOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jade")]
#[command(about = "jade: indentation-based template to HTML compiler")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Stop lexing once more than this many errors occurred
    #[arg(long, global = true)]
    max_errors: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a template and print the HTML
    Build {
        /// Input file, or `-` for stdin
        path: PathBuf,

        /// Exit with status 1 when any lexical error was reported
        #[arg(long)]
        strict: bool,
    },

    /// Report lexical errors without printing output
    Check {
        /// Input file, or `-` for stdin
        path: PathBuf,
    },

    /// Dump the token stream, one token per line
    Tokens {
        /// Input file, or `-` for stdin
        path: PathBuf,

        /// Dump raw lexemes instead of tokens
        #[arg(long)]
        lexemes: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match &cli.command {
        Command::Build { path, strict } => cmd_build(path, *strict, cli.max_errors),
        Command::Check { path } => cmd_check(path, cli.max_errors),
        Command::Tokens { path, lexemes } => cmd_tokens(path, *lexemes, cli.max_errors),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn display_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, CliError> {
    let read = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map(|_| buf)
    } else {
        std::fs::read(path)
    };
    read.map_err(|source| CliError::Read {
        path: display_name(path),
        source,
    })
}

fn options(path: &Path, max_errors: Option<usize>) -> LexerOptions {
    let mut options = LexerOptions::new()
        .name(display_name(path))
        .on_error(|pos, kind| eprintln!("lexer error: {pos}: {kind}"));
    options.max_errors = max_errors;
    options
}

fn cmd_build(path: &Path, strict: bool, max_errors: Option<usize>) -> Result<ExitCode, CliError> {
    let source = read_source(path)?;
    let out = jade_parser::compile_bytes(&source, options(path, max_errors));
    println!("{}", out.html);
    log::debug!("{}: {} error(s)", display_name(path), out.error_count);

    if strict && out.error_count > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(path: &Path, max_errors: Option<usize>) -> Result<ExitCode, CliError> {
    let source = read_source(path)?;
    let out = jade_parser::compile_bytes(&source, options(path, max_errors));
    let name = display_name(path);

    if out.error_count > 0 {
        eprintln!("{name}: {} error(s)", out.error_count);
        return Ok(ExitCode::FAILURE);
    }
    eprintln!("OK: {name}");
    Ok(ExitCode::SUCCESS)
}

fn cmd_tokens(path: &Path, lexemes: bool, max_errors: Option<usize>) -> Result<ExitCode, CliError> {
    let source = read_source(path)?;
    let mut lexer = Lexer::from_bytes(&source, options(path, max_errors));

    if lexemes {
        for lexeme in lexer.lexemes() {
            println!("{lexeme}");
        }
    } else {
        for token in lexer.tokens() {
            println!("{token}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
