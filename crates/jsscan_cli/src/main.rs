//! jsscan: Tokenize JavaScript files from the command line.
//!
//! Usage:
//!   jsscan tokens [options] <file>
//!   jsscan check [options] <file>

use clap::{Parser as ClapParser, Subcommand};
use jsscan_core::IdentArena;
use jsscan_diagnostics::Diagnostic;
use jsscan_scanner::{
    CharClassifier, EncodingPolicy, HashTbl, ScanError, ScannedToken, Scanner, ScannerOptions,
    TokenStream, Utf16Policy, Utf8Policy,
};
use miette::{IntoDiagnostic, WrapErr};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(ClapParser, Debug)]
#[command(name = "jsscan", about = "jsscan - A JavaScript tokenizer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Scanner options file (JSON).
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scan as module code (implies strict mode).
    #[arg(long, global = true)]
    module: bool,

    /// Scan in strict mode.
    #[arg(long, global = true)]
    strict: bool,

    /// Use ES5 identifier rules instead of Unicode ID_Start / ID_Continue.
    #[arg(long = "no-es6-unicode", global = true)]
    no_es6_unicode: bool,

    /// Scan the file as UTF-16 instead of UTF-8.
    #[arg(long, global = true)]
    utf16: bool,

    /// Print tokens as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every token with its kind, span and value.
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Report the first scan error, if any.
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Command::Tokens { file } | Command::Check { file } => file,
        }
    }
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Everything one scan of a file produced.
struct ScanReport {
    tokens: Vec<ScannedToken>,
    error: Option<ScanError>,
    /// Source text of the line the error starts on.
    error_line: Option<String>,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let options = load_options(&cli)?;
    let path = cli.command.file();
    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
    info!(file = %path.display(), bytes = source.len(), utf16 = cli.utf16, "scanning");

    let report = if cli.utf16 {
        let units: Vec<u16> = source.encode_utf16().collect();
        scan_file::<Utf16Policy>(&units, false, &options)
    } else {
        scan_file::<Utf8Policy>(source.as_bytes(), true, &options)
    };

    let file_name = path.display().to_string();
    let exit_code = match cli.command {
        Command::Tokens { .. } => run_tokens(&report, &file_name, cli.json)?,
        Command::Check { .. } => run_check(&report, &file_name),
    };
    if exit_code != 0 {
        process::exit(exit_code);
    }
    Ok(())
}

fn init_logging(verbose: bool) -> miette::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("failed to initialize logging")
}

/// Config file options, overridden by command line flags.
fn load_options(cli: &Cli) -> miette::Result<ScannerOptions> {
    let mut options = match cli.config {
        Some(ref path) => ScannerOptions::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to load options from '{}'", path.display()))?,
        None => ScannerOptions::default(),
    };

    let mut overrides = ScannerOptions::default();
    if cli.module { overrides.module = Some(true); }
    if cli.strict { overrides.strict = Some(true); }
    if cli.no_es6_unicode { overrides.es6_unicode = Some(false); }
    options = options.merge(overrides);

    debug!(?options, "resolved scanner options");
    Ok(options)
}

fn scan_file<P: EncodingPolicy>(units: &[P::Unit], is_utf8: bool, options: &ScannerOptions) -> ScanReport {
    let config = options.resolve();
    let classifier = CharClassifier::new(config.es6_unicode);
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);

    let mut scanner = Scanner::<P>::new(&mut table, &classifier, config);
    scanner.set_text(units, 0, units.len(), 0, is_utf8, options.script_flags(), 0);

    let mut stream = TokenStream::new(scanner);
    let mut tokens = Vec::new();
    let mut error = None;
    for token in stream.by_ref() {
        match token {
            Ok(token) => tokens.push(token),
            Err(err) => error = Some(err),
        }
    }
    let error_line = error.and_then(|err| stream.scanner().sys_alloc_error_line(err.line));
    debug!(tokens = tokens.len(), identifiers = stream.scanner().hash_tbl().len(), "scan finished");

    ScanReport { tokens, error, error_line }
}

fn run_tokens(report: &ScanReport, file_name: &str, json: bool) -> miette::Result<i32> {
    if json {
        let tokens: Vec<serde_json::Value> = report.tokens.iter().map(token_json).collect();
        let mut output = serde_json::json!({ "file": file_name, "tokens": tokens });
        if let Some(err) = report.error {
            output["error"] = serde_json::json!({
                "code": err.kind.code(),
                "message": err.kind.message().message,
                "start": err.ich_min,
                "end": err.ich_lim,
                "line": err.line + 1,
            });
        }
        let text = serde_json::to_string_pretty(&output).into_diagnostic()?;
        println!("{}", text);
    } else {
        for token in &report.tokens {
            let value = token.value.as_deref().map(|v| format!(" {:?}", v)).unwrap_or_default();
            let newline = if token.had_newline_before { " (newline before)" } else { "" };
            println!(
                "{}:{} {:?} [{}, {}){}{}",
                token.line + 1,
                token.span.start,
                token.kind,
                token.span.start,
                token.span.end(),
                value,
                newline
            );
        }
    }

    match report.error {
        Some(err) => {
            print_diagnostic(&err.to_diagnostic(file_name), report.error_line.as_deref());
            Ok(1)
        }
        None => Ok(0),
    }
}

fn run_check(report: &ScanReport, file_name: &str) -> i32 {
    match report.error {
        Some(err) => {
            print_diagnostic(&err.to_diagnostic(file_name), report.error_line.as_deref());
            1
        }
        None => {
            let count = report.tokens.len();
            eprintln!("{}: {} token{}, no errors.", file_name, count, if count == 1 { "" } else { "s" });
            0
        }
    }
}

fn token_json(token: &ScannedToken) -> serde_json::Value {
    serde_json::json!({
        "kind": format!("{:?}", token.kind),
        "start": token.span.start,
        "end": token.span.end(),
        "line": token.line + 1,
        "newlineBefore": token.had_newline_before,
        "value": token.value,
    })
}

fn print_diagnostic(diag: &Diagnostic, source_line: Option<&str>) {
    if std::io::stderr().is_terminal() {
        if let Some(ref file) = diag.file {
            eprint!("{}{}{}", CYAN, file, RESET);
            if let (Some(line), Some(span)) = (diag.line, diag.span) {
                eprint!("({},{})", line + 1, span.start);
            }
            eprint!(": ");
        }
        eprintln!("{}{}error{} JS{}: {}", BOLD, RED, RESET, diag.code, diag.message_text);
        if let Some(text) = source_line {
            eprintln!("{}  | {}{}", GRAY, text.trim_end(), RESET);
        }
    } else {
        eprintln!("{}", diag);
        if let Some(text) = source_line {
            eprintln!("  | {}", text.trim_end());
        }
    }
}
