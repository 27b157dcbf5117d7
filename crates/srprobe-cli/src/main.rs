use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use glob::glob;
use srprobe_core::DecodeReport;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("SRPROBE_BUILD_COMMIT"),
    ", built ",
    env!("SRPROBE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  srprobe pcap decode capture.pcapng -o probes.json\n  srprobe pcap parse capture.pcap --stdout --pretty\n  srprobe pcap decode 'captures/*.pcapng' --stdout --list-errors";

#[derive(Parser, Debug)]
#[command(name = "srprobe")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline SRv6 Segment Routing Header decoder for in-situ OAM probe captures.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every frame of a capture into a JSON probe report.
    #[command(alias = "parse")]
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a .pcap or .pcapng file (glob patterns must match one file)
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any frame failed to decode
    #[arg(long)]
    strict: bool,

    /// List decode failures per layer after decoding
    #[arg(long)]
    list_errors: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Decode(args) => cmd_pcap_decode(args),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pcap_decode(args: DecodeArgs) -> Result<(), CliError> {
    let DecodeArgs {
        input,
        report,
        stdout,
        pretty,
        compact,
        quiet,
        strict,
        list_errors,
    } = args;

    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let output = if stdout {
        None
    } else {
        let report_path = report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&report_path, &input_abs)?;
        Some(report_path)
    };

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }

    log::debug!("decoding {}", resolved_input.display());
    let rep = srprobe_core::decode_pcap_file(&resolved_input)
        .context("PCAP/PCAPNG decoding failed")?;
    let json = serialize_report(&rep, pretty, compact)?;

    match output {
        None => print!("{}", json),
        Some(report_path) => {
            write_report(&report_path, &json)?;
            if !quiet {
                eprintln!("OK: report written -> {}", report_path.display());
            }
        }
    }

    if list_errors && !quiet {
        print_errors(&rep);
    }
    if strict && has_errors(&rep) {
        return Err(CliError::new(
            format!("{} frame(s) failed to decode", failed_frames(&rep)),
            Some("use --list-errors to inspect".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = match report_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => fs::canonicalize("."),
        Some(parent) => fs::canonicalize(parent),
        None => return Ok(()),
    };
    // A missing output directory cannot contain the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_report(report_path: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
    Ok(())
}

fn serialize_report(rep: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn has_errors(rep: &DecodeReport) -> bool {
    rep.errors.iter().any(|summary| summary.count > 0)
}

fn failed_frames(rep: &DecodeReport) -> u64 {
    rep.errors.iter().map(|summary| summary.count).sum()
}

fn print_errors(rep: &DecodeReport) {
    eprintln!("Decode errors:");
    if rep.errors.is_empty() {
        eprintln!("  none");
        return;
    }
    for summary in &rep.errors {
        eprintln!("  {} ({})", summary.layer, summary.count);
        for example in &summary.examples {
            eprintln!("    {}", example);
        }
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut message = format!("multiple files match pattern '{}' ({} matches)", pattern, count);
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str("; matches: ");
            message.push_str(&listed);
            if count > 3 {
                message.push_str(", ...");
            }
            Err(CliError::new(
                message,
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("captures/*.pcapng"));
        assert!(is_glob_pattern("capture?.pcap"));
        assert!(!is_glob_pattern("capture.pcap"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("capture.txt");
        fs::write(&path, b"").expect("write");
        let err = validate_input_file(&path).unwrap_err();
        assert!(err.message.contains("unsupported input format"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
