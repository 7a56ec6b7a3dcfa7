//! CLI binary for pdf-salvage.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_salvage::pipeline::input::{encode_bytes, read_document};
use pdf_salvage::{
    extract_async, extract_stream, extract_with_timeout, is_binary_content, DocumentResult,
    ExtractionConfig, ExtractionObserver, ExtractionOutput, Method, Outcome,
};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── --explain observer ───────────────────────────────────────────────────────

/// Prints one line per strategy to stderr so users can see why a document
/// produced the text (or the diagnostic message) it did.
struct ExplainObserver;

impl ExtractionObserver for ExplainObserver {
    fn on_candidate(&self, method: Method, text_len: usize, score: Option<f64>) {
        let score = score
            .map(|s| format!("score {s:.3}"))
            .unwrap_or_else(|| "unscored".to_string());
        eprintln!(
            "  {} {:<14} {:>7}  {}",
            green("✓"),
            method.as_str(),
            dim(&format!("{text_len} chars")),
            dim(&score)
        );
    }

    fn on_strategy_error(&self, method: Method, error: &str) {
        eprintln!("  {} {:<14} {}", red("✗"), method.as_str(), dim(error));
    }

    fn on_extraction_complete(&self, outcome: &Outcome) {
        let line = match outcome {
            Outcome::Accepted { method, score } => format!(
                "accepted {}{}",
                method,
                score.map(|s| format!(" ({s:.3})")).unwrap_or_default()
            ),
            Outcome::Fallback { best_score } => format!(
                "no usable text (best score: {})",
                best_score
                    .map(|s| format!("{s:.3}"))
                    .unwrap_or_else(|| "none".into())
            ),
        };
        eprintln!("  {} {}", bold("→"), line);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Recover text from a PDF file
  pdf-salvage resume.pdf

  # From a base64 / data-URL dump on stdin
  cat upload.b64 | pdf-salvage -

  # Several files at once, JSON output
  pdf-salvage --json cv1.pdf cv2.pdf cv3.pdf > results.json

  # Show what each strategy produced
  pdf-salvage --explain resume.pdf

  # Only classify inputs as encoded PDF vs plain text
  pdf-salvage --check-binary upload.txt

EXIT STATUS:
  0  text recovered (or diagnostic message printed)
  1  an input could not be read or extraction failed
     (with --fail-on-fallback, also when no text was recovered)
"#;

/// Recover readable text from base64-encoded PDFs without a PDF parser.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-salvage",
    version,
    about = "Recover readable text from base64-encoded PDFs without a PDF parser",
    long_about = "Recover readable text from PDFs supplied as raw files, bare base64 or \
data:application/pdf;base64 URLs, using a cascade of pattern heuristics and a quality \
score. Prints a fixed diagnostic message when nothing readable is found.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input files (raw PDF, base64 text or data URL). Use `-` for stdin.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output structured JSON instead of plain text.
    #[arg(long, env = "PDF_SALVAGE_JSON")]
    json: bool,

    /// Print whether each input looks like an encoded PDF, then exit.
    #[arg(long)]
    check_binary: bool,

    /// Print per-strategy results to stderr.
    #[arg(long, env = "PDF_SALVAGE_EXPLAIN")]
    explain: bool,

    /// Exit with an error when no readable text was recovered.
    #[arg(long, env = "PDF_SALVAGE_FAIL_ON_FALLBACK")]
    fail_on_fallback: bool,

    /// Minimum quality score (0.0–1.0) for scored candidates.
    #[arg(long, env = "PDF_SALVAGE_THRESHOLD", default_value_t = 0.4)]
    threshold: f64,

    /// Slice size for the direct strategy, in base64 chars (multiple of 4).
    #[arg(long, env = "PDF_SALVAGE_SLICE_LEN", default_value_t = 10_000)]
    slice_len: usize,

    /// Chunk size for the binary-chunks strategy, in base64 chars (multiple of 4).
    #[arg(long, env = "PDF_SALVAGE_CHUNK_LEN", default_value_t = 5_000)]
    chunk_len: usize,

    /// How many base64 chars the TJ-operator strategy scans.
    #[arg(long, env = "PDF_SALVAGE_TJ_SCAN_LIMIT", default_value_t = 100_000)]
    tj_scan_limit: usize,

    /// Number of documents processed concurrently.
    #[arg(short, long, env = "PDF_SALVAGE_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Deadline in seconds. Only valid with a single input.
    #[arg(long, env = "PDF_SALVAGE_TIMEOUT")]
    timeout: Option<u64>,

    /// Disable progress bar.
    #[arg(long, env = "PDF_SALVAGE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_SALVAGE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_SALVAGE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    check_args(&cli)?;

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read inputs ──────────────────────────────────────────────────────
    let payloads = cli
        .inputs
        .iter()
        .map(|name| read_input(name).with_context(|| format!("Failed to read input '{name}'")))
        .collect::<Result<Vec<_>>>()?;

    // ── Classification only ──────────────────────────────────────────────
    if cli.check_binary {
        for (name, payload) in cli.inputs.iter().zip(&payloads) {
            println!("{}\t{}", is_binary_content(payload), name);
        }
        return Ok(());
    }

    let config = build_config(&cli)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let results: Vec<ExtractionOutput> = if payloads.len() == 1 {
        let payload = payloads.into_iter().next().unwrap_or_default();
        let output = match cli.timeout {
            Some(secs) => extract_with_timeout(payload, &config, Duration::from_secs(secs)).await,
            None => extract_async(payload, &config).await,
        };
        vec![output.context("Extraction failed")?]
    } else {
        run_batch(payloads, &config, show_progress).await?
    };

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])
        } else {
            serde_json::to_string_pretty(&results)
        }
        .context("Failed to serialise output")?;
        println!("{json}");
    } else {
        write_plain(&mut io::stdout().lock(), &cli.inputs, &results)?;
    }

    let fallbacks = results.iter().filter(|o| o.outcome.is_fallback()).count();
    if !cli.quiet && results.len() > 1 {
        eprintln!(
            "{} {}/{} documents recovered",
            if fallbacks == 0 { green("✔") } else { red("⚠") },
            results.len() - fallbacks,
            results.len()
        );
    }
    if cli.fail_on_fallback && fallbacks > 0 {
        anyhow::bail!("{fallbacks} document(s) produced no readable text");
    }

    Ok(())
}

/// Reject flag combinations clap cannot express.
fn check_args(cli: &Cli) -> Result<()> {
    if cli.timeout.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!(
            "--timeout applies to a single input, got {} inputs",
            cli.inputs.len()
        );
    }
    Ok(())
}

/// Print each result, with a `==> name <==` header when there are several.
fn write_plain(
    out: &mut impl Write,
    inputs: &[String],
    results: &[ExtractionOutput],
) -> Result<()> {
    let many = results.len() > 1;
    for (name, output) in inputs.iter().zip(results) {
        if many {
            writeln!(out, "==> {name} <==").context("Failed to write to stdout")?;
        }
        out.write_all(output.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.text.ends_with('\n') {
            out.write_all(b"\n").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Run several documents through the streaming API with a progress bar.
async fn run_batch(
    payloads: Vec<String>,
    config: &ExtractionConfig,
    show_progress: bool,
) -> Result<Vec<ExtractionOutput>> {
    let bar = if show_progress {
        let bar = ProgressBar::new(payloads.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut stream = extract_stream(payloads, config);
    let mut done: Vec<DocumentResult> = Vec::new();
    while let Some(item) = stream.next().await {
        let doc = item.context("Extraction failed")?;
        bar.inc(1);
        done.push(doc);
    }
    bar.finish_and_clear();

    done.sort_by_key(|d| d.index);
    Ok(done.into_iter().map(|d| d.output).collect())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .quality_threshold(cli.threshold)
        .slice_len(cli.slice_len)
        .chunk_len(cli.chunk_len)
        .tj_scan_limit(cli.tj_scan_limit)
        .concurrency(cli.concurrency);

    if cli.explain {
        builder = builder.observer(Arc::new(ExplainObserver));
    }

    builder.build().context("Invalid configuration")
}

/// Read a file path or `-` (stdin) into a payload.
fn read_input(name: &str) -> Result<String> {
    if name != "-" {
        return Ok(read_document(Path::new(name))?);
    }
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    if bytes.starts_with(b"%PDF") {
        Ok(encode_bytes(&bytes))
    } else {
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_salvage::FALLBACK_MESSAGE;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdf-salvage").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn timeout_with_one_input_is_accepted() {
        assert!(check_args(&parse(&["--timeout", "5", "a.pdf"])).is_ok());
    }

    #[test]
    fn timeout_with_several_inputs_is_rejected() {
        let err = check_args(&parse(&["--timeout", "5", "a.pdf", "b.pdf"])).unwrap_err();
        assert!(err.to_string().contains("single input"), "got: {err}");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output(text: &str) -> ExtractionOutput {
        pdf_salvage::extract(text, &ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn write_errors_are_reported() {
        let results = vec![output("")];
        let err = write_plain(&mut BrokenPipe, &["-".to_string()], &results).unwrap_err();
        assert!(err.to_string().contains("Failed to write"), "got: {err}");
    }

    #[test]
    fn several_results_get_headers_and_newlines() {
        let inputs = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        let results = vec![output(""), output("")];
        let mut buf = Vec::new();
        write_plain(&mut buf, &inputs, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("==> a.pdf <==\n"));
        assert!(text.contains("==> b.pdf <==\n"));
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches(FALLBACK_MESSAGE).count(), 2);
    }
}
