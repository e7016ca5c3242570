//! CLI binary for textport.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig`, runs one request through the service boundary, and
//! prints the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use textport::pipeline::extract::strategy_for;
use textport::service::{self, ConvertRequest, ExtractTextBody, ServiceError};
use textport::{extract_file, write_payload, PipelineConfig, TesseractEngine};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  textport extract scan.png
  textport extract report.pdf --json
  textport convert --format pdf --filename notes --input notes.txt -o out/
  echo "hello" | textport convert --format doc --json
  textport serve --port 5000

OCR:
  Image extraction runs the tesseract binary. Use --tesseract to point at a
  specific executable and --ocr-lang to pick installed language data
  (e.g. eng+deu).
"#;

/// Extract text from documents and render text back into documents.
#[derive(Parser, Debug)]
#[command(
    name = "textport",
    version,
    about = "Extract text from PDF, DOCX, TXT and image files; render text to TXT, PDF or DOCX",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug-level logging.
    #[arg(short, long, global = true, env = "TEXTPORT_VERBOSE")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, global = true, env = "TEXTPORT_QUIET")]
    quiet: bool,

    /// OCR engine executable.
    #[arg(long, global = true, env = "TEXTPORT_TESSERACT", default_value = "tesseract")]
    tesseract: String,

    /// OCR language pack(s), `+`-separated.
    #[arg(long, global = true, env = "TEXTPORT_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// OCR page segmentation mode (0-13).
    #[arg(long, global = true, env = "TEXTPORT_OCR_PSM",
          value_parser = clap::value_parser!(u8).range(0..=13))]
    ocr_psm: Option<u8>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text of a .pdf, .docx, .txt or image file.
    Extract {
        /// File to read. The extension selects the extractor.
        input: PathBuf,

        /// Print `{"extractedText": ...}` instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Render text into a txt, pdf or doc file.
    Convert {
        /// Target format.
        #[arg(short, long, value_parser = ["txt", "pdf", "doc"])]
        format: String,

        /// Download name; sanitized, extension added. Defaults to the input
        /// file name, or `output`.
        #[arg(long)]
        filename: Option<String>,

        /// Text to render.
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,

        /// Read the text from this UTF-8 file. Without --text or --input,
        /// stdin is read.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write the file into.
        #[arg(short, long, env = "TEXTPORT_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Print the transport payload as JSON instead of writing a file.
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API.
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, env = "TEXTPORT_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(short, long, env = "TEXTPORT_PORT", default_value_t = 5000)]
        port: u16,

        /// Request body limit in bytes.
        #[arg(long, env = "TEXTPORT_MAX_UPLOAD_BYTES",
              default_value_t = textport::server::DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Command::Extract { ref input, json } => {
            let config = if needs_ocr(input) {
                with_engine(config, true)?
            } else {
                config
            };
            let text = tokio::task::block_in_place(|| extract_file(input, &config))
                .map_err(|e| ServiceError::extraction(&e))?;

            if json {
                let body = ExtractTextBody {
                    extracted_text: text.into_string(),
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&body).context("Failed to serialize result")?
                );
            } else {
                println!("{text}");
            }
        }

        Command::Convert {
            ref format,
            ref filename,
            ref text,
            ref input,
            ref output_dir,
            json,
        } => {
            let text = match (text, input) {
                (Some(t), _) => t.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read text from stdin")?;
                    buf
                }
            };
            let filename = filename.clone().or_else(|| {
                input
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
            });

            let request = ConvertRequest {
                text: Some(text),
                format: Some(format.clone()),
                filename,
            };
            let payload =
                tokio::task::block_in_place(|| service::handle_convert(&request, &config))?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).context("Failed to serialize payload")?
                );
            } else {
                let path = write_payload(&payload, output_dir)
                    .with_context(|| format!("Failed to write into {}", output_dir.display()))?;
                if !cli.quiet {
                    eprintln!(
                        "{} {} {}",
                        green("✓"),
                        path.display(),
                        dim(&format!("({})", payload.mime_type))
                    );
                }
            }
        }

        #[cfg(feature = "server")]
        Command::Serve {
            ref host,
            port,
            max_upload_bytes,
        } => {
            // a missing engine only fails image requests, not the server
            let config = with_engine(config, false)?;
            textport::server::serve(host, port, config, max_upload_bytes)
                .await
                .context("Server stopped")?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .ocr_command(&cli.tesseract)
        .ocr_language(&cli.ocr_lang);
    if let Some(psm) = cli.ocr_psm {
        builder = builder.ocr_page_segmentation(psm);
    }
    builder.build().context("Invalid configuration")
}

fn needs_ocr(path: &std::path::Path) -> bool {
    strategy_for(&path.to_string_lossy())
        .map(|s| s.name() == "image")
        .unwrap_or(false)
}

/// Probe the OCR engine once and hand it to every request.
fn with_engine(mut config: PipelineConfig, required: bool) -> Result<PipelineConfig> {
    match tokio::task::block_in_place(|| TesseractEngine::initialize(&config.ocr)) {
        Ok(engine) => {
            config.ocr_backend = Some(Arc::new(engine));
            Ok(config)
        }
        Err(e) if required => Err(ServiceError::extraction(&e).into()),
        Err(e) => {
            warn!("{e}; image extraction is disabled until the server is restarted with a working engine");
            Ok(config)
        }
    }
}
