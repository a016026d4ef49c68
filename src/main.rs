use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use speechmarks::sentence_detector::SentenceDetector;
use speechmarks::ssml;

#[derive(Parser, Debug)]
#[command(name = "speechmarks")]
#[command(about = "Sentence segmentation and SSML mark mapping for read-aloud pipelines")]
#[command(version)]
struct Args {
    /// Input text file to segment
    input: PathBuf,

    /// Language tag forwarded to the segmentation strategy
    #[arg(long, default_value = "en")]
    language: String,

    /// Print the full detection result as JSON
    #[arg(long)]
    json: bool,

    /// Print assembled sentence markup instead of the sentence listing
    #[arg(long)]
    ssml: bool,

    /// Optional stats summary output path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunStats {
    input: String,
    sentence_count: usize,
    total_words: usize,
    total_estimated_duration_ms: u64,
    method: speechmarks::DetectionMethod,
    language: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging for observability, same shape as the library's
    // own tracing output
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting speechmarks");
    info!(?args, "Parsed CLI arguments");

    // Validate the input early to fail fast with a clear error
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }
    if !args.input.is_file() {
        anyhow::bail!("Input path is not a file: {}", args.input.display());
    }

    let text = tokio::fs::read_to_string(&args.input).await?;
    info!("Read {} bytes from {}", text.len(), args.input.display());

    let detector = SentenceDetector::new()?;
    let metadata = detector.sentence_metadata(&text, Some(&args.language));

    info!(
        sentences = metadata.sentences.len(),
        total_words = metadata.total_words,
        "Detection complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else if args.ssml {
        let assembled = ssml::assemble_sentences(&metadata.sentences);
        println!("{}", assembled.markup);
    } else {
        for sentence in &metadata.sentences {
            println!(
                "{}\t{}\t({},{})",
                sentence.id, sentence.text, sentence.start_position, sentence.end_position
            );
        }
    }

    if let Some(stats_path) = &args.stats_out {
        let stats = RunStats {
            input: args.input.display().to_string(),
            sentence_count: metadata.sentences.len(),
            total_words: metadata.total_words,
            total_estimated_duration_ms: metadata.total_estimated_duration_ms,
            method: metadata.method,
            language: metadata.language.clone(),
        };
        tokio::fs::write(stats_path, serde_json::to_string_pretty(&stats)?).await?;
        info!("Wrote stats to {}", stats_path.display());
    }

    Ok(())
}
