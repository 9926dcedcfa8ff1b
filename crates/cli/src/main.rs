//! Binary entry point for the subtitle sentence translator.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use subsent_core::translate::{
    google::GoogleTranslator, process_file, ArtifactSink, PipelineOptions, DEFAULT_SOURCE_LANG,
    DEFAULT_TARGET_LANG,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options for the binary.
#[derive(Parser)]
struct Cli {
    /// Language code of the subtitle text.
    #[arg(long, default_value = DEFAULT_SOURCE_LANG)]
    source_lang: String,

    /// Language code to translate the subtitles into.
    #[arg(long, default_value = DEFAULT_TARGET_LANG)]
    target_lang: String,

    /// Directory for checkpoint artifacts and the final subtitle.
    /// Defaults to the input file's directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    debug: bool,

    /// Path to the subtitle file we want to translate.
    input: PathBuf,
}

/// Application entry point which parses CLI args and runs the pipeline.
/// This function should initialize logging and delegate to the core library.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("subsent=trace".parse().unwrap())
            .add_directive("subsent_core=trace".parse().unwrap())
            .add_directive("info".parse().unwrap())
    } else {
        EnvFilter::default()
            .add_directive("subsent=info".parse().unwrap())
            .add_directive("subsent_core=info".parse().unwrap())
            .add_directive("warn".parse().unwrap())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let options = PipelineOptions {
        source_lang: cli.source_lang,
        target_lang: cli.target_lang,
        output_dir: cli.output_dir,
    };
    let sink = ArtifactSink::new(options.resolve_output_dir(&cli.input));
    let translator = GoogleTranslator::new();
    let out = process_file(&cli.input, &translator, &options, &sink).await?;
    info!("translated subtitle at {}", out.display());
    Ok(())
}
