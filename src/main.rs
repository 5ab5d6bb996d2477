//! BanaClass command line.
//!
//! `serve` runs the web application, `classify` labels image files from the
//! shell and `inspect` prints the model's inputs and outputs.

use banaclass::core::config::{ClassifierConfig, ConfigValidator, ServerConfig};
use banaclass::core::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SESSION_TTL_SECS, init_tracing,
    load_session,
};
use banaclass::domain::Decision;
use banaclass::pipeline::{InferencePipeline, shared_pipeline};
use banaclass::server::{self, State};
use banaclass::utils::load_images_batch;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "banaclass", version)]
#[command(about = "Banana variety classifier - web application and command line")]
struct Cli {
    /// Path to the ONNX model file
    #[arg(short, long, global = true, env = "BANACLASS_MODEL")]
    model: Option<PathBuf>,

    /// JSON classifier configuration. --model and --threshold take precedence.
    #[arg(short, long, global = true, env = "BANACLASS_CONFIG")]
    config: Option<PathBuf>,

    /// Top probability an image needs to be accepted as a banana
    #[arg(short, long, global = true)]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web application
    Serve(ServeArgs),
    /// Classify image files
    Classify {
        /// Paths to input image files
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Number of ranked varieties to print for accepted images
        #[arg(short = 'k', long, default_value_t = 1)]
        top_k: usize,
    },
    /// Print the input and output tensors of the model
    Inspect,
}

/// Web server settings. Each flag can also come from its environment variable.
#[derive(Args, Debug)]
struct ServeArgs {
    /// Socket address to listen on
    #[arg(long, env = "BANACLASS_BIND", default_value = DEFAULT_BIND_ADDR)]
    bind: SocketAddr,

    /// Directory with the catalog images and the logo
    #[arg(long, env = "BANACLASS_ASSETS_DIR", default_value = "assets")]
    assets: PathBuf,

    /// Idle time after which a browser session is dropped, in seconds
    #[arg(long, env = "BANACLASS_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    session_ttl_secs: u64,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "BANACLASS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            bind: args.bind.to_string(),
            assets_dir: args.assets,
            session_ttl_secs: args.session_ttl_secs,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let config = classifier_config(&cli)?;

    match cli.command {
        Command::Serve(args) => serve(config, args.into()),
        Command::Classify { images, top_k } => classify(config, &images, top_k),
        Command::Inspect => inspect(&config),
    }
}

/// Merges the configuration file with command-line overrides.
fn classifier_config(cli: &Cli) -> Result<ClassifierConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }
    if let Some(threshold) = cli.threshold {
        config = config.with_confidence_threshold(threshold);
    }
    config.validate()?;
    Ok(config)
}

fn serve(
    config: ClassifierConfig,
    server_config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    server_config.validate()?;

    // The model is loaded before binding; a server that cannot classify never starts.
    let pipeline = match InferencePipeline::from_config(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to load the classification model: {}", e);
            return Err(e.into());
        }
    };
    info!("Loaded {}", pipeline.classifier().engine_info());

    let state = Arc::new(State::new(Arc::new(pipeline), server_config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(state))?;
    Ok(())
}

fn classify(
    config: ClassifierConfig,
    images: &[PathBuf],
    top_k: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = shared_pipeline(|| config)?;

    let mut batch = Vec::with_capacity(images.len());
    let mut loaded_paths = Vec::with_capacity(images.len());
    for (path, result) in images.iter().zip(load_images_batch(images)) {
        match result {
            Ok(img) => {
                batch.push(img);
                loaded_paths.push(path);
            }
            Err(e) => error!("Failed to load image {}: {}", path.display(), e),
        }
    }

    if batch.is_empty() {
        error!("No images could be loaded for processing");
        return Err("No images could be loaded".into());
    }

    info!("Processing {} images...", batch.len());
    let decisions = pipeline.classify_batch(batch)?;

    for (i, (path, decision)) in loaded_paths.iter().zip(&decisions).enumerate() {
        info!("{}. {}", i + 1, path.display());
        match decision {
            Decision::Accepted(result) => {
                info!(
                    "   Variety: {} (confidence: {:.2}%)",
                    result.label,
                    result.confidence_percent()
                );
                if top_k > 1 {
                    let ranked = pipeline.classifier().rank(&result.probabilities, top_k)?;
                    if let (Some(names), Some(scores)) = (
                        ranked.class_names.as_ref().and_then(|names| names.first()),
                        ranked.scores.first(),
                    ) {
                        for (name, score) in names.iter().zip(scores) {
                            info!("      {}: {:.4}", name, score);
                        }
                    }
                }
            }
            Decision::Rejected => info!("   Not recognised as a banana"),
        }
    }

    info!("{}", pipeline.stats());
    Ok(())
}

fn inspect(config: &ClassifierConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = load_session(&config.model_path)?;

    info!("Model: {}", config.model_path.display());
    for input in &session.inputs {
        info!("   input  {}: {:?}", input.name, input.input_type);
    }
    for output in &session.outputs {
        info!("   output {}: {:?}", output.name, output.output_type);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_config(args: &[&str]) -> Result<ServerConfig, clap::Error> {
        let cli = Cli::try_parse_from(["banaclass", "serve"].iter().chain(args).copied())?;
        match cli.command {
            Command::Serve(args) => Ok(args.into()),
            _ => unreachable!("parsed a serve command"),
        }
    }

    #[test]
    fn test_serve_flags_are_typed() {
        let config = serve_config(&[
            "--bind",
            "127.0.0.1:9000",
            "--assets",
            "static",
            "--session-ttl-secs",
            "60",
            "--max-upload-bytes",
            "1024",
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.assets_dir, PathBuf::from("static"));
        assert_eq!(config.session_ttl_secs, 60);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_malformed_serve_values_are_errors() {
        assert!(serve_config(&["--session-ttl-secs", "soon"]).is_err());
        assert!(serve_config(&["--max-upload-bytes", "10MB"]).is_err());
        assert!(serve_config(&["--bind", "localhost"]).is_err());
    }

    #[test]
    fn test_zero_ttl_fails_validation() {
        let config = serve_config(&["--session-ttl-secs", "0"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
