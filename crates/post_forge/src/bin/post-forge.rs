use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use post_forge::{
    api::{DraftBody, GenerateImageBody, SummarizeBody, TranscribeBody},
    huggingface::HuggingFaceClient,
    tracing::init_tracing_subscriber,
    ChunkedSummarizer, Outcome, PipelineProcessor, PipelineProcessorBuilder, ScriptTranscriber,
};

#[derive(Parser)]
#[command(
    name = "post-forge",
    about = "Turn a video link into a blog post draft: transcript, summary and cover art"
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct Config {
    /// Hugging Face token used for summarization
    #[arg(long, env = "HF_API_KEY", hide_env_values = true, default_value = "")]
    hf_api_key: String,

    /// Hugging Face token used for image generation
    #[arg(long, env = "HF_IMAGE_API_KEY", hide_env_values = true, default_value = "")]
    hf_image_api_key: String,

    /// Base url of the inference API
    #[arg(long, env = "HF_BASE_URL", default_value = HuggingFaceClient::DEFAULT_BASE_URL)]
    hf_base_url: String,

    /// Summarization model id
    #[arg(long, env = "SUMMARIZATION_MODEL", default_value = "facebook/bart-large-cnn")]
    summarization_model: String,

    /// Text-to-image model id
    #[arg(
        long,
        env = "IMAGE_MODEL",
        default_value = "stabilityai/stable-diffusion-xl-base-1.0"
    )]
    image_model: String,

    /// Timeout for a single image generation call, in seconds
    #[arg(long, env = "IMAGE_TIMEOUT_SECS", default_value = "60")]
    image_timeout_secs: u64,

    /// Interpreter used to run the transcription script
    #[arg(long, env = "TRANSCRIBE_EXECUTABLE", default_value = ScriptTranscriber::DEFAULT_EXECUTABLE)]
    transcribe_executable: PathBuf,

    /// Path to the transcription script
    #[arg(long, env = "TRANSCRIBE_SCRIPT", default_value = ScriptTranscriber::DEFAULT_SCRIPT)]
    transcribe_script: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a video
    Transcribe {
        /// Video url
        url: String,

        /// Also produce an AI-improved transcript
        #[arg(long)]
        improve: bool,
    },
    /// Summarize text, read from the argument or a file
    Summarize {
        /// Text to summarize
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from this file instead
        #[arg(long)]
        file: Option<PathBuf>,

        /// Upper bound on the summary length, in tokens
        #[arg(long)]
        max_length: Option<u32>,
    },
    /// Generate a cover image for a prompt
    Image {
        /// Text prompt
        prompt: String,
    },
    /// Run the whole pipeline and assemble a post draft
    Draft {
        /// Video url
        url: String,

        #[arg(long)]
        improve: bool,

        /// Summarize the transcript down to this many tokens
        #[arg(long)]
        summary_max_length: Option<u32>,

        /// Generate a cover image from this prompt
        #[arg(long)]
        image_prompt: Option<String>,
    },
}

type Processor = PipelineProcessor<
    ScriptTranscriber,
    ChunkedSummarizer<HuggingFaceClient>,
    HuggingFaceClient,
>;

fn build_processor(config: &Config) -> Processor {
    let summarization_client = HuggingFaceClient::new(&config.hf_api_key)
        .with_base_url(&config.hf_base_url)
        .with_summarization_model(&config.summarization_model);

    let image_client = HuggingFaceClient::new(&config.hf_image_api_key)
        .with_base_url(&config.hf_base_url)
        .with_image_model(&config.image_model)
        .with_image_timeout(Duration::from_secs(config.image_timeout_secs));

    PipelineProcessorBuilder::new()
        .transcriber(ScriptTranscriber::new(
            &config.transcribe_executable,
            &config.transcribe_script,
        ))
        .summarizer(ChunkedSummarizer::new(summarization_client))
        .image_synthesizer(image_client)
        .build()
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{json}");
    Ok(())
}

fn emit_outcome<T: Serialize>(outcome: &Outcome<T>) -> anyhow::Result<ExitCode> {
    emit(outcome)?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let processor = build_processor(&cli.config);

    match cli.command {
        Command::Transcribe { url, improve } => {
            let outcome = processor
                .handle_transcribe(TranscribeBody { url, improve })
                .await;
            emit_outcome(&outcome)
        }
        Command::Summarize {
            text,
            file,
            max_length,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => String::new(),
            };
            let outcome = processor
                .handle_summarize(SummarizeBody { text, max_length })
                .await;
            emit_outcome(&outcome)
        }
        Command::Image { prompt } => {
            let outcome = processor
                .handle_generate_image(GenerateImageBody { prompt })
                .await;
            emit_outcome(&outcome)
        }
        Command::Draft {
            url,
            improve,
            summary_max_length,
            image_prompt,
        } => {
            let reply = processor
                .handle_draft(DraftBody {
                    url,
                    improve,
                    summary_max_length,
                    image_prompt,
                })
                .await;
            emit(&reply)?;
            Ok(if reply.report.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    if cli.config.hf_api_key.is_empty() || cli.config.hf_image_api_key.is_empty() {
        tracing::warn!("HF_API_KEY or HF_IMAGE_API_KEY not set, remote calls will be rejected");
    }

    run(cli).await
}
