mod batch;
mod demo;
mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use helpdesk_ai::{
    Classifier, ClassifierConfig, DEFAULT_LLM_MODEL, DEFAULT_LLM_URL, DEFAULT_RERANK_MODEL,
    DEFAULT_RERANK_URL, RemoteModelConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "helpdesk", version, about = "Helpdesk ticket classification and triage")]
struct Cli {
    #[command(flatten)]
    classifier: ClassifierArgs,

    #[command(subcommand)]
    command: Command,
}

/// Classifier settings. Flags and environment variables override the config file.
#[derive(Args, Debug, Default)]
struct ClassifierArgs {
    /// JSON classifier config file.
    #[arg(long, env = "HELPDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable or disable the keyword rules stage.
    #[arg(long, env = "HELPDESK_KEYWORD_RULES", global = true)]
    keyword_rules: Option<bool>,

    #[arg(long, env = "HELPDESK_RERANK_URL", global = true)]
    rerank_url: Option<String>,

    /// Reranker API key; the reranker stage runs only when set.
    #[arg(long, env = "HELPDESK_RERANK_KEY", hide_env_values = true, global = true)]
    rerank_key: Option<String>,

    #[arg(long, env = "HELPDESK_RERANK_MODEL", global = true)]
    rerank_model: Option<String>,

    #[arg(long, env = "HELPDESK_LLM_URL", global = true)]
    llm_url: Option<String>,

    /// LLM API key; the LLM stage runs only when set.
    #[arg(long, env = "HELPDESK_LLM_KEY", hide_env_values = true, global = true)]
    llm_key: Option<String>,

    #[arg(long, env = "HELPDESK_LLM_MODEL", global = true)]
    llm_model: Option<String>,

    /// Timeout for each remote stage, in milliseconds.
    #[arg(long, env = "HELPDESK_STAGE_TIMEOUT_MS", global = true)]
    stage_timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single ticket description.
    Classify {
        text: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Classify one description per line from a file (`-` for stdin).
    Batch {
        file: PathBuf,
        /// Descriptions classified at once.
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Run a scripted ticket flow against a local store.
    Demo {
        /// Persist tickets to this JSON snapshot instead of memory.
        #[arg(long)]
        store: Option<PathBuf>,
        /// Mail relay send URL; notifications are only logged when unset.
        #[arg(long, env = "HELPDESK_MAIL_URL")]
        mail_url: Option<String>,
        #[arg(long, env = "HELPDESK_MAIL_FROM", default_value = "helpdesk@localhost")]
        mail_from: String,
    },
}

/// Merge a remote stage's flags over whatever the config file said.
fn merge_remote(
    base: Option<RemoteModelConfig>,
    url: Option<String>,
    key: Option<String>,
    model: Option<String>,
    default_url: &str,
    default_model: &str,
) -> Option<RemoteModelConfig> {
    if base.is_none() && key.is_none() {
        return None;
    }
    let base = base.unwrap_or_else(|| RemoteModelConfig {
        endpoint: default_url.to_string(),
        api_key: String::new(),
        model: default_model.to_string(),
    });
    Some(RemoteModelConfig {
        endpoint: url.unwrap_or(base.endpoint),
        api_key: key.unwrap_or(base.api_key),
        model: model.unwrap_or(base.model),
    })
}

impl ClassifierArgs {
    fn resolve(self) -> anyhow::Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::from_json_file(path)
                .with_context(|| format!("loading classifier config {}", path.display()))?,
            None => ClassifierConfig::default(),
        };

        if let Some(enabled) = self.keyword_rules {
            config.keyword_rules_enabled = enabled;
        }
        if let Some(ms) = self.stage_timeout_ms {
            config.stage_timeout_ms = ms;
        }
        config.reranker = merge_remote(
            config.reranker,
            self.rerank_url,
            self.rerank_key,
            self.rerank_model,
            DEFAULT_RERANK_URL,
            DEFAULT_RERANK_MODEL,
        );
        config.llm = merge_remote(
            config.llm,
            self.llm_url,
            self.llm_key,
            self.llm_model,
            DEFAULT_LLM_URL,
            DEFAULT_LLM_MODEL,
        );
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("helpdesk v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = cli.classifier.resolve()?;
    let classifier = Classifier::from_config(&config);

    match cli.command {
        Command::Classify { text, json } => {
            let result = classifier.classify(&text).await;
            display::print_result(&result, json)?;
        }
        Command::Batch { file, concurrency } => {
            let input = batch::read_input(&file).await?;
            let stats = batch::run_batch(&classifier, &input, concurrency).await;
            display::print_batch(&stats);
        }
        Command::Demo {
            store,
            mail_url,
            mail_from,
        } => {
            demo::run(classifier, store.as_deref(), mail_url, mail_from).await?;
        }
    }

    Ok(())
}
