//! llm-fanout - compare several LLMs on one prompt
//!
//! `llm-fanout models` lists the gateway's catalog, `llm-fanout compare`
//! runs a prompt against a set of models and reports answers, tokens and
//! cost per model.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use llm_fanout::utils::logging::{LogLevel, LoggingUtils};
use llm_fanout::{
    Comparison, ComparisonRequest, CompletionParams, Config, CorrelatedResults, FailurePolicy,
    FanOutCoordinator, ModelCatalog, OpenRouterClient, RoundOutcome, sort_by_name,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "llm-fanout", version, long_version = llm_fanout::LONG_VERSION)]
#[command(about = "Send one prompt to several LLMs at once and compare answers and cost", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "LLM_FANOUT_CONFIG")]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the models offered by the gateway
    Models {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one prompt against several models
    Compare {
        /// Model id, repeatable (e.g. -m openai/gpt-4o -m anthropic/claude-3.5-sonnet)
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// System prompt
        #[arg(short, long, default_value = "")]
        system: String,

        #[arg(short, long, default_value_t = 0.0)]
        temperature: f64,

        /// Max completion tokens
        #[arg(long, default_value_t = 2048)]
        max_tokens: u32,

        /// Stop at the first failing model
        #[arg(long)]
        fail_fast: bool,

        /// Write the results as JSON; a directory gets a timestamped file name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// User input sent to every model
        input: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggingUtils::init_logger(cli.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    debug!(build = %llm_fanout::build_info(), "Starting llm-fanout");
    let config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    let client = Arc::new(OpenRouterClient::from_config(&config)?);

    match cli.command {
        Commands::Models { json } => list_models(client.as_ref(), json).await,
        Commands::Compare {
            models,
            system,
            temperature,
            max_tokens,
            fail_fast,
            output,
            input,
        } => {
            let mut dispatch = config.dispatch.clone();
            if fail_fast {
                dispatch.failure_policy = FailurePolicy::FailFast;
            }

            let catalog = client
                .fetch_models()
                .await
                .context("Could not load the model catalog")?;
            let params = CompletionParams::new(system, input)
                .with_temperature(temperature)
                .with_max_tokens(max_tokens);
            let request = ComparisonRequest::from_catalog(&catalog, &models, params)?;

            let cancellation = CancellationToken::new();
            let on_interrupt = cancellation.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling requests still in flight");
                    on_interrupt.cancel();
                }
            });

            let coordinator = FanOutCoordinator::new(dispatch).with_cancellation(cancellation);
            let comparison = Comparison::new(client).with_coordinator(coordinator);
            let results = comparison.run(&request).await?;

            print_results(&results);

            if let Some(output) = output {
                let path = write_export(&results, &output).await?;
                println!("\nResults written to {}", path.display());
            }
            Ok(())
        }
    }
}

async fn list_models(catalog: &OpenRouterClient, json: bool) -> Result<()> {
    let mut models = catalog.fetch_models().await?;
    sort_by_name(&mut models);

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    for model in &models {
        println!("{}", model);
        println!(
            "    prompt ${}/token, completion ${}/token, context {}, max completion {}, tokenizer {}, instruct {}",
            model.pricing_prompt,
            model.pricing_completion,
            model.context_length,
            optional(model.max_completion_tokens),
            model.tokenizer,
            model.instruct_type.as_deref().unwrap_or("-"),
        );
    }
    info!(models = models.len(), "Catalog listed");
    Ok(())
}

fn print_results(results: &CorrelatedResults) {
    for outcome in results.outcomes() {
        println!("=== {} ===", outcome.model);

        match outcome.completion {
            RoundOutcome::Succeeded(response) => {
                println!("{}", response.response.trim());
                println!(
                    "-- elapsed {}",
                    LoggingUtils::format_duration(response.elapsed)
                );
            }
            RoundOutcome::Failed(error) => println!("!! completion failed: {}", error),
            RoundOutcome::NotAttempted => {}
        }

        match outcome.cost_and_stats {
            RoundOutcome::Succeeded(stats) => println!(
                "-- GPT tokens {} ({} in / {} out), native tokens {} ({} in / {} out), cost ${:.6}",
                stats.gpt_tokens_total(),
                stats.gpt_tokens_prompt,
                stats.gpt_tokens_completion,
                stats.native_tokens_total(),
                stats.native_tokens_prompt,
                stats.native_tokens_completion,
                stats.cost,
            ),
            RoundOutcome::Failed(error) => println!("!! cost and stats unavailable: {}", error),
            RoundOutcome::NotAttempted => {}
        }
        println!();
    }

    println!("Total cost: ${:.6}", results.total_cost());
}

async fn write_export(results: &CorrelatedResults, output: &Path) -> Result<PathBuf> {
    let path = if output.is_dir() {
        output.join(export_file_name())
    } else {
        output.to_path_buf()
    };

    let document = serde_json::to_string_pretty(&results.to_export_json()?)?;
    tokio::fs::write(&path, document)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn export_file_name() -> String {
    format!(
        "llm-comparison-{}.json",
        chrono::Local::now().format("%Y-%m-%d-%H-%M-%S")
    )
}

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
