//! CLI entrypoint for tuned-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tuned_application::{
    Agent, AgentManager, ContextParams, FineTuning, FineTuningGateway,
    PromptResponse, RetryingGateway, TrainingDataGenerator,
};
use tuned_domain::{SnapshotRepository, Task};
use tuned_infrastructure::{
    ConfigLoader, FileConfig, JsonSnapshotRepository, JsonlHistoryExporter, JsonlTrainingSink,
    OpenAiGateway,
};
use tuned_presentation::{
    AgentArgs, Cli, Command, ConsoleFormatter, FineTuneCommand, OutputFormat, SessionArgs,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run `tuned-agent --help` for usage.");
    };

    info!("Starting tuned-agent");

    match command {
        Command::Prompt {
            text,
            agent,
            session,
        } => run_prompt(&config, text, agent, session).await,
        Command::Chat {
            agent,
            session,
            resume,
        } => run_chat(&config, agent, session, resume).await,
        Command::GenerateData {
            task,
            data,
            examples,
            model,
            sampling,
            window,
        } => {
            let window =
                NonZeroUsize::new(window).ok_or_else(|| anyhow!("--window must be at least 1"))?;
            let data = match data {
                Some(path) => read_json(&path)?,
                None => serde_json::Value::Null,
            };
            let gateway = completion_gateway(&config)?;
            let generator = TrainingDataGenerator::new(gateway, read_json(&task)?, data)
                .with_model(model.unwrap_or_else(|| config.training.generator_model.clone()));
            let sink = JsonlTrainingSink::new(&config.training.train_dir);

            let count = generator
                .create_examples(
                    examples,
                    sampling.temperature,
                    sampling.max_tokens,
                    window,
                    &sink,
                )
                .await?;
            println!(
                "Generated {} of {} examples in {}",
                count,
                examples,
                sink.train_dir().display()
            );
            Ok(())
        }
        Command::FineTune(command) => run_fine_tune(&config, command).await,
    }
}

async fn run_prompt(
    config: &FileConfig,
    text: String,
    agent: AgentArgs,
    session: SessionArgs,
) -> Result<()> {
    let sampling = agent.sampling;
    let output = session.output;
    let manager = agent_manager(config, &agent, &session)?;

    let (response, saved) = manager
        .run(move |s| {
            Box::pin(async move {
                let response = s
                    .send_prompt(&text, sampling.temperature, sampling.max_tokens)
                    .await?;
                Ok::<_, anyhow::Error>((response, saved_path(s.context())))
            })
        })
        .await?;

    print_response(&response, output);
    if output == OutputFormat::Text {
        print!("{}", ConsoleFormatter::format_saved(&saved));
    }
    Ok(())
}

async fn run_chat(
    config: &FileConfig,
    agent: AgentArgs,
    session: SessionArgs,
    resume: Option<PathBuf>,
) -> Result<()> {
    let sampling = agent.sampling;
    let output = session.output;
    let mut manager = agent_manager(config, &agent, &session)?;

    if let Some(path) = resume {
        let snapshot = JsonSnapshotRepository::new()
            .load(&path)
            .with_context(|| format!("failed to load context {}", path.display()))?;
        info!(
            "Resuming {} with {} turns",
            snapshot.id(),
            snapshot.history().len()
        );
        manager = manager.with_pre_context(snapshot);
    }

    println!("Type a message, or /exit to end the conversation.");

    let saved = manager
        .run(move |s| {
            Box::pin(async move {
                let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
                loop {
                    print!("> ");
                    std::io::stdout().flush()?;

                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line == "/exit" || line == "/quit" {
                        break;
                    }

                    let response = s
                        .send_prompt(line, sampling.temperature, sampling.max_tokens)
                        .await?;
                    print_response(&response, output);
                }
                Ok::<_, anyhow::Error>(saved_path(s.context()))
            })
        })
        .await?;

    println!();
    print!("{}", ConsoleFormatter::format_saved(&saved));
    Ok(())
}

async fn run_fine_tune(config: &FileConfig, command: FineTuneCommand) -> Result<()> {
    let gateway: Arc<dyn FineTuningGateway> = Arc::new(openai_gateway(config)?);

    match command {
        FineTuneCommand::Start {
            task,
            file,
            base_model,
            wait,
        } => {
            let mut fine_tuning = FineTuning::new(gateway, file, read_json(&task)?)?
                .with_base_model(
                    base_model.unwrap_or_else(|| config.training.base_model.clone()),
                );

            let file_id = fine_tuning.upload().await?.to_string();
            let job_id = fine_tuning.start().await?.to_string();
            println!("Uploaded {} and started job {}", file_id, job_id);

            if wait {
                let (policy, _) = config.retry.to_policy();
                let token = CancellationToken::new();
                let on_interrupt = token.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        on_interrupt.cancel();
                    }
                });

                println!("Waiting for {} (Ctrl-C stops waiting)", job_id);
                let Some(status) = fine_tuning
                    .wait_until_cancelled(
                        Duration::from_secs(config.training.poll_interval_secs.max(1)),
                        &policy,
                        &token,
                    )
                    .await?
                else {
                    println!(
                        "Stopped waiting. Check later with `tuned-agent fine-tune status {}`",
                        job_id
                    );
                    return Ok(());
                };
                println!("Job {} finished: {}", job_id, status);
                if let Some(model) = fine_tuning.model().await? {
                    println!("Fine-tuned model: {}", model.name);
                }
            }
            Ok(())
        }
        FineTuneCommand::Status { job } => {
            let job = gateway.retrieve_job(&job).await?;
            print!("{}", ConsoleFormatter::format_job(&job));
            Ok(())
        }
    }
}

fn agent_manager(
    config: &FileConfig,
    agent: &AgentArgs,
    session: &SessionArgs,
) -> Result<AgentManager> {
    let task: Task = read_json(&agent.task)?;
    let model = agent
        .model
        .clone()
        .or_else(|| config.openai.model.clone())
        .ok_or_else(|| anyhow!("No model given. Pass --model or set [openai].model."))?;

    let agent = Agent::from_task(completion_gateway(config)?, model, task)?;
    let params = context_params(config, session)?;
    info!(
        "Agent {} (window {}, contexts in {})",
        agent.model_name(),
        params.max_window,
        params.store_dir.display()
    );

    let mut manager = AgentManager::new(
        Arc::new(agent),
        params,
        Arc::new(JsonSnapshotRepository::new()),
    );

    let export = session
        .export
        .clone()
        .or_else(|| config.context.export_path.clone());
    if let Some(path) = export {
        manager = manager.with_exporter(Arc::new(JsonlHistoryExporter::new(path)));
    }
    Ok(manager)
}

fn context_params(config: &FileConfig, session: &SessionArgs) -> Result<ContextParams> {
    let (mut params, _) = config.context.to_context_params();
    if let Some(dir) = &session.store_dir {
        params = params.with_store_dir(dir.clone());
    }
    if let Some(window) = session.window {
        let window =
            NonZeroUsize::new(window).ok_or_else(|| anyhow!("--window must be at least 1"))?;
        params = params.with_max_window(window);
    }
    Ok(params)
}

fn openai_gateway(config: &FileConfig) -> Result<OpenAiGateway> {
    let gateway = OpenAiGateway::from_env(&config.openai.api_base, &config.openai.api_key_env)?
        .with_timeout(Duration::from_secs(config.openai.timeout_secs))?;
    Ok(gateway)
}

/// OpenAI gateway wrapped in the configured backoff.
fn completion_gateway(config: &FileConfig) -> Result<Arc<RetryingGateway>> {
    let (policy, _) = config.retry.to_policy();
    Ok(Arc::new(RetryingGateway::new(
        Arc::new(openai_gateway(config)?),
        policy,
    )))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn saved_path(snapshot: &tuned_domain::ConversationSnapshot) -> PathBuf {
    snapshot.storage_location().join(snapshot.file_name())
}

fn print_response(response: &PromptResponse, output: OutputFormat) {
    match output {
        OutputFormat::Text => print!("{}", ConsoleFormatter::format_response(response)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(response)),
    }
}
