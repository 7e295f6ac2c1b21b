//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for prompt results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable
    Text,
    /// The raw response object as JSON
    Json,
}

/// CLI arguments for tuned-agent
#[derive(Parser, Debug)]
#[command(name = "tuned-agent")]
#[command(author, version, about = "Task-specialised LLM agents with persisted conversation history")]
#[command(long_about = r#"
tuned-agent talks to task-specialised (optionally fine-tuned) chat models.

Every conversation runs in a session. A session that ends normally is saved
as <store-dir>/context_<id>.json; a session that fails saves nothing.

Configuration files are loaded from (in priority order):
1. TUNED_* environment variables (e.g. TUNED_CONTEXT__MAX_WINDOW=5)
2. --config <path>       Explicit config file
3. ./tuned-agent.toml    Project-level config
4. ~/.config/tuned-agent/config.toml   Global config

Example:
  tuned-agent prompt --task task.json "Summarise this contract"
  tuned-agent chat --task task.json -m ft:gpt-3.5-turbo:acme::abc123
  tuned-agent generate-data --task task.json --data samples.json -n 50
  tuned-agent fine-tune start --task task.json --file data/train/train_x.jsonl --wait
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a single prompt in a new session
    Prompt {
        /// The prompt text
        text: String,

        #[command(flatten)]
        agent: AgentArgs,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Interactive conversation; the session is saved when input ends
    Chat {
        #[command(flatten)]
        agent: AgentArgs,

        #[command(flatten)]
        session: SessionArgs,

        /// Continue the conversation stored in this snapshot file
        #[arg(long, value_name = "PATH")]
        resume: Option<PathBuf>,
    },

    /// Generate fine-tuning samples for a task
    GenerateData {
        /// Task description file (JSON)
        #[arg(long, value_name = "PATH")]
        task: PathBuf,

        /// Reference data embedded in the generator prompt (JSON)
        #[arg(long, value_name = "PATH")]
        data: Option<PathBuf>,

        /// Number of samples to request
        #[arg(short = 'n', long, default_value_t = 10)]
        examples: usize,

        /// Generator model (overrides [training].generator_model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Turns of generator conversation sent with each request
        #[arg(long, default_value_t = 8)]
        window: usize,
    },

    /// Manage fine-tuning jobs
    #[command(subcommand)]
    FineTune(FineTuneCommand),
}

#[derive(Subcommand, Debug)]
pub enum FineTuneCommand {
    /// Upload a training file and start a job
    Start {
        /// Task the model is trained for (JSON)
        #[arg(long, value_name = "PATH")]
        task: PathBuf,

        /// Training file (JSONL, at most 512MB)
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// Base model (overrides [training].base_model)
        #[arg(long, value_name = "MODEL")]
        base_model: Option<String>,

        /// Wait for the job to finish
        #[arg(long)]
        wait: bool,
    },

    /// Show the status of a job
    Status {
        /// Job id returned by `fine-tune start`
        job: String,
    },
}

/// Which model and task back the agent
#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Task description file (JSON with backstory, short_backstory, role, goal)
    #[arg(long, value_name = "PATH")]
    pub task: PathBuf,

    /// Model name (overrides [openai].model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    #[command(flatten)]
    pub sampling: SamplingArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct SamplingArgs {
    /// Sampling temperature (0 to 2)
    #[arg(short, long, default_value_t = 0.5)]
    pub temperature: f32,

    /// Maximum tokens per response
    #[arg(long, default_value_t = 1000)]
    pub max_tokens: u32,
}

/// Where and how the conversation is kept
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Snapshot directory (overrides [context].store_dir)
    #[arg(long, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Turns sent with each prompt (overrides [context].max_window)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Append the finished conversation to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
