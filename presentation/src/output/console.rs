//! Console output formatter for prompt results and jobs

use colored::Colorize;
use std::path::Path;
use tuned_application::PromptResponse;
use tuned_domain::{FineTuningJob, JobStatus};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one prompt/response pair
    pub fn format_response(response: &PromptResponse) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "You:".cyan().bold(), response.prompt));
        match response.response.as_deref() {
            Some(text) => output.push_str(&format!(
                "{} {}\n",
                format!("{}:", response.fine_tuned_model).yellow().bold(),
                text
            )),
            None => output.push_str(&format!("{}\n", "(no response)".dimmed())),
        }

        if let Some(tokens) = response.total_tokens {
            output.push_str(&format!(
                "{}\n",
                format!("[{} tokens, temperature {}]", tokens, response.temperature).dimmed()
            ));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(response: &PromptResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a fine-tuning job status line
    pub fn format_job(job: &FineTuningJob) -> String {
        let status = match job.status {
            JobStatus::Succeeded => job.status.as_str().green().bold(),
            JobStatus::Failed | JobStatus::Cancelled => job.status.as_str().red().bold(),
            _ => job.status.as_str().yellow().bold(),
        };

        let mut output = format!("{} {} {}\n", "Job:".cyan().bold(), job.id, status);
        if let Some(model) = &job.fine_tuned_model {
            output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), model));
        }
        output
    }

    /// Note where a finished session was saved
    pub fn format_saved(path: &Path) -> String {
        format!("{} {}\n", "Context saved:".green().bold(), path.display())
    }
}
