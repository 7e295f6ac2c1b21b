//! Prompt templates built from a task description

use crate::core::task::Task;

/// Templates for agent and training-data prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for an agent specialised in `task`
    pub fn agent_system(task: &Task) -> String {
        format!(
            "{}.\n{{'your_role': {}, 'your_goal': {}}}\n",
            task.short_backstory, task.role, task.goal
        )
    }

    /// System prompt for the model that generates fine-tuning samples
    pub fn training_data_system(task: &Task, data: &serde_json::Value) -> String {
        let description = serde_json::json!({
            "backstory": task.backstory,
            "role": task.role,
            "goal": task.goal,
            "data": data,
        });

        format!(
            r#"You are generating data which will be used to train a machine learning model.
You will be given a high-level description of the model to train as a JSON object with the keys
`backstory`, `role`, `goal` and `data`.
From that description, generate data samples, each one a prompt/response pair. Reply with exactly one
JSON object per turn and nothing else:
{{"prompt": "<prompt goes here>", "response": "<response goes here>"}}
Each turn, make the sample slightly more complex than the previous one while keeping the samples diverse.
Here is the high-level description:
{}"#,
            description
        )
    }

    /// User prompt asking the generator for the next sample
    pub fn training_data_next(index: usize) -> String {
        format!("Generate sample #{}.", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new("Long backstory", "Short backstory", "Test role", "Test goal")
    }

    #[test]
    fn test_agent_system_contains_task_fields() {
        let prompt = PromptTemplate::agent_system(&task());
        assert!(prompt.starts_with("Short backstory."));
        assert!(prompt.contains("'your_role': Test role"));
        assert!(prompt.contains("'your_goal': Test goal"));
        assert!(!prompt.contains("Long backstory"));
    }

    #[test]
    fn test_training_data_system_embeds_description() {
        let data = serde_json::json!({"key": "value"});
        let prompt = PromptTemplate::training_data_system(&task(), &data);
        assert!(prompt.contains("Long backstory"));
        assert!(prompt.contains("Test role"));
        assert!(prompt.contains(r#""key":"value""#));
        assert!(prompt.contains(r#"{"prompt": "#));
    }

    #[test]
    fn test_training_data_next_is_one_based() {
        assert_eq!(PromptTemplate::training_data_next(0), "Generate sample #1.");
    }
}
