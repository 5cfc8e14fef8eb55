use serde::{Deserialize, Serialize};

/// Who is expected to execute a setup step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunAs {
    /// Safe for an automation caller to run unattended.
    Agent,
    /// Needs interactive credential entry; never auto-execute.
    Human,
}

/// A substring to look for in a step's output and what finding it means.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputPattern {
    pub pattern: String,
    pub meaning: String,
}

impl OutputPattern {
    pub fn new(pattern: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            meaning: meaning.into(),
        }
    }
}

/// One entry of the machine-readable setup checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupStep {
    /// 1-based position in [`SetupPlan::steps`].
    #[serde(rename = "step")]
    pub step_number: u32,
    pub name: String,
    pub description: String,
    pub run_as: RunAs,
    /// Shell command that performs the step.
    pub command: String,
    /// Shell command whose zero exit status means the step is already done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip_if_check_passes: bool,
    /// zsh-specific form of [`Self::command`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_zsh: Option<String>,
    /// bash-specific form of [`Self::command`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_bash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Command that confirms the step worked once it has been run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub success_patterns: Vec<OutputPattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failure_patterns: Vec<OutputPattern>,
}

impl SetupStep {
    /// A step with only the required fields set.
    pub fn new(
        step_number: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        run_as: RunAs,
        command: impl Into<String>,
    ) -> Self {
        Self {
            step_number,
            name: name.into(),
            description: description.into(),
            run_as,
            command: command.into(),
            check: None,
            skip_if_check_passes: false,
            command_zsh: None,
            command_bash: None,
            note: None,
            verify: None,
            success_patterns: Vec::new(),
            failure_patterns: Vec::new(),
        }
    }
}

/// Connectivity check to run before any step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preflight {
    pub description: String,
    pub command: String,
    pub expected: String,
    pub on_failure: String,
}

/// Final end-to-end check once every step has run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verification {
    pub command: String,
    pub expected: String,
}

/// How to use the machine once setup is complete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub first_deploy: String,
    pub subsequent: String,
    pub app_url_pattern: String,
}

/// Configuration values the plan was rendered with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanConfig {
    pub domain: String,
    pub tailscale_ip: String,
    pub ssh_port: String,
    pub github_repo: String,
    pub remote_user: Option<String>,
}

/// Machine-consumable setup plan served at `/setup/agent`.
///
/// Recomputed on every request; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupPlan {
    pub instructions: String,
    pub config: PlanConfig,
    pub preflight: Preflight,
    pub steps: Vec<SetupStep>,
    pub verification: Verification,
    pub usage: Usage,
}

impl SetupPlan {
    /// Steps an automation caller must hand to a person.
    pub fn human_steps(&self) -> impl Iterator<Item = &SetupStep> {
        self.steps.iter().filter(|s| s.run_as == RunAs::Human)
    }

    /// Steps an automation caller may run unattended.
    pub fn agent_steps(&self) -> impl Iterator<Item = &SetupStep> {
        self.steps.iter().filter(|s| s.run_as == RunAs::Agent)
    }
}
