//! CLI definitions for the `legalchat` binary.
//!
//! Agent settings are global flags with environment fallbacks, so both
//! `legalchat chat` and `legalchat serve` share them.

pub mod chat;

use clap::{Args, Parser, Subcommand, ValueEnum};

use legalchat_types::config::{
    AgentSettings, DEFAULT_MAX_SESSIONS, DEFAULT_MAX_STEPS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_SEARCH_MAX_RESULTS, DEFAULT_SESSION_IDLE_SECS,
    DEFAULT_TAVILY_BASE_URL, DEFAULT_TEMPERATURE, PromptPlacement,
};

/// Legal Q&A assistant backed by a chat model and web search.
#[derive(Parser)]
#[command(name = "legalchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logs (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry. Spans are printed to stdout, so
    /// pair this with `serve` rather than the interactive chat.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub agent: AgentArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive question/answer session in the terminal (default).
    Chat,

    /// Start the HTTP API.
    Serve {
        /// Address to bind.
        #[arg(long, env = "LEGALCHAT_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, env = "LEGALCHAT_PORT", default_value_t = 8000)]
        port: u16,

        /// Most conversation sessions kept in memory.
        #[arg(long, env = "LEGALCHAT_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
        max_sessions: usize,

        /// Seconds of inactivity after which a session is dropped.
        #[arg(long, env = "LEGALCHAT_SESSION_IDLE_SECS", default_value_t = DEFAULT_SESSION_IDLE_SECS)]
        session_idle_secs: u64,
    },
}

/// Where the instruction prompt goes in the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlacementArg {
    System,
    HumanMessage,
}

impl From<PlacementArg> for PromptPlacement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::System => PromptPlacement::System,
            PlacementArg::HumanMessage => PromptPlacement::HumanMessage,
        }
    }
}

#[derive(Args)]
pub struct AgentArgs {
    /// Chat model identifier.
    #[arg(long, global = true, env = "LEGALCHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature.
    #[arg(long, global = true, env = "LEGALCHAT_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Completion token budget per model call.
    #[arg(long, global = true, env = "LEGALCHAT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Search results handed to the model per search.
    #[arg(long, global = true, env = "LEGALCHAT_SEARCH_MAX_RESULTS", default_value_t = DEFAULT_SEARCH_MAX_RESULTS)]
    pub search_max_results: u32,

    /// Maximum model calls per question.
    #[arg(long, global = true, env = "LEGALCHAT_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: u32,

    #[arg(long, global = true, env = "LEGALCHAT_OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, global = true, env = "LEGALCHAT_TAVILY_BASE_URL", default_value = DEFAULT_TAVILY_BASE_URL)]
    pub tavily_base_url: String,

    /// Send the instruction prompt as a system message or as a leading user message.
    #[arg(long, global = true, value_enum, default_value_t = PlacementArg::System)]
    pub prompt_placement: PlacementArg,
}

impl AgentArgs {
    pub fn settings(&self) -> AgentSettings {
        AgentSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            search_max_results: self.search_max_results,
            max_steps: self.max_steps,
            openai_base_url: self.openai_base_url.clone(),
            tavily_base_url: self.tavily_base_url.clone(),
            prompt_placement: self.prompt_placement.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["legalchat"]).unwrap();
        assert!(cli.command.is_none());

        let settings = cli.agent.settings();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(settings.prompt_placement, PromptPlacement::System);
    }

    #[test]
    fn test_serve_with_flags() {
        let cli = Cli::try_parse_from([
            "legalchat",
            "-vv",
            "serve",
            "--port",
            "9000",
            "--model",
            "gpt-4o-mini",
            "--prompt-placement",
            "human-message",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.agent.model, "gpt-4o-mini");
        assert_eq!(
            cli.agent.settings().prompt_placement,
            PromptPlacement::HumanMessage
        );
        match cli.command {
            Some(Commands::Serve {
                port, max_sessions, ..
            }) => {
                assert_eq!(port, 9000);
                assert_eq!(max_sessions, DEFAULT_MAX_SESSIONS);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_session_limit_flags() {
        let cli = Cli::try_parse_from([
            "legalchat",
            "serve",
            "--max-sessions",
            "50",
            "--session-idle-secs",
            "120",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve {
                max_sessions,
                session_idle_secs,
                ..
            }) => {
                assert_eq!(max_sessions, 50);
                assert_eq!(session_idle_secs, 120);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_otel_help_warns_about_stdout() {
        let command = <Cli as clap::CommandFactory>::command();
        let otel = command
            .get_arguments()
            .find(|arg| arg.get_id() == "otel")
            .unwrap();
        let help = otel.get_help().unwrap().to_string();
        assert!(help.contains("stdout"));
        assert!(help.contains("serve"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
