use clap::Parser;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use crate::llm::LlmConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the Ollama API (e.g., http://localhost:11434)
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = "http://localhost:11434")]
    pub base_url: String,

    /// Model name used for every chat request
    #[arg(long, env = "CHAT_MODEL", default_value = "SpeakLeash/bielik-11b-v2.2-instruct:Q4_K_M")]
    pub model: String,

    /// Request timeout in seconds. Streams apply it per read, not to the whole body.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "300")]
    pub timeout_secs: u64,

    /// Overrides the system prompt baked into the demos that use one.
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Which demo to run (all, basic, system-prompt, conversation, models, stream, manager, interactive)
    #[arg(long, env = "DEMO", default_value = "all")]
    pub demo: Demo,
}

impl Args {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig::new(self.base_url.clone())
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    All,
    Basic,
    SystemPrompt,
    Conversation,
    Models,
    Stream,
    Manager,
    Interactive,
}

impl Demo {
    /// The demos `all` expands to, in run order. Interactive is never part of it.
    pub const SCRIPTED: [Demo; 6] = [
        Demo::Basic,
        Demo::SystemPrompt,
        Demo::Conversation,
        Demo::Models,
        Demo::Stream,
        Demo::Manager,
    ];

    pub fn expand(self) -> Vec<Demo> {
        match self {
            Demo::All => Self::SCRIPTED.to_vec(),
            other => vec![other],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseDemoError {
    message: String,
}

impl fmt::Display for ParseDemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseDemoError {}

impl FromStr for Demo {
    type Err = ParseDemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Demo::All),
            "basic" => Ok(Demo::Basic),
            "system-prompt" => Ok(Demo::SystemPrompt),
            "conversation" => Ok(Demo::Conversation),
            "models" => Ok(Demo::Models),
            "stream" => Ok(Demo::Stream),
            "manager" => Ok(Demo::Manager),
            "interactive" => Ok(Demo::Interactive),
            _ =>
                Err(ParseDemoError {
                    message: format!("Invalid demo: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Demo::All => "all",
            Demo::Basic => "basic",
            Demo::SystemPrompt => "system-prompt",
            Demo::Conversation => "conversation",
            Demo::Models => "models",
            Demo::Stream => "stream",
            Demo::Manager => "manager",
            Demo::Interactive => "interactive",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_names_round_trip() {
        for demo in Demo::SCRIPTED.iter().chain([Demo::All, Demo::Interactive].iter()) {
            assert_eq!(demo.to_string().parse::<Demo>(), Ok(*demo));
        }
        assert_eq!("STREAM".parse::<Demo>(), Ok(Demo::Stream));
        assert!("karaoke".parse::<Demo>().is_err());
    }

    #[test]
    fn all_expands_to_scripted_demos() {
        assert_eq!(Demo::All.expand(), Demo::SCRIPTED.to_vec());
        assert_eq!(Demo::Models.expand(), vec![Demo::Models]);
    }

    #[test]
    fn args_build_llm_config() {
        let args = Args::parse_from([
            "bielik-chat",
            "--base-url",
            "http://10.0.0.5:11434",
            "--timeout-secs",
            "30",
            "--demo",
            "models",
        ]);
        let config = args.llm_config();
        assert_eq!(config.base_url, "http://10.0.0.5:11434");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(args.demo, Demo::Models);
    }
}
