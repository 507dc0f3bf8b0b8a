use crate::call::{CallConfig, VoiceSettings, FALLBACK_REPLY};
use crate::http::UpstreamConfig;
use crate::speech::RecognitionOptions;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `INTERVIEW_VOICE__SERVICE__HTTP__PORT=8080`
pub const ENV_PREFIX: &str = "INTERVIEW_VOICE";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub completion: CompletionConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub voice: VoiceSettings,
    #[serde(default)]
    pub call: CallSection,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CompletionConfig {
    /// URL of the chat relay
    pub endpoint: String,
    /// Per-turn limit; 0 disables it
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CallSection {
    pub opening_delay_ms: u64,
    pub language: String,
    pub fallback_reply: String,
}

impl Default for CallSection {
    fn default() -> Self {
        Self {
            opening_delay_ms: 1000,
            language: "en-US".to_string(),
            fallback_reply: FALLBACK_REPLY.to_string(),
        }
    }
}

impl CompletionConfig {
    /// Per-turn limit, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Call settings derived from the `[call]`, `[voice]` and `[completion]` sections
    pub fn call_config(&self) -> CallConfig {
        CallConfig {
            opening_delay: Duration::from_millis(self.call.opening_delay_ms),
            completion_timeout: self.completion.timeout(),
            fallback_reply: self.call.fallback_reply.clone(),
            recognition: RecognitionOptions {
                language: self.call.language.clone(),
                ..RecognitionOptions::default()
            },
            voice: self.voice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_file_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("voice.toml");
        fs::write(
            &path,
            r#"
[service]
name = "interview-voice"

[service.http]
bind = "127.0.0.1"
port = 3000

[completion]
endpoint = "http://127.0.0.1:3000/api/chat"
timeout_secs = 0
"#,
        )?;

        let cfg = Config::load(path.to_str().unwrap())?;
        assert_eq!(cfg.service.http.port, 3000);
        assert_eq!(cfg.upstream.max_tokens, 150);
        assert_eq!(cfg.voice.rate, 0.9);

        assert_eq!(cfg.completion.timeout(), None);

        let call = cfg.call_config();
        assert_eq!(call.opening_delay, Duration::from_secs(1));
        assert_eq!(call.completion_timeout, None);
        assert_eq!(call.recognition.language, "en-US");
        assert!(call.recognition.continuous);
        Ok(())
    }

    #[test]
    fn test_completion_timeout_in_seconds() {
        let completion = CompletionConfig {
            endpoint: "http://127.0.0.1:3000/api/chat".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(completion.timeout(), Some(Duration::from_secs(30)));
    }
}
