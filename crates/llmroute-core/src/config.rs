//! Process-wide provider configuration.
//!
//! Loaded once at startup and shared behind an `Arc`. Nothing mutates it
//! afterwards; per-request model overrides are resolved into a local value
//! instead.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Model used when neither `LLM_MODEL` nor the request names one.
pub const DEFAULT_MODEL: &str = "qwen2.5";

/// Base URL of a local Ollama daemon.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Base URL of the hosted OpenAI API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Connect timeout applied to every backend call.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum gap between two reads of a backend body.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Which backend family requests are forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local chat server speaking the Ollama `/api/chat` protocol.
    Ollama,
    /// Any OpenAI-compatible chat-completions endpoint.
    /// `label` is the configured name (`openai` or `compatible`).
    OpenAi { label: String },
    /// Unrecognised name. Kept so that dispatch can report it on every call.
    Unsupported(String),
}

impl ProviderKind {
    /// Parse a provider name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        match lower.as_str() {
            "ollama" => Self::Ollama,
            "openai" | "compatible" => Self::OpenAi { label: lower },
            _ => Self::Unsupported(lower),
        }
    }

    /// Name of the provider as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi { label } => label,
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Static provider configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Base URL of the selected backend. Empty for unsupported providers.
    pub base_url: String,
    pub default_model: String,
    /// Bearer token for OpenAI-compatible backends.
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Local Ollama configuration with default timeouts.
    pub fn ollama(base_url: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Ollama,
            base_url: base_url.into(),
            default_model: default_model.into(),
            api_key: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }

    /// OpenAI-compatible configuration with default timeouts.
    pub fn openai(
        base_url: impl Into<String>,
        default_model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            kind: ProviderKind::OpenAi {
                label: "openai".to_string(),
            },
            api_key,
            ..Self::ollama(base_url, default_model)
        }
    }

    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `LLM_PROVIDER` | `ollama` |
    /// | `LLM_MODEL` | `qwen2.5` |
    /// | `OLLAMA_BASE_URL` | `http://localhost:11434` |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `OPENAI_API_KEY` | empty |
    /// | `LLM_CONNECT_TIMEOUT_SECS` | `10` |
    /// | `LLM_READ_TIMEOUT_SECS` | `300` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let kind = ProviderKind::parse(&var("LLM_PROVIDER", "ollama"));
        let default_model = var("LLM_MODEL", DEFAULT_MODEL);

        let (base_url, api_key) = match &kind {
            ProviderKind::Ollama => (var("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL), None),
            ProviderKind::OpenAi { .. } => (
                var("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                lookup("OPENAI_API_KEY").filter(|key| !key.is_empty()),
            ),
            ProviderKind::Unsupported(_) => (String::new(), None),
        };

        let connect_timeout = parse_secs(
            "LLM_CONNECT_TIMEOUT_SECS",
            lookup("LLM_CONNECT_TIMEOUT_SECS"),
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;
        let read_timeout = parse_secs(
            "LLM_READ_TIMEOUT_SECS",
            lookup("LLM_READ_TIMEOUT_SECS"),
            DEFAULT_READ_TIMEOUT_SECS,
        )?;

        Ok(Self {
            kind,
            base_url,
            default_model,
            api_key,
            connect_timeout,
            read_timeout,
        })
    }

    /// Effective model for one request.
    ///
    /// The override wins when present and non-empty. The configuration
    /// itself is never touched.
    #[must_use]
    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|model| !model.is_empty())
            .unwrap_or(self.default_model.as_str())
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
    }
}
