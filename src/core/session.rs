//! Resolve command-line flags and config file settings into a request session.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::core::config::Config;
use crate::utils::url::{construct_api_url, expand_region};

const QUICK_FIXES: &[&str] = &[
    "arkchat --apikey sk-xxxxxx --endpoint ep-xxxxxx --timeout 180",
    "export ARK_API_KEY=sk-xxxxxx ARK_ENDPOINT_ID=ep-xxxxxx",
];

const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Values supplied on the command line. `None` falls back to the config file.
#[derive(Debug, Default, Clone)]
pub struct SessionOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
}

/// Everything needed to issue chat requests for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct ChatSession {
    pub client: reqwest::Client,
    pub api_key: String,
    /// Endpoint id, sent as the `model` field.
    pub model: String,
    pub chat_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug)]
pub enum SessionError {
    MissingCredentials { missing: Vec<&'static str> },
    InvalidSetting { name: &'static str, message: String },
    Client(reqwest::Error),
}

impl SessionError {
    pub fn quick_fixes(&self) -> &'static [&'static str] {
        match self {
            SessionError::MissingCredentials { .. } => QUICK_FIXES,
            _ => &[],
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingCredentials { missing } => {
                write!(f, "❌ Missing required option(s): {}", missing.join(", "))
            }
            SessionError::InvalidSetting { name, message } => {
                write!(f, "❌ Invalid {name}: {message}")
            }
            SessionError::Client(err) => write!(f, "❌ Failed to create HTTP client: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Client(err) => Some(err),
            _ => None,
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn resolve_session(
    overrides: &SessionOverrides,
    config: &Config,
) -> Result<ChatSession, SessionError> {
    let api_key = non_blank(overrides.api_key.as_ref());
    let endpoint = non_blank(overrides.endpoint.as_ref());

    let (api_key, model) = match (api_key, endpoint) {
        (Some(api_key), Some(endpoint)) => (api_key, endpoint),
        (api_key, endpoint) => {
            let mut missing = Vec::new();
            if api_key.is_none() {
                missing.push("--apikey");
            }
            if endpoint.is_none() {
                missing.push("--endpoint");
            }
            return Err(SessionError::MissingCredentials { missing });
        }
    };

    let timeout_secs = overrides.timeout_secs.unwrap_or(config.timeout_secs());
    if timeout_secs == 0 {
        return Err(SessionError::InvalidSetting {
            name: "timeout",
            message: "must be at least 1 second".to_string(),
        });
    }

    let temperature = overrides.temperature.unwrap_or(config.temperature());
    if !(0.0..=2.0).contains(&temperature) {
        return Err(SessionError::InvalidSetting {
            name: "temperature",
            message: format!("{temperature} is outside 0.0..=2.0"),
        });
    }

    let max_tokens = overrides.max_tokens.unwrap_or(config.max_tokens());
    if max_tokens == 0 {
        return Err(SessionError::InvalidSetting {
            name: "max tokens",
            message: "must be greater than zero".to_string(),
        });
    }

    let region = non_blank(overrides.region.as_ref()).unwrap_or_else(|| config.region().to_string());
    let template = overrides
        .base_url
        .as_deref()
        .unwrap_or(config.base_url_template());
    let chat_url = construct_api_url(&expand_region(template, &region), "chat/completions");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_idle_timeout(IDLE_CONNECTION_TIMEOUT)
        .build()
        .map_err(SessionError::Client)?;

    debug!(%chat_url, %model, timeout_secs, max_tokens, temperature, "resolved chat session");

    Ok(ChatSession {
        client,
        api_key,
        model,
        chat_url,
        max_tokens,
        temperature,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> SessionOverrides {
        SessionOverrides {
            api_key: Some("sk-test".to_string()),
            endpoint: Some("ep-123".to_string()),
            ..SessionOverrides::default()
        }
    }

    #[test]
    fn defaults_build_regional_endpoint() {
        let session = resolve_session(&overrides(), &Config::default()).expect("session");
        assert_eq!(
            session.chat_url,
            "https://ark.cn-beijing.volces.com/api/v3/chat/completions"
        );
        assert_eq!(session.model, "ep-123");
        assert_eq!(session.timeout_secs, 120);
        assert_eq!(session.max_tokens, 2000);
    }

    #[test]
    fn flags_override_config_file() {
        let config = Config {
            region: Some("cn-shanghai".to_string()),
            timeout_secs: Some(60),
            ..Config::default()
        };
        let mut flags = overrides();
        flags.region = Some("ap-southeast-1".to_string());

        let session = resolve_session(&flags, &config).expect("session");
        assert_eq!(
            session.chat_url,
            "https://ark.ap-southeast-1.volces.com/api/v3/chat/completions"
        );
        assert_eq!(session.timeout_secs, 60);
    }

    #[test]
    fn missing_credentials_are_reported_together() {
        let flags = SessionOverrides {
            api_key: Some("   ".to_string()),
            ..SessionOverrides::default()
        };

        let err = resolve_session(&flags, &Config::default()).expect_err("must fail");
        match &err {
            SessionError::MissingCredentials { missing } => {
                assert_eq!(missing, &vec!["--apikey", "--endpoint"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.quick_fixes().is_empty());
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut flags = overrides();
        flags.timeout_secs = Some(0);
        assert!(matches!(
            resolve_session(&flags, &Config::default()),
            Err(SessionError::InvalidSetting { name: "timeout", .. })
        ));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut flags = overrides();
        flags.temperature = Some(3.5);
        assert!(matches!(
            resolve_session(&flags, &Config::default()),
            Err(SessionError::InvalidSetting { name: "temperature", .. })
        ));
    }

    #[test]
    fn custom_base_url_template_is_expanded() {
        let mut flags = overrides();
        flags.base_url = Some("http://localhost:8080/{region}/v3/".to_string());
        let session = resolve_session(&flags, &Config::default()).expect("session");
        assert_eq!(
            session.chat_url,
            "http://localhost:8080/cn-beijing/v3/chat/completions"
        );
    }
}
