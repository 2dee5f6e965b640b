//! The two AI configuration documents.
//!
//! `ai-config.json` holds the provider settings and feature switches;
//! `ai-prompts.json` holds the editable prompt text. Both live in the
//! config directory. Reads never fail: a missing, unparsable or invalid
//! document falls back to the built-in default. Writes validate first.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AiError, ConfigError};

pub const CONFIG_FILE: &str = "ai-config.json";
pub const PROMPTS_FILE: &str = "ai-prompts.json";

// ============================================================================
// PROVIDER CONFIG
// ============================================================================

/// Language-model provider. All of them speak the chat-completions protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    OpenAi,
    OpenRouter,
    Groq,
    /// Any compatible endpoint; `base_url` is required.
    Custom,
}

impl Provider {
    pub fn default_base_url(self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("https://api.openai.com/v1"),
            Provider::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Provider::Groq => Some("https://api.groq.com/openai/v1"),
            Provider::Custom => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::OpenRouter => "openai/gpt-4o-mini",
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::Custom => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    DnsVerification,
    ChatTest,
}

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::DnsVerification => "DNS verification",
            Feature::ChatTest => "chat test",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiFeatures {
    #[serde(default = "default_true")]
    pub dns_verification: bool,
    #[serde(default = "default_true")]
    pub chat_test: bool,
}

impl Default for AiFeatures {
    fn default() -> Self {
        Self {
            dns_verification: true,
            chat_test: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    /// Overrides the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub features: AiFeatures,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            api_key: String::new(),
            model: Provider::OpenAi.default_model().to_string(),
            base_url: None,
            enabled: false,
            features: AiFeatures::default(),
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::Invalid(format!(
                    "base_url must be an http(s) URL: {}",
                    url
                )));
            }
        }
        if self.provider == Provider::Custom && self.base_url.is_none() {
            return Err(ConfigError::Invalid(
                "base_url is required for a custom provider".into(),
            ));
        }
        if self.enabled {
            if self.api_key.trim().is_empty() {
                return Err(ConfigError::Invalid("api_key is required when AI is enabled".into()));
            }
            if self.model.trim().is_empty() {
                return Err(ConfigError::Invalid("model is required when AI is enabled".into()));
            }
        }
        Ok(())
    }

    /// Chat-completions base URL without a trailing slash.
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .or(self.provider.default_base_url())
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string()
    }

    /// Fail unless AI as a whole and `feature` in particular are switched on.
    pub fn require(&self, feature: Feature) -> Result<(), AiError> {
        if !self.enabled {
            return Err(AiError::Disabled("AI features are turned off".into()));
        }
        let on = match feature {
            Feature::DnsVerification => self.features.dns_verification,
            Feature::ChatTest => self.features.chat_test,
        };
        if on {
            Ok(())
        } else {
            Err(AiError::Disabled(feature.name().into()))
        }
    }

    /// Copy with the API key masked down to its last four characters.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.api_key = mask_key(&self.api_key);
        copy
    }

    /// Keep `previous`'s key when this config carries no key or a masked one.
    pub fn keep_secret_from(mut self, previous: &AiConfig) -> Self {
        if self.api_key.is_empty() || self.api_key == mask_key(&previous.api_key) {
            self.api_key = previous.api_key.clone();
        }
        self
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

// ============================================================================
// PROMPTS
// ============================================================================

pub const DEFAULT_DNS_PROMPT: &str = "\
You are an email deliverability expert. Check the DNS records of the sending domain {{domain}}.

SPF records (TXT at {{domain}}):
{{spf_records}}

DKIM records (TXT at daybuu._domainkey.{{domain}}):
{{dkim_records}}

DMARC records (TXT at _dmarc.{{domain}}):
{{dmarc_records}}

Expected DKIM public key:
{{dkim_public_key}}

Rules:
- SPF is verified when a record starts with v=spf1 and authorizes our sending servers.
- DKIM is verified when a record contains p= with exactly the expected public key.
- DMARC is verified when a record starts with v=DMARC1 and has a p= policy.
- Use not-found when no record of that kind exists, unverified when one exists but is wrong.

Answer with JSON only: {\"spfStatus\": \"verified|unverified|not-found\", \"dkimStatus\": \"...\", \"dmarcStatus\": \"...\", \"analysis\": \"short explanation\"}";

pub const DEFAULT_CHAT_PROMPT: &str =
    "You are the assistant of an email marketing dashboard. Answer briefly and helpfully.";

/// Placeholders the DNS prompt may use.
pub const DNS_PLACEHOLDERS: [&str; 5] = [
    "domain",
    "spf_records",
    "dkim_records",
    "dmarc_records",
    "dkim_public_key",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPrompts {
    #[serde(default = "default_dns_prompt")]
    pub dns_verification: String,
    #[serde(default = "default_chat_prompt")]
    pub chat_system: String,
}

fn default_dns_prompt() -> String {
    DEFAULT_DNS_PROMPT.to_string()
}

fn default_chat_prompt() -> String {
    DEFAULT_CHAT_PROMPT.to_string()
}

impl Default for AiPrompts {
    fn default() -> Self {
        Self {
            dns_verification: default_dns_prompt(),
            chat_system: default_chat_prompt(),
        }
    }
}

impl AiPrompts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dns_verification.trim().is_empty() {
            return Err(ConfigError::Invalid("DNS prompt cannot be empty".into()));
        }
        if self.chat_system.trim().is_empty() {
            return Err(ConfigError::Invalid("chat prompt cannot be empty".into()));
        }
        if !self.dns_verification.contains("{{domain}}") {
            return Err(ConfigError::Invalid(
                "DNS prompt must reference {{domain}}".into(),
            ));
        }
        Ok(())
    }
}

/// Replace every `{{key}}` with its value. Unknown placeholders are left as is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    out
}

// ============================================================================
// FILE STORE
// ============================================================================

/// Reads and writes the two documents in one directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn prompts_path(&self) -> PathBuf {
        self.dir.join(PROMPTS_FILE)
    }

    pub fn load_config(&self) -> AiConfig {
        let path = self.config_path();
        match read_document::<AiConfig>(&path).and_then(|c| c.validate().map(|_| c)) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default AI config");
                AiConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: &AiConfig) -> Result<(), ConfigError> {
        config.validate()?;
        write_document(&self.config_path(), config)
    }

    pub fn load_prompts(&self) -> AiPrompts {
        let path = self.prompts_path();
        match read_document::<AiPrompts>(&path).and_then(|p| p.validate().map(|_| p)) {
            Ok(prompts) => prompts,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default AI prompts");
                AiPrompts::default()
            }
        }
    }

    pub fn save_prompts(&self, prompts: &AiPrompts) -> Result<(), ConfigError> {
        prompts.validate()?;
        write_document(&self.prompts_path(), prompts)
    }

    /// Write default documents. Existing files are kept unless `force`.
    /// Returns the paths that were written.
    pub fn init(&self, force: bool) -> Result<Vec<PathBuf>, ConfigError> {
        let mut written = Vec::new();
        if force || !self.config_path().exists() {
            self.save_config(&AiConfig::default())?;
            written.push(self.config_path());
        }
        if force || !self.prompts_path().exists() {
            self.save_prompts(&AiPrompts::default())?;
            written.push(self.prompts_path());
        }
        Ok(written)
    }
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json + "\n")?;
    info!(path = %path.display(), "wrote AI settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_config() -> AiConfig {
        AiConfig {
            api_key: "sk-test-123456".into(),
            enabled: true,
            ..AiConfig::default()
        }
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.load_config(), AiConfig::default());
        assert_eq!(store.load_prompts(), AiPrompts::default());
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        fs::write(store.config_path(), "{ not json").unwrap();
        fs::write(store.prompts_path(), r#"{"dns_verification": "no placeholder"}"#).unwrap();
        assert_eq!(store.load_config(), AiConfig::default());
        assert_eq!(store.load_prompts(), AiPrompts::default());
    }

    #[test]
    fn test_save_validates_then_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested"));

        let bad = AiConfig {
            enabled: true,
            ..AiConfig::default()
        };
        assert!(matches!(store.save_config(&bad), Err(ConfigError::Invalid(_))));
        assert!(!store.config_path().exists());

        store.save_config(&enabled_config()).unwrap();
        assert_eq!(store.load_config(), enabled_config());
    }

    #[test]
    fn test_init_keeps_existing_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.init(false).unwrap().len(), 2);
        store.save_config(&enabled_config()).unwrap();
        assert!(store.init(false).unwrap().is_empty());
        assert!(store.load_config().enabled);
        store.init(true).unwrap();
        assert!(!store.load_config().enabled);
    }

    #[test]
    fn test_require_feature() {
        let mut config = enabled_config();
        assert!(config.require(Feature::ChatTest).is_ok());
        config.features.chat_test = false;
        assert!(matches!(config.require(Feature::ChatTest), Err(AiError::Disabled(_))));
        config.enabled = false;
        assert!(matches!(
            config.require(Feature::DnsVerification),
            Err(AiError::Disabled(_))
        ));
    }

    #[test]
    fn test_redaction_and_secret_merge() {
        let config = enabled_config();
        let shown = config.redacted();
        assert_eq!(shown.api_key, "****3456");

        let edited = AiConfig {
            model: "gpt-4o".into(),
            ..shown
        };
        let merged = edited.keep_secret_from(&config);
        assert_eq!(merged.api_key, "sk-test-123456");
        assert_eq!(merged.model, "gpt-4o");
    }

    #[test]
    fn test_endpoint_and_render() {
        let mut config = AiConfig::default();
        assert_eq!(config.endpoint(), "https://api.openai.com/v1");
        config.base_url = Some("http://localhost:11434/v1/".into());
        assert_eq!(config.endpoint(), "http://localhost:11434/v1");

        let text = render("{{domain}} / {{other}} / {{domain}}", &[("domain", "a.com")]);
        assert_eq!(text, "a.com / {{other}} / a.com");
    }

    #[test]
    fn test_default_prompt_uses_every_placeholder() {
        for key in DNS_PLACEHOLDERS {
            assert!(DEFAULT_DNS_PROMPT.contains(&format!("{{{{{}}}}}", key)), "{}", key);
        }
    }
}
