//! Sender-domain DNS verification.
//!
//! Looks up the SPF, DKIM and DMARC TXT records of a domain, renders them
//! into the editable DNS prompt and asks the language model for a verdict.

use std::collections::HashMap;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::ResolveErrorKind;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::{AiConfig, AiPrompts, Feature, render};
use super::model::{CompletionRequest, LanguageModel};
use crate::auth::Identity;
use crate::error::AiError;

/// DKIM selector our sending servers sign with.
pub const DKIM_SELECTOR: &str = "daybuu";

const DNS_SYSTEM: &str = "You verify email DNS records and answer with a single JSON object.";

#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// TXT records at `name`, each one's character strings joined.
    /// A name without records yields an empty list, not an error.
    async fn txt(&self, name: &str) -> Result<Vec<String>, AiError>;
}

/// Resolver using the host's DNS configuration.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> Result<Self, AiError> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| AiError::Dns(format!("resolver setup failed: {}", e)))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl TxtResolver for SystemResolver {
    async fn txt(&self, name: &str) -> Result<Vec<String>, AiError> {
        match self.inner.txt_lookup(name).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect()),
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(AiError::Dns(format!("{}: {}", name, e))),
        }
    }
}

/// Fixed record table keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    records: HashMap<String, Vec<String>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, record: &str) -> Self {
        self.records
            .entry(name.to_string())
            .or_default()
            .push(record.to_string());
        self
    }
}

#[async_trait]
impl TxtResolver for StaticResolver {
    async fn txt(&self, name: &str) -> Result<Vec<String>, AiError> {
        Ok(self.records.get(name).cloned().unwrap_or_default())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DnsRecords {
    pub spf: Vec<String>,
    pub dkim: Vec<String>,
    pub dmarc: Vec<String>,
}

pub fn dkim_name(domain: &str) -> String {
    format!("{}._domainkey.{}", DKIM_SELECTOR, domain)
}

pub fn dmarc_name(domain: &str) -> String {
    format!("_dmarc.{}", domain)
}

/// The three lookups run concurrently; the first hard failure wins.
pub async fn lookup_records(
    resolver: &dyn TxtResolver,
    domain: &str,
) -> Result<DnsRecords, AiError> {
    let dkim = dkim_name(domain);
    let dmarc = dmarc_name(domain);
    let (spf, dkim, dmarc) = tokio::join!(
        resolver.txt(domain),
        resolver.txt(&dkim),
        resolver.txt(&dmarc)
    );
    Ok(DnsRecords {
        spf: spf?,
        dkim: dkim?,
        dmarc: dmarc?,
    })
}

fn format_records(records: &[String]) -> String {
    if records.is_empty() {
        "(none)".to_string()
    } else {
        records.join("\n")
    }
}

// ============================================================================
// REQUEST / VERDICT
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DnsCheckRequest {
    pub domain: String,
    #[serde(alias = "dkimPublicKey")]
    pub dkim_public_key: String,
}

impl DnsCheckRequest {
    /// Normalized `(domain, key)` or a field-level message.
    pub fn validate(&self) -> Result<(String, String), AiError> {
        let domain = self.domain.trim().trim_end_matches('.').to_ascii_lowercase();
        if domain.is_empty() {
            return Err(AiError::Validation("domain is required".into()));
        }
        if !is_domain(&domain) {
            return Err(AiError::Validation(format!("domain is not valid: {}", domain)));
        }

        let key: String = self.dkim_public_key.split_whitespace().collect();
        if key.is_empty() {
            return Err(AiError::Validation("DKIM public key is required".into()));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        {
            return Err(AiError::Validation("DKIM public key must be base64".into()));
        }
        Ok((domain, key))
    }
}

fn is_domain(domain: &str) -> bool {
    if domain.len() > 253 || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    Verified,
    Unverified,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsVerdict {
    pub spf_status: RecordStatus,
    pub dkim_status: RecordStatus,
    pub dmarc_status: RecordStatus,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsCheckResult {
    pub domain: String,
    pub records: DnsRecords,
    #[serde(flatten)]
    pub verdict: DnsVerdict,
}

/// Parse the model's answer, tolerating code fences and surrounding prose.
pub fn parse_verdict(answer: &str) -> Result<DnsVerdict, AiError> {
    let start = answer.find('{');
    let end = answer.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &answer[s..=e],
        _ => return Err(AiError::Provider("answer contains no JSON object".into())),
    };
    serde_json::from_str(json).map_err(|e| AiError::Provider(format!("unusable verdict: {}", e)))
}

// ============================================================================
// FLOW
// ============================================================================

pub async fn verify_domain(
    identity: Option<&Identity>,
    config: &AiConfig,
    prompts: &AiPrompts,
    resolver: &dyn TxtResolver,
    model: &dyn LanguageModel,
    request: DnsCheckRequest,
) -> Result<DnsCheckResult, AiError> {
    identity.ok_or(AiError::NotAuthenticated)?;
    let (domain, key) = request.validate()?;
    config.require(Feature::DnsVerification)?;

    let records = lookup_records(resolver, &domain).await?;
    let spf = format_records(&records.spf);
    let dkim = format_records(&records.dkim);
    let dmarc = format_records(&records.dmarc);
    let prompt = render(
        &prompts.dns_verification,
        &[
            ("domain", domain.as_str()),
            ("spf_records", spf.as_str()),
            ("dkim_records", dkim.as_str()),
            ("dmarc_records", dmarc.as_str()),
            ("dkim_public_key", key.as_str()),
        ],
    );

    let answer = model
        .complete(CompletionRequest {
            system: DNS_SYSTEM.to_string(),
            prompt,
            json: true,
        })
        .await?;
    let verdict = parse_verdict(&answer).inspect_err(|e| {
        warn!(domain = %domain, error = %e, "model answer rejected");
    })?;
    info!(
        domain = %domain,
        spf = ?verdict.spf_status,
        dkim = ?verdict.dkim_status,
        dmarc = ?verdict.dmarc_status,
        "verified sender domain"
    );
    Ok(DnsCheckResult {
        domain,
        records,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::model::CannedModel;

    const VERDICT: &str = r#"{"spfStatus":"verified","dkimStatus":"unverified","dmarcStatus":"not-found","analysis":"DKIM key differs."}"#;

    struct FailingResolver;

    #[async_trait]
    impl TxtResolver for FailingResolver {
        async fn txt(&self, name: &str) -> Result<Vec<String>, AiError> {
            Err(AiError::Dns(format!("{}: timed out", name)))
        }
    }

    fn enabled() -> AiConfig {
        AiConfig {
            api_key: "k".into(),
            enabled: true,
            ..AiConfig::default()
        }
    }

    fn request(domain: &str) -> DnsCheckRequest {
        DnsCheckRequest {
            domain: domain.into(),
            dkim_public_key: "MIGfMA0GCSqGSIb3DQEB\nAQUAA4GNADCBiQ==".into(),
        }
    }

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with("shop.example", "v=spf1 include:_spf.mailer.example ~all")
            .with("shop.example", "google-site-verification=abc")
            .with("daybuu._domainkey.shop.example", "v=DKIM1; k=rsa; p=OTHERKEY")
    }

    #[test]
    fn test_validation() {
        let (domain, key) = request(" Shop.Example. ").validate().unwrap();
        assert_eq!(domain, "shop.example");
        assert_eq!(key, "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQ==");

        assert!(request("").validate().is_err());
        assert!(request("localhost").validate().is_err());
        assert!(request("-bad.example").validate().is_err());
        assert!(request("a b.example").validate().is_err());

        let bad_key = DnsCheckRequest {
            domain: "shop.example".into(),
            dkim_public_key: "p=abc;".into(),
        };
        assert!(matches!(bad_key.validate(), Err(AiError::Validation(_))));
    }

    #[test]
    fn test_parse_verdict_tolerates_fences() {
        let fenced = format!("```json\n{}\n```", VERDICT);
        let verdict = parse_verdict(&fenced).unwrap();
        assert_eq!(verdict.spf_status, RecordStatus::Verified);
        assert_eq!(verdict.dmarc_status, RecordStatus::NotFound);

        assert!(parse_verdict("I could not tell").is_err());
        assert!(parse_verdict(r#"{"spfStatus":"maybe"}"#).is_err());
    }

    #[tokio::test]
    async fn test_lookup_uses_selector_and_dmarc_names() {
        let records = lookup_records(&resolver(), "shop.example").await.unwrap();
        assert_eq!(records.spf.len(), 2);
        assert_eq!(records.dkim, vec!["v=DKIM1; k=rsa; p=OTHERKEY".to_string()]);
        assert!(records.dmarc.is_empty());
    }

    #[tokio::test]
    async fn test_verify_renders_records_into_prompt() {
        let model = CannedModel::new(VERDICT);
        let result = verify_domain(
            Some(&Identity::new("u1")),
            &enabled(),
            &AiPrompts::default(),
            &resolver(),
            &model,
            request("shop.example"),
        )
        .await
        .unwrap();

        assert_eq!(result.verdict.dkim_status, RecordStatus::Unverified);
        let sent = model.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].json);
        assert!(sent[0].prompt.contains("v=spf1 include:_spf.mailer.example ~all"));
        assert!(sent[0].prompt.contains("daybuu._domainkey.shop.example"));
        assert!(sent[0].prompt.contains("MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQ=="));
        assert!(!sent[0].prompt.contains("{{"));
    }

    #[tokio::test]
    async fn test_verify_checks_before_network() {
        let model = CannedModel::new(VERDICT);
        let prompts = AiPrompts::default();
        let me = Identity::new("u1");

        let err = verify_domain(
            None,
            &enabled(),
            &prompts,
            &resolver(),
            &model,
            request("shop.example"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::NotAuthenticated));

        let err = verify_domain(
            Some(&me),
            &AiConfig::default(),
            &prompts,
            &resolver(),
            &model,
            request("shop.example"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::Disabled(_)));

        let err = verify_domain(
            Some(&me),
            &enabled(),
            &prompts,
            &resolver(),
            &model,
            request("nope"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::Validation(_)));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_dns_failure_propagates() {
        let model = CannedModel::new(VERDICT);
        let err = verify_domain(
            Some(&Identity::new("u1")),
            &enabled(),
            &AiPrompts::default(),
            &FailingResolver,
            &model,
            request("shop.example"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AiError::Dns(_)));
        assert!(model.requests().is_empty());
    }
}
