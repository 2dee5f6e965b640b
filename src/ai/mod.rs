//! # AI Flows
//!
//! Two flows forward user input to a third-party language model:
//!
//! - [`verify_domain`]: looks up a sending domain's SPF, DKIM and DMARC TXT
//!   records and asks the model whether they are set up correctly.
//! - [`chat_test`]: sends one message with the editable chat system prompt.
//!
//! Both read the provider settings and prompt text from the two JSON
//! documents managed by [`ConfigStore`], and both refuse to run while AI or
//! the specific feature is switched off.

pub mod chat;
pub mod config;
pub mod dns;
pub mod model;

pub use chat::{ChatTestReply, ChatTestRequest, chat_test};
pub use config::{AiConfig, AiFeatures, AiPrompts, ConfigStore, Feature, Provider};
pub use dns::{
    DnsCheckRequest, DnsCheckResult, DnsRecords, DnsVerdict, RecordStatus, StaticResolver,
    SystemResolver, TxtResolver, verify_domain,
};
pub use model::{CannedModel, CompletionRequest, HttpModel, LanguageModel, ModelSource};
