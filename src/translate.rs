//! Translation provider boundary.
//!
//! The reflow pipeline sends every reconstructed sentence to a
//! [`Translator`] in one batch and expects exactly one translation back per
//! sentence, in order. [`DeeplTranslator`] implements this against the DeepL
//! HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use subreflow::{DeeplTranslator, Formality, ReflowError, TranslationRequest, Translator};
//!
//! let translator = DeeplTranslator::new("my-key:fx")?;
//! let texts = vec!["Goedemorgen.".to_string()];
//! let translated = translator.translate(&TranslationRequest {
//!     texts: &texts,
//!     source_language: "NL",
//!     target_language: "FR",
//!     formality: Formality::Default,
//! })?;
//! println!("{}", translated[0]);
//! # Ok::<(), ReflowError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::ReflowError;

/// Endpoint for keys on the free plan (suffixed with `:fx`).
pub const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";
/// Endpoint for keys on paid plans.
pub const DEEPL_PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Requested register of the translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formality {
    /// Let the provider decide. This is the default.
    #[default]
    Default,
    /// Prefer a formal register.
    More,
    /// Prefer an informal register.
    Less,
}

impl Formality {
    /// Value of the provider's `formality` parameter.
    ///
    /// The `prefer_` variants fall back to the default register for target
    /// languages that do not support formality instead of failing.
    pub fn as_parameter(self) -> &'static str {
        match self {
            Formality::Default => "default",
            Formality::More => "prefer_more",
            Formality::Less => "prefer_less",
        }
    }
}

impl Display for Formality {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Formality::Default => write!(f, "default"),
            Formality::More => write!(f, "more"),
            Formality::Less => write!(f, "less"),
        }
    }
}

/// One batch translation request.
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    /// Sentences to translate, in order.
    pub texts: &'a [String],
    /// Source language code.
    pub source_language: &'a str,
    /// Target language code.
    pub target_language: &'a str,
    /// Requested register.
    pub formality: Formality,
}

/// Something that can translate a batch of sentences.
///
/// Implementations must return one string per input text, in the same
/// order. The pipeline checks the count and rejects mismatches.
pub trait Translator {
    /// Translate every text in `request`.
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<Vec<String>, ReflowError>;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<Vec<String>, ReflowError> {
        (**self).translate(request)
    }
}

#[derive(Debug, Serialize)]
struct DeeplRequest<'a> {
    text: &'a [String],
    source_lang: &'a str,
    target_lang: &'a str,
    formality: &'static str,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

/// Blocking DeepL API client.
#[derive(Debug, Clone)]
pub struct DeeplTranslator {
    client: Client,
    auth_key: String,
    api_url: String,
}

impl DeeplTranslator {
    /// Create a client for `auth_key`, picking the free or paid endpoint
    /// from the key's suffix.
    ///
    /// # Errors
    ///
    /// - [`ReflowError::InvalidConfiguration`] if the key is empty.
    /// - [`ReflowError::Transport`] if the HTTP client cannot be built.
    pub fn new(auth_key: &str) -> Result<Self, ReflowError> {
        let api_url = if auth_key.ends_with(":fx") {
            DEEPL_FREE_API_URL
        } else {
            DEEPL_PRO_API_URL
        };
        Self::with_api_url(auth_key, api_url)
    }

    /// Create a client that posts to `api_url`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](DeeplTranslator::new).
    pub fn with_api_url(auth_key: &str, api_url: &str) -> Result<Self, ReflowError> {
        let auth_key = auth_key.trim();
        if auth_key.is_empty() {
            return Err(ReflowError::InvalidConfiguration(
                "translation provider auth key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(format!("subreflow/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            auth_key: auth_key.to_string(),
            api_url: api_url.to_string(),
        })
    }

    /// The endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Translator for DeeplTranslator {
    fn translate(&self, request: &TranslationRequest<'_>) -> Result<Vec<String>, ReflowError> {
        if request.texts.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!(
            "Sending {} sentences to {} ({} -> {}, formality {})",
            request.texts.len(),
            self.api_url,
            request.source_language,
            request.target_language,
            request.formality,
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .json(&DeeplRequest {
                text: request.texts,
                source_lang: request.source_language,
                target_lang: request.target_language,
                formality: request.formality.as_parameter(),
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ReflowError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        let decoded: DeeplResponse = serde_json::from_str(&body)
            .map_err(|e| ReflowError::ResponseDecode(e.to_string()))?;

        Ok(decoded
            .translations
            .into_iter()
            .map(|translation| translation.text)
            .collect())
    }
}
