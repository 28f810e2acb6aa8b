//! Client for the DeepL.com translation API
//!
//! Covers the subset of the v2 API this tool needs: text translation and the
//! supported-language listing. An auth key is required; keys issued for free
//! accounts end in `:fx` and are routed to the free endpoint automatically.
//!
//! See <https://www.deepl.com/docs-api/> for the API itself.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use serde::Deserialize;

/// Base endpoint for DeepL API Pro accounts
pub const PRO_ENDPOINT: &str = "https://api.deepl.com/v2/";
/// Base endpoint for DeepL API Free accounts
pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/";

/// Pick the base endpoint for an auth key
///
/// Free-account keys carry a `:fx` suffix.
///
/// ```rust
/// use wikitrans::deepl::{FREE_ENDPOINT, PRO_ENDPOINT, determine_endpoint};
///
/// assert_eq!(determine_endpoint("abc123:fx"), FREE_ENDPOINT);
/// assert_eq!(determine_endpoint("abc123"), PRO_ENDPOINT);
/// ```
pub fn determine_endpoint(auth_key: &str) -> &'static str {
    if auth_key.ends_with(":fx") {
        FREE_ENDPOINT
    } else {
        PRO_ENDPOINT
    }
}

/// Well-known DeepL error descriptions, from the API error-handling docs
fn known_error(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Bad request. Please check error message and your parameters."),
        403 => Some("Authorization failed. Please supply a valid auth_key parameter."),
        404 => Some("The requested resource could not be found."),
        413 => Some("The request size exceeds the limit."),
        414 => Some(
            "The request URL is too long. You can avoid this error by using a POST request \
             and sending the parameters in the HTTP body.",
        ),
        429 | 529 => Some("Too many requests. Please wait and resend your request."),
        456 => Some("Quota exceeded. The character limit has been reached."),
        503 => Some("Resource currently unavailable. Try again later."),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// A language supported by DeepL, as reported by the `languages` endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SupportedLanguage {
    /// Language code, e.g. `DE` or `EN-US`
    pub language: String,
    /// Human-readable name
    pub name: String,
    /// Whether the formality parameter is available for this language
    #[serde(default)]
    pub supports_formality: bool,
}

/// DeepL API client
///
/// Holds the auth key and a reusable HTTP client; the endpoint is derived
/// from the key once at construction.
pub struct DeeplClient {
    endpoint: String,
    auth_key: String,
    http: reqwest::Client,
}

impl DeeplClient {
    pub fn new(auth_key: impl Into<String>) -> Self {
        let auth_key = auth_key.into();
        let endpoint = determine_endpoint(&auth_key).to_string();
        DeeplClient {
            endpoint,
            auth_key,
            http: reqwest::Client::new(),
        }
    }

    /// Construct a client against a non-standard endpoint (self-hosted
    /// proxies, tests)
    pub fn with_endpoint(auth_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        DeeplClient {
            endpoint: endpoint.into(),
            auth_key: auth_key.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Translate `text` into `target_lang`
    ///
    /// An empty `source_lang` enables automatic source-language detection.
    /// Use [`supported_languages`](Self::supported_languages) to query valid
    /// codes for either parameter. Returns the translated segments in order.
    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: &str,
    ) -> Result<Vec<String>> {
        let mut params = vec![
            ("auth_key", self.auth_key.as_str()),
            ("target_lang", target_lang),
            ("text", text),
        ];
        if !source_lang.is_empty() {
            params.push(("source_lang", source_lang));
        }

        let response = self
            .http
            .post(format!("{}translate", self.endpoint))
            .form(&params)
            .send()
            .await
            .map_err(|e| anyhow!("failed to reach DeepL: {}", e))?;
        let response = validate_response(response).await?;

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse translate response: {}", e))?;

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }

    /// Same as [`translate`](Self::translate) but concatenates the segments
    /// into a single string
    pub async fn translate_to_string(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: &str,
    ) -> Result<String> {
        Ok(self.translate(text, target_lang, source_lang).await?.concat())
    }

    /// List supported languages, keyed by language code
    ///
    /// With `target` set, the supported target languages are returned;
    /// otherwise the source languages.
    pub async fn supported_languages(
        &self,
        target: bool,
    ) -> Result<HashMap<String, SupportedLanguage>> {
        let mut params = vec![("auth_key", self.auth_key.as_str())];
        if target {
            params.push(("target", "target"));
        }

        let response = self
            .http
            .post(format!("{}languages", self.endpoint))
            .form(&params)
            .send()
            .await
            .map_err(|e| anyhow!("failed to reach DeepL: {}", e))?;
        let response = validate_response(response).await?;

        let languages: Vec<SupportedLanguage> = response
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse languages response: {}", e))?;

        Ok(languages
            .into_iter()
            .map(|lang| (lang.language.clone(), lang))
            .collect())
    }
}

/// Turn a non-2xx response into an error carrying the status, the well-known
/// DeepL description for that status when there is one, and the `message`
/// field of the JSON error body when it parses
async fn validate_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = format!("invalid response [{}]", status);
    if let Some(hint) = known_error(status.as_u16()) {
        message.push(' ');
        message.push_str(hint);
    }

    if let Ok(body) = response.json::<serde_json::Value>().await {
        if let Some(detail) = body.get("message").and_then(|m| m.as_str()) {
            message.push_str(", ");
            message.push_str(detail);
        }
    }

    Err(anyhow!(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_keys_use_free_endpoint() {
        assert_eq!(determine_endpoint("0123-4567:fx"), FREE_ENDPOINT);
    }

    #[test]
    fn test_pro_keys_use_pro_endpoint() {
        assert_eq!(determine_endpoint("0123-4567"), PRO_ENDPOINT);
        assert_eq!(determine_endpoint(""), PRO_ENDPOINT);
    }

    #[test]
    fn test_client_derives_endpoint_from_key() {
        let client = DeeplClient::new("key:fx");
        assert_eq!(client.endpoint, FREE_ENDPOINT);

        let client = DeeplClient::new("key");
        assert_eq!(client.endpoint, PRO_ENDPOINT);
    }

    #[test]
    fn test_known_errors_cover_documented_codes() {
        for code in [400, 403, 404, 413, 414, 429, 456, 503, 529] {
            assert!(known_error(code).is_some(), "missing text for {}", code);
        }
        assert!(known_error(418).is_none());
    }

    #[test]
    fn test_translate_response_parses() {
        let body = r#"{
            "translations": [
                {"detected_source_language": "EN", "text": "Hallo"},
                {"detected_source_language": "EN", "text": " Welt"}
            ]
        }"#;
        let parsed: TranslateResponse = serde_json::from_str(body).expect("valid fixture");
        let segments: Vec<String> = parsed.translations.into_iter().map(|t| t.text).collect();
        assert_eq!(segments, vec!["Hallo".to_string(), " Welt".to_string()]);
    }

    #[test]
    fn test_languages_response_parses_into_map() {
        let body = r#"[
            {"language": "DE", "name": "German", "supports_formality": true},
            {"language": "EN", "name": "English"}
        ]"#;
        let languages: Vec<SupportedLanguage> = serde_json::from_str(body).expect("valid fixture");
        let map: HashMap<String, SupportedLanguage> = languages
            .into_iter()
            .map(|lang| (lang.language.clone(), lang))
            .collect();

        assert_eq!(map["DE"].name, "German");
        assert!(map["DE"].supports_formality);
        assert!(!map["EN"].supports_formality, "missing field defaults to false");
    }
}
