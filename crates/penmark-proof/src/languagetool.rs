//! LanguageTool HTTP API proofer.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use penmark_core::error::ProofError;
use penmark_core::model::ProofLanguage;
use penmark_core::text::{char_slice, Span};
use penmark_core::traits::{ProofIssue, ProofIssueKind, ProofResult, Proofer};

pub const DEFAULT_ENDPOINT: &str = "https://api.languagetool.org/v2/check";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Characters of surrounding text kept on each side of a match.
const CONTEXT_PADDING: usize = 20;
const MAX_ERROR_BODY: usize = 200;

/// Premium account credentials, sent as `username` / `apiKey`.
#[derive(Clone)]
struct Credentials {
    username: String,
    api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"***")
            .finish()
    }
}

/// Proofer backed by a LanguageTool `/v2/check` endpoint.
#[derive(Debug)]
pub struct LanguageToolProofer {
    endpoint: String,
    credentials: Option<Credentials>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl LanguageToolProofer {
    /// Create a proofer for `endpoint`, or the public API when `None`.
    ///
    /// Fails fast when the endpoint is not an absolute http(s) URL.
    pub fn new(endpoint: Option<&str>) -> Result<Self, ProofError> {
        let endpoint = match endpoint.map(str::trim) {
            Some(e) if !e.is_empty() => e,
            _ => DEFAULT_ENDPOINT,
        };
        validate_endpoint(endpoint)?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProofError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client,
        })
    }

    pub fn with_credentials(mut self, username: &str, api_key: &str) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            api_key: api_key.to_string(),
        });
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(1);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Like [`Proofer::check`], but recovers every failure as an empty result.
    pub async fn proof(&self, text: &str, language: ProofLanguage) -> ProofResult {
        match self.check(text, language).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("proofing degraded: {e}");
                ProofResult::empty()
            }
        }
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ProofError> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| ProofError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ProofError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(())
}

/// Parse a user-supplied language code into a supported variant.
pub fn parse_language(code: &str) -> Result<ProofLanguage, ProofError> {
    code.parse()
        .map_err(|_| ProofError::UnsupportedLanguage(code.to_string()))
}

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<CheckMatch>,
}

#[derive(Deserialize)]
struct CheckMatch {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "shortMessage")]
    short_message: Option<String>,
    offset: i64,
    length: i64,
    #[serde(default)]
    replacements: Vec<Replacement>,
    #[serde(default)]
    rule: Option<Rule>,
}

#[derive(Deserialize)]
struct Replacement {
    value: String,
}

#[derive(Deserialize)]
struct Rule {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "issueType")]
    issue_type: Option<String>,
    #[serde(default)]
    category: Option<Category>,
}

#[derive(Deserialize)]
struct Category {
    #[serde(default)]
    id: Option<String>,
}

/// Map LanguageTool's rule metadata onto a coarse issue kind.
fn classify(issue_type: &str, category: &str, description: &str) -> ProofIssueKind {
    let issue_type = issue_type.to_lowercase();
    let category = category.to_lowercase();
    let description = description.to_lowercase();

    if issue_type.contains("misspell")
        || category.contains("typos")
        || description.contains("spelling")
    {
        ProofIssueKind::Spelling
    } else if issue_type.contains("grammar") || category.contains("grammar") {
        ProofIssueKind::Grammar
    } else if issue_type.contains("style")
        || category.contains("style")
        || category.contains("punctuation")
    {
        ProofIssueKind::Style
    } else {
        ProofIssueKind::Other
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Char index of the UTF-16 offset `units`, clamped to the text length.
/// An offset inside a surrogate pair rounds up to the next char.
fn utf16_to_char_index(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, c) in text.chars().enumerate() {
        if seen >= units {
            return index;
        }
        seen += c.len_utf16();
    }
    text.chars().count()
}

fn to_issue(m: CheckMatch, text: &str) -> ProofIssue {
    let rule = m.rule.as_ref();
    let issue_type = rule.and_then(|r| r.issue_type.as_deref()).unwrap_or("");
    let category = rule
        .and_then(|r| r.category.as_ref())
        .and_then(|c| c.id.as_deref())
        .unwrap_or("");
    let description = rule.and_then(|r| r.description.as_deref()).unwrap_or("");

    // LanguageTool counts UTF-16 code units; spans count chars.
    let start = utf16_to_char_index(text, m.offset.max(0) as usize);
    let end_units = m.offset.saturating_add(m.length).max(0) as usize;
    let end = utf16_to_char_index(text, end_units).max(start);
    let span = Span::new(start, end);

    let message = non_empty(m.message.as_deref())
        .or_else(|| non_empty(m.short_message.as_deref()))
        .or_else(|| non_empty(Some(description)))
        .unwrap_or("Issue")
        .to_string();

    let example = char_slice(
        text,
        start.saturating_sub(CONTEXT_PADDING),
        end.saturating_add(CONTEXT_PADDING),
    )
    .trim();

    ProofIssue {
        kind: classify(issue_type, category, description),
        message,
        example: (!example.is_empty()).then(|| example.to_string()),
        span,
        suggestion: m.replacements.into_iter().next().map(|r| r.value),
    }
}

#[async_trait]
impl Proofer for LanguageToolProofer {
    fn name(&self) -> &str {
        "languagetool"
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint, language = %language, chars = text.chars().count()))]
    async fn check(&self, text: &str, language: ProofLanguage) -> Result<ProofResult, ProofError> {
        if text.trim().is_empty() {
            return Ok(ProofResult::empty());
        }

        let mut form: Vec<(&str, &str)> = vec![
            ("text", text),
            ("language", language.code()),
            ("enabledOnly", "false"),
        ];
        if let Some(c) = &self.credentials {
            form.push(("username", c.username.as_str()));
            form.push(("apiKey", c.api_key.as_str()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProofError::Timeout(self.timeout_secs)
                } else {
                    ProofError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProofError::Upstream {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProofError::Network(e.to_string()))?;
        let parsed: CheckResponse = serde_json::from_str(&body)
            .map_err(|e| ProofError::MalformedResponse(e.to_string()))?;

        let issues: Vec<ProofIssue> = parsed
            .matches
            .into_iter()
            .map(|m| to_issue(m, text))
            .collect();
        tracing::debug!("received {} matches", issues.len());

        Ok(ProofResult::from_issues(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEXT: &str = "I recieve the the mesage";

    fn lt_body() -> serde_json::Value {
        serde_json::json!({
            "software": {"name": "LanguageTool"},
            "matches": [
                {
                    "message": "Possible spelling mistake found.",
                    "shortMessage": "Spelling mistake",
                    "offset": 2,
                    "length": 7,
                    "replacements": [{"value": "receive"}, {"value": "relieve"}],
                    "rule": {
                        "id": "MORFOLOGIK_RULE_EN_GB",
                        "description": "Possible spelling mistake",
                        "issueType": "misspelling",
                        "category": {"id": "TYPOS", "name": "Possible Typo"}
                    }
                },
                {
                    "message": "",
                    "shortMessage": "Word repetition",
                    "offset": 10,
                    "length": 7,
                    "replacements": [{"value": "the"}],
                    "rule": {
                        "id": "ENGLISH_WORD_REPEAT_RULE",
                        "description": "Word repetition",
                        "issueType": "duplication",
                        "category": {"id": "GRAMMAR", "name": "Grammar"}
                    }
                },
                {
                    "message": "Consider a comma.",
                    "offset": -3,
                    "length": 1,
                    "replacements": [],
                    "rule": {
                        "id": "COMMA",
                        "issueType": "typographical",
                        "category": {"id": "PUNCTUATION"}
                    }
                }
            ]
        })
    }

    fn proofer(server: &MockServer) -> LanguageToolProofer {
        LanguageToolProofer::new(Some(&format!("{}/v2/check", server.uri()))).unwrap()
    }

    #[tokio::test]
    async fn successful_check() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/check"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("language=en-GB"))
            .and(body_string_contains("enabledOnly=false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(lt_body()))
            .expect(1)
            .mount(&server)
            .await;

        let result = proofer(&server)
            .check(TEXT, ProofLanguage::EnGb)
            .await
            .unwrap();

        assert_eq!(result.issues.len(), 3);
        let spelling = &result.issues[0];
        assert_eq!(spelling.kind, ProofIssueKind::Spelling);
        assert_eq!(spelling.span, Span::new(2, 9));
        assert_eq!(spelling.suggestion.as_deref(), Some("receive"));
        assert_eq!(spelling.example.as_deref(), Some(TEXT));

        let repeat = &result.issues[1];
        assert_eq!(repeat.kind, ProofIssueKind::Grammar);
        assert_eq!(repeat.message, "Word repetition");

        let comma = &result.issues[2];
        assert_eq!(comma.kind, ProofIssueKind::Style);
        assert_eq!(comma.span, Span::new(0, 0));
        assert!(comma.suggestion.is_none());

        assert_eq!(result.counts.total, 3);
        assert_eq!(result.counts.style, 1);
        assert_eq!(result.tokens_for_highlight.len(), 2);
    }

    #[tokio::test]
    async fn premium_credentials_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("username=me%40example.com"))
            .and(body_string_contains("apiKey=secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"matches": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = proofer(&server)
            .with_credentials("me@example.com", "secret")
            .check("Some text.", ProofLanguage::EnUs)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_upstream_and_degrades() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let p = proofer(&server);
        let err = p.check(TEXT, ProofLanguage::EnGb).await.unwrap_err();
        assert!(matches!(err, ProofError::Upstream { status: 500, .. }));
        assert!(!err.is_configuration());

        assert_eq!(p.proof(TEXT, ProofLanguage::EnGb).await, ProofResult::empty());
    }

    #[tokio::test]
    async fn malformed_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"unexpected": true})),
            )
            .mount(&server)
            .await;

        let p = proofer(&server);
        let err = p.check(TEXT, ProofLanguage::EnGb).await.unwrap_err();
        assert!(matches!(err, ProofError::MalformedResponse(_)));
        assert!(p.proof(TEXT, ProofLanguage::EnGb).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_never_raises() {
        let p = LanguageToolProofer::new(Some("http://127.0.0.1:9/v2/check"))
            .unwrap()
            .with_timeout(2);
        let err = p.check(TEXT, ProofLanguage::EnGb).await.unwrap_err();
        assert!(matches!(err, ProofError::Network(_) | ProofError::Timeout(_)));
        assert_eq!(p.proof(TEXT, ProofLanguage::EnGb).await, ProofResult::empty());
    }

    #[tokio::test]
    async fn blank_text_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = proofer(&server)
            .check("  \n\t", ProofLanguage::EnGb)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn invalid_endpoints_fail_fast() {
        for bad in ["not a url", "ftp://example.com/check", "file:///tmp/check"] {
            let err = LanguageToolProofer::new(Some(bad)).unwrap_err();
            assert!(err.is_configuration(), "{bad}");
        }
        let default = LanguageToolProofer::new(None).unwrap();
        assert_eq!(default.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(
            LanguageToolProofer::new(Some("  ")).unwrap().endpoint(),
            DEFAULT_ENDPOINT
        );
    }

    #[test]
    fn unsupported_language_is_configuration_error() {
        assert_eq!(parse_language("en_us").unwrap(), ProofLanguage::EnUs);
        let err = parse_language("de-DE").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn classification_cascade() {
        assert_eq!(classify("misspelling", "", ""), ProofIssueKind::Spelling);
        assert_eq!(classify("", "TYPOS", ""), ProofIssueKind::Spelling);
        assert_eq!(classify("", "", "Possible spelling mistake"), ProofIssueKind::Spelling);
        assert_eq!(classify("grammar", "STYLE", ""), ProofIssueKind::Grammar);
        assert_eq!(classify("", "GRAMMAR", ""), ProofIssueKind::Grammar);
        assert_eq!(classify("style", "", ""), ProofIssueKind::Style);
        assert_eq!(classify("typographical", "PUNCTUATION", ""), ProofIssueKind::Style);
        assert_eq!(classify("whitespace", "CASING", ""), ProofIssueKind::Other);
    }

    #[test]
    fn example_is_widened_context() {
        let text = "The quick brown fox jumps over the lazy dog near the quiet river bank.";
        let m = CheckMatch {
            message: Some("msg".into()),
            short_message: None,
            offset: 35,
            length: 4,
            replacements: vec![],
            rule: None,
        };
        let issue = to_issue(m, text);
        assert_eq!(issue.span.slice(text), "lazy");
        assert_eq!(issue.example.as_deref(), Some("fox jumps over the lazy dog near the quiet"));
        assert_eq!(issue.kind, ProofIssueKind::Other);
    }

    #[test]
    fn utf16_offsets_map_to_chars() {
        let text = "Thanks 😀 I recieve";
        assert_eq!(utf16_to_char_index(text, 0), 0);
        // the emoji is two code units but one char
        assert_eq!(utf16_to_char_index(text, 7), 7);
        assert_eq!(utf16_to_char_index(text, 9), 8);
        assert_eq!(utf16_to_char_index(text, 8), 8);
        assert_eq!(utf16_to_char_index(text, 500), text.chars().count());
    }

    #[tokio::test]
    async fn astral_characters_shift_offsets() {
        let text = "Thanks 😀 I recieve your letter today.";
        let byte = text.find("recieve").unwrap();
        let units: usize = text[..byte].encode_utf16().count();
        assert_eq!(units, text[..byte].chars().count() + 1);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [{
                    "message": "Possible spelling mistake found.",
                    "offset": units,
                    "length": 7,
                    "replacements": [{"value": "receive"}],
                    "rule": {"id": "MORFOLOGIK_RULE_EN_GB", "issueType": "misspelling"}
                }]
            })))
            .mount(&server)
            .await;

        let result = proofer(&server)
            .check(text, ProofLanguage::EnGb)
            .await
            .unwrap();
        let issue = &result.issues[0];
        assert_eq!(issue.span, Span::new(11, 18));
        assert_eq!(issue.span.slice(text), "recieve");
        assert_eq!(result.tokens_for_highlight[0].span, Span::new(11, 18));
        assert!(issue.example.as_deref().unwrap().contains("😀 I recieve your"));
    }

    #[test]
    fn debug_masks_api_key() {
        let p = LanguageToolProofer::new(None)
            .unwrap()
            .with_credentials("user", "super-secret");
        let dbg = format!("{p:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("***"));
    }
}
