use crate::canvas::bindings::SymbolBindings;
use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

const CALCULATE_PATH: &str = "calculate";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionRequest {
    /// PNG data URI of the whole surface.
    pub image: String,
    pub variables: SymbolBindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub expr: String,
    #[serde(deserialize_with = "string_or_number")]
    pub result: String,
    #[serde(rename = "isAssignment", alias = "assign", default)]
    pub is_assignment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecognitionResponse {
    pub items: Vec<ResultItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseWire {
    Items {
        #[serde(alias = "data")]
        items: Vec<ResultItem>,
    },
    Bare(Vec<ResultItem>),
}

impl<'de> Deserialize<'de> for RecognitionResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match ResponseWire::deserialize(deserializer)? {
            ResponseWire::Items { items } | ResponseWire::Bare(items) => items,
        };
        Ok(Self { items })
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde_json::Value;
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub fn parse_response(body: &str) -> Result<RecognitionResponse> {
    serde_json::from_str(body).context("deserialize recognition response")
}

/// External service that turns a drawing into recognized expressions.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, request: &RecognitionRequest) -> Result<RecognitionResponse>;
}

/// Posts requests as JSON to `<endpoint>/calculate`.
pub struct HttpRecognizer {
    client: Client,
    url: String,
}

impl HttpRecognizer {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            bail!("recognition endpoint is empty");
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("math-canvas recognizer")
            .build()
            .context("build recognition http client")?;
        Ok(Self {
            client,
            url: format!("{}/{CALCULATE_PATH}", endpoint.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Recognizer for HttpRecognizer {
    fn recognize(&self, request: &RecognitionRequest) -> Result<RecognitionResponse> {
        let body = serde_json::to_vec(request).context("serialize recognition request")?;
        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .with_context(|| format!("post drawing to {}", self.url))?;

        let status = resp.status();
        let text = resp.text().context("read recognition response body")?;
        if !status.is_success() {
            bail!("recognition service returned {status}: {}", text.trim());
        }
        parse_response(&text)
    }
}
