//! Notion page sink.
//!
//! Each brief becomes one row of a Notion database. The row is created first
//! (title and date properties), then the rendered blocks are appended as the
//! row's page children, one batch per request.

mod encode;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use briefbuilder_core::PageSink;
use briefbuilder_shared::{BlockBatch, BriefBuilderError, NotionConfig, NotionCredentials, Result};

pub use encode::{MAX_TEXT_CHARS, encode_block, encode_children, encode_runs};

/// Default timeout in seconds for one API request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("BriefBuilder/", env!("CARGO_PKG_VERSION"));

/// Database property holding the row title.
const TITLE_PROPERTY: &str = "Name";

/// Database property holding the brief date.
const DATE_PROPERTY: &str = "Date";

/// Response body of a page creation; only the id is used.
#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

// ---------------------------------------------------------------------------
// NotionClient
// ---------------------------------------------------------------------------

/// HTTP client for the Notion pages and block-children endpoints.
pub struct NotionClient {
    client: Client,
    base: Url,
    token: String,
    database_id: String,
    notion_version: String,
    row_title_prefix: String,
}

impl NotionClient {
    /// Create a client from resolved credentials and the `[notion]` config.
    pub fn new(credentials: NotionCredentials, config: &NotionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BriefBuilderError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base: parse_base(&config.api_base)?,
            token: credentials.token,
            database_id: credentials.database_id,
            notion_version: config.notion_version.clone(),
            row_title_prefix: config.row_title_prefix.clone(),
        })
    }

    /// Row title: `"<prefix> – <YYYY-MM-DD>"`.
    pub fn row_title(&self, date: NaiveDate) -> String {
        format!("{} – {}", self.row_title_prefix, date.format("%Y-%m-%d"))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| BriefBuilderError::config(format!("invalid Notion endpoint {path}: {e}")))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
    }
}

/// Parse the API base, forcing a trailing slash so joins keep its path.
fn parse_base(api_base: &str) -> Result<Url> {
    let normalized = if api_base.ends_with('/') {
        api_base.to_string()
    } else {
        format!("{api_base}/")
    };
    Url::parse(&normalized).map_err(|e| {
        BriefBuilderError::config(format!("invalid notion.api_base {api_base:?}: {e}"))
    })
}

/// Turn a non-2xx response into a `Network` error with status and body.
async fn check_status(url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BriefBuilderError::Network(format!(
        "{url}: HTTP {status}: {}",
        body.trim()
    )))
}

#[async_trait]
impl PageSink for NotionClient {
    #[instrument(skip_all, fields(date = %date))]
    async fn create_page(&self, title: &str, date: NaiveDate) -> Result<String> {
        let url = self.endpoint("v1/pages")?;
        let row_title = self.row_title(date);
        debug!(%url, %row_title, brief_title = title, "creating database row");

        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                TITLE_PROPERTY: {
                    "title": [{ "text": { "content": row_title } }]
                },
                DATE_PROPERTY: {
                    "date": { "start": date.format("%Y-%m-%d").to_string() }
                }
            }
        });

        let response = self
            .authorized(self.client.post(url.clone()))
            .json(&body)
            .send()
            .await
            .map_err(|e| BriefBuilderError::Network(format!("{url}: {e}")))?;
        let response = check_status(&url, response).await?;

        let created: CreatedPage = response.json().await.map_err(|e| {
            BriefBuilderError::Publish(format!("{url}: unreadable page response: {e}"))
        })?;
        if created.id.trim().is_empty() {
            return Err(BriefBuilderError::Publish(format!(
                "{url}: page response has an empty id"
            )));
        }

        debug!(page_id = %created.id, "database row created");
        Ok(created.id)
    }

    #[instrument(skip_all, fields(page_id = %page_id, batch = batch.index, blocks = batch.len()))]
    async fn append_blocks(&self, page_id: &str, batch: &BlockBatch) -> Result<()> {
        let url = self.endpoint(&format!("v1/blocks/{page_id}/children"))?;
        let body = json!({ "children": encode_children(&batch.blocks) });

        let response = self
            .authorized(self.client.patch(url.clone()))
            .json(&body)
            .send()
            .await
            .map_err(|e| BriefBuilderError::Network(format!("{url}: {e}")))?;
        check_status(&url, response).await?;

        debug!("batch appended");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
