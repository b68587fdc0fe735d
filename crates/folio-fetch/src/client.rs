//! Notion REST API block source.
//!
//! Sync HTTP client listing block children with bearer-token authentication.

use folio_config::NotionConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::Agent;

use crate::error::FetchError;
use crate::source::{BlockPage, BlockSource};

/// Characters escaped in path segments and query values.
///
/// RFC 3986 unreserved characters stay literal so block ids keep their
/// hyphens.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Notion API client implementing [`BlockSource`].
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
    api_version: String,
    page_size: u32,
}

impl NotionClient {
    /// Create client from config values.
    ///
    /// # Arguments
    /// * `config` - API connection settings
    /// * `token` - Integration token sent as a bearer credential
    pub fn new(config: &NotionConfig, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            api_version: config.api_version.clone(),
            page_size: config.page_size,
        }
    }

    /// URL of one page of children of `node_id`.
    fn children_url(&self, node_id: &str, cursor: Option<&str>) -> String {
        let mut url = format!(
            "{}/blocks/{}/children?page_size={}",
            self.base_url,
            utf8_percent_encode(node_id, COMPONENT),
            self.page_size
        );
        if let Some(cursor) = cursor {
            url.push_str("&start_cursor=");
            url.extend(utf8_percent_encode(cursor, COMPONENT));
        }
        url
    }
}

impl BlockSource for NotionClient {
    fn list_children(&self, node_id: &str, cursor: Option<&str>) -> Result<BlockPage, FetchError> {
        let url = self.children_url(node_id, cursor);
        tracing::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Notion-Version", &self.api_version)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| FetchError::unavailable(node_id, e))?;

        let status = response.status();
        let mut body_reader = response.into_body();

        if !status.is_success() {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(FetchError::unavailable(
                node_id,
                format!("HTTP {} - {error_body}", status.as_u16()),
            ));
        }

        let body = body_reader
            .read_to_string()
            .map_err(|e| FetchError::unavailable(node_id, e))?;
        BlockPage::from_json(node_id, &body)
    }
}
