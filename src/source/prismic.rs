//! Prismic REST API v2 client

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::{DocumentSource, Query};
use crate::content::Document;
use crate::error::{Error, Result};
use crate::feed::FeedPage;

/// Response of the API root endpoint
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// HTTP client for a Prismic repository
pub struct PrismicClient {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Create a client for an API endpoint such as
    /// `https://my-repo.cdn.prismic.io/api/v2`
    pub fn new(endpoint: &str, access_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: access_token.map(str::to_string),
            master_ref: OnceCell::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The master ref, fetched once and then reused
    async fn master_ref(&self) -> Result<&str> {
        let master = self
            .master_ref
            .get_or_try_init(|| async {
                let info: ApiInfo = self.get_json(&self.endpoint, &self.auth_params()).await?;
                info.refs
                    .into_iter()
                    .find(|r| r.is_master_ref)
                    .map(|r| r.reference)
                    .ok_or_else(|| Error::MissingRef(self.endpoint.clone()))
            })
            .await?;
        Ok(master.as_str())
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        match &self.access_token {
            Some(token) => vec![("access_token", token.clone())],
            None => Vec::new(),
        }
    }

    async fn search(&self, predicate: String, query: &Query) -> Result<FeedPage<Document>> {
        let master = self.master_ref().await?.to_string();

        let mut params = vec![
            ("ref", master),
            ("q", predicate),
            ("pageSize", query.page_size.to_string()),
            ("page", query.page.max(1).to_string()),
        ];
        if let Some(ordering) = query.ordering {
            params.push(("orderings", ordering.as_prismic().to_string()));
        }
        if let Some(after) = &query.after {
            params.push(("after", after.clone()));
        }
        params.extend(self.auth_params());

        let url = format!("{}/documents/search", self.endpoint);
        self.get_json(&url, &params).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", url, params);

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Quote a value for use inside a predicate
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
impl DocumentSource for PrismicClient {
    async fn query(&self, query: &Query) -> Result<FeedPage<Document>> {
        let predicate = format!("[[at(document.type,{})]]", quote(&query.doc_type));
        self.search(predicate, query).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage<Document>> {
        // next_page is a complete search URL, ref and token included
        self.get_json(cursor, &[]).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
        let predicate = format!("[[at(my.{}.uid,{})]]", doc_type, quote(uid));
        let query = Query::new(doc_type).page_size(1);
        let page = self.search(predicate, &query).await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
