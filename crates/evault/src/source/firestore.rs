//! Cloud Firestore over its REST API.

use reqwest::Url;
use tracing::{debug, info};

use super::value::ListDocumentsResponse;
use super::{DocumentSource, RawDocument};
use crate::config::FirestoreConfig;
use crate::error::{Error, Result};

/// Reads collections from a Firestore database.
#[derive(Debug, Clone)]
pub struct FirestoreSource {
    client: reqwest::Client,
    base_url: Url,
    project_id: String,
    database_id: String,
    api_key: Option<String>,
    page_size: u32,
}

impl FirestoreSource {
    /// Create a source for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the project id is empty or the base URL is not a
    /// valid absolute URL.
    pub fn new(config: &FirestoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::config(
                "firestore.project_id must be set to read from Firestore",
            ));
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::config(format!(
                "firestore.base_url '{}' is not a valid URL: {e}",
                config.base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "firestore.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            page_size: config.page_size.max(1),
        })
    }

    /// URL of one page of a collection listing.
    fn page_url(&self, collection: &str, page_token: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::internal("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
                "documents",
            ])
            .extend(collection.split('/').filter(|segment| !segment.is_empty()));

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse> {
        let url = self.page_url(collection, page_token)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("unexpected listing from Firestore: {e}")))
    }
}

#[async_trait::async_trait]
impl DocumentSource for FirestoreSource {
    fn name(&self) -> &'static str {
        "firestore"
    }

    fn location(&self) -> String {
        format!(
            "firestore project '{}' database '{}'",
            self.project_id, self.database_id
        )
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let page = self.fetch_page(collection, page_token.as_deref()).await?;
            pages += 1;
            debug!(
                collection,
                page = pages,
                documents = page.documents.len(),
                "Fetched Firestore page"
            );

            documents.extend(page.documents.into_iter().map(|doc| {
                let id = doc.id().to_string();
                RawDocument::new(id, doc.into_plain())
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(
            collection,
            documents = documents.len(),
            pages,
            "Read Firestore collection"
        );
        Ok(documents)
    }
}
