//! Google Drive quiz catalog.
//!
//! Two access modes, matching how the files can be shared:
//!
//! - keyed: an API key plus a folder id, listing the folder's JSON files
//!   through the Drive v3 API;
//! - public: a publicly shared index file (`{ "items": [...] }`) fetched
//!   through the `uc?export=download` endpoint, with the v3 media URL as
//!   fallback.

use serde::Deserialize;

use super::NetError;
use crate::data::parse_quiz_payload;
use crate::models::{CatalogItem, QuizDoc};

const DRIVE_V3: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "modifiedTime")]
    modified_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PublicIndex {
    #[serde(default)]
    items: Vec<CatalogItem>,
}

/// Client for the remote quiz catalog.
pub struct DriveClient {
    http: reqwest::Client,
    api_key: Option<String>,
    folder_id: Option<String>,
    index_file_id: Option<String>,
}

impl DriveClient {
    pub fn new(
        api_key: Option<String>,
        folder_id: Option<String>,
        index_file_id: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            folder_id,
            index_file_id,
        }
    }

    fn keyed(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.folder_id.as_deref()) {
            (Some(key), Some(folder)) if !key.is_empty() && !folder.is_empty() => {
                Some((key, folder))
            }
            _ => None,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, NetError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// List the catalog from whichever source is configured.
    pub async fn list_catalog(&self) -> Result<Vec<CatalogItem>, NetError> {
        if let Some((key, folder)) = self.keyed() {
            return self.list_folder(key, folder).await;
        }
        if let Some(index_id) = self.index_file_id.as_deref().filter(|s| !s.is_empty()) {
            return self.list_public_index(index_id).await;
        }
        Err(NetError::NotConfigured("catalog source"))
    }

    fn folder_listing_request(&self, key: &str, folder: &str) -> reqwest::RequestBuilder {
        let query = format!(
            "'{}' in parents and mimeType='application/json' and trashed=false",
            folder
        );
        self.http.get(format!("{DRIVE_V3}/files")).query(&[
            ("q", query.as_str()),
            ("key", key),
            ("fields", "files(id,name,modifiedTime)"),
            ("orderBy", "modifiedTime desc"),
            ("pageSize", "1000"),
        ])
    }

    async fn list_folder(&self, key: &str, folder: &str) -> Result<Vec<CatalogItem>, NetError> {
        let listing: DriveFileList = self
            .folder_listing_request(key, folder)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        log::debug!("folder listing returned {} files", listing.files.len());
        Ok(listing
            .files
            .into_iter()
            .map(|f| CatalogItem {
                id: f.id,
                name: if f.name.is_empty() {
                    "Untitled".to_string()
                } else {
                    f.name
                },
                updated_at: f.modified_time,
            })
            .collect())
    }

    async fn list_public_index(&self, index_id: &str) -> Result<Vec<CatalogItem>, NetError> {
        // The uc? URL generally works for public files; the v3 media URL is
        // the fallback for shares where it does not.
        let index = match self.get_json::<PublicIndex>(&public_url(index_id)).await {
            Ok(index) => index,
            Err(e) => {
                log::debug!("public index url failed ({}), trying media url", e);
                self.get_json(&media_url(index_id)).await?
            }
        };
        Ok(index.items)
    }

    /// Fetch one quiz file and parse it into a quiz document.
    pub async fn fetch_quiz(&self, id: &str, fallback_name: &str) -> Result<QuizDoc, NetError> {
        let value: serde_json::Value = if let Some((key, _)) = self.keyed() {
            let url = format!("{DRIVE_V3}/files/{}?alt=media&key={}", id, key);
            self.get_json(&url).await?
        } else {
            match self.get_json(&public_url(id)).await {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("public quiz url failed ({}), trying media url", e);
                    self.get_json(&media_url(id)).await?
                }
            }
        };
        Ok(parse_quiz_payload(id, fallback_name, value))
    }
}

fn public_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={}", file_id)
}

fn media_url(file_id: &str) -> String {
    format!("{DRIVE_V3}/files/{}?alt=media", file_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_listing_deserializes() {
        let json = r#"{
            "files": [
                {"id": "abc", "name": "Genesis.json", "modifiedTime": "2024-05-01T10:00:00Z"},
                {"id": "def", "name": "Exodus.json"}
            ]
        }"#;
        let listing: DriveFileList = serde_json::from_str(json).unwrap();
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.files[0].modified_time.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert!(listing.files[1].modified_time.is_none());
    }

    #[test]
    fn public_index_deserializes() {
        let json = r#"{"items": [{"id": "1", "name": "A", "updatedAt": "2024-01-01"}]}"#;
        let index: PublicIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.items.len(), 1);
        assert_eq!(index.items[0].updated_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn folder_listing_query_is_encoded() {
        let client = DriveClient::new(Some("k".into()), Some("folder123".into()), None);
        let request = client
            .folder_listing_request("k", "folder123")
            .build()
            .unwrap();
        let url = request.url().as_str();
        assert!(!url.contains(' '), "raw spaces must not survive: {url}");
        assert!(url.contains("%27folder123%27"));
        assert!(url.contains("orderBy=modifiedTime+desc"));
        assert!(url.contains("key=k"));
    }

    #[tokio::test]
    async fn unconfigured_client_reports_it() {
        let client = DriveClient::new(None, None, None);
        let err = client.list_catalog().await.unwrap_err();
        assert!(matches!(err, NetError::NotConfigured(_)));

        // An empty index id counts as unconfigured too.
        let client = DriveClient::new(None, None, Some(String::new()));
        let err = client.list_catalog().await.unwrap_err();
        assert!(matches!(err, NetError::NotConfigured(_)));
    }
}
