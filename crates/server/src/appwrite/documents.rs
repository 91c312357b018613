//! Document storage over the backend's databases API.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};

use super::{AppwriteClient, AppwriteError, Auth, encode_queries, with_queries};
use crate::db::{Document, DocumentList, DocumentStore, ListQuery, RepositoryError};

impl From<AppwriteError> for RepositoryError {
    fn from(err: AppwriteError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else if err.is_conflict() {
            Self::Conflict(err.to_string())
        } else if let AppwriteError::Parse(msg) = err {
            Self::DataCorruption(msg)
        } else {
            Self::Backend(err.to_string())
        }
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<DocumentList, RepositoryError> {
        let url = with_queries(
            self.collection_url(collection, &[])?,
            &encode_queries(query),
        );
        Ok(self.send(Method::GET, url, None, Auth::Key).await?)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, RepositoryError> {
        let url = self.collection_url(collection, &[id])?;
        Ok(self.send(Method::GET, url, None, Auth::Key).await?)
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let url = self.collection_url(collection, &[])?;
        let body = json!({ "documentId": id, "data": data });
        Ok(self.send(Method::POST, url, Some(&body), Auth::Key).await?)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        let url = self.collection_url(collection, &[id])?;
        let body = json!({ "data": data });
        Ok(self.send(Method::PATCH, url, Some(&body), Auth::Key).await?)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let url = self.url(&["databases", self.inner.database_id.as_str()])?;
        self.send_empty(Method::GET, url, None).await?;
        Ok(())
    }
}
