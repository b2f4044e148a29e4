//! PostgREST-style HTTP client for the remote directory.

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use waypoint_core::{
    AuthenticatedPrincipal, Identifier, NewUserRecord, RecordId, UserPatch, UserRecord,
};

use super::r#trait::{DirectoryError, UserDirectory};
use crate::config::DirectoryConfig;

const PREFER_REPRESENTATION: &str = "return=representation";

/// Named parameters of the credential-check procedure.
#[derive(Serialize)]
struct AuthenticateArgs<'a> {
    identifier: &'a str,
    secret: &'a str,
}

/// Directory backed by a managed database's REST interface.
///
/// - records live in `rest/v1/{users_table}`
/// - authentication is the `rest/v1/rpc/{auth_rpc}` procedure, which returns
///   zero or one principal rows
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    config: DirectoryConfig,
}

impl HttpDirectory {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DirectoryError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    fn rest_url(&self, path: &str) -> Result<Url, DirectoryError> {
        self.config
            .base_url
            .join(&format!("rest/v1/{path}"))
            .map_err(|e| DirectoryError::Network(format!("invalid directory url: {e}")))
    }

    fn table_url(&self) -> Result<Url, DirectoryError> {
        self.rest_url(&self.config.users_table)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(req: RequestBuilder) -> Result<Response, DirectoryError> {
        let resp = req
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }

    async fn rows<T: DeserializeOwned>(req: RequestBuilder) -> Result<Vec<T>, DirectoryError> {
        Self::send(req)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl UserDirectory for HttpDirectory {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Option<AuthenticatedPrincipal>, DirectoryError> {
        let url = self.rest_url(&format!("rpc/{}", self.config.auth_rpc))?;
        tracing::debug!(url = url.as_str(), "authenticating against directory");

        let req = self
            .request(Method::POST, url)
            .json(&AuthenticateArgs { identifier, secret });
        let mut rows: Vec<AuthenticatedPrincipal> = Self::rows(req).await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.swap_remove(0)))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let url = self.table_url()?;
        tracing::debug!(url = url.as_str(), "listing user records");

        let req = self
            .request(Method::GET, url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        Self::rows(req).await
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, DirectoryError> {
        let req = self
            .request(Method::POST, self.table_url()?)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[record]);

        let mut rows: Vec<UserRecord> = Self::rows(req).await?;
        if rows.is_empty() {
            return Err(DirectoryError::Decode("create returned no row".to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, id: RecordId, patch: UserPatch) -> Result<UserRecord, DirectoryError> {
        let req = self
            .request(Method::PATCH, self.table_url()?)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch);

        let mut rows: Vec<UserRecord> = Self::rows(req).await?;
        if rows.is_empty() {
            return Err(DirectoryError::NotFound(id));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete(&self, id: RecordId) -> Result<(), DirectoryError> {
        let req = self
            .request(Method::DELETE, self.table_url()?)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", PREFER_REPRESENTATION);

        let rows: Vec<serde_json::Value> = Self::rows(req).await?;
        if rows.is_empty() {
            return Err(DirectoryError::NotFound(id));
        }
        Ok(())
    }

    async fn exists_by_identifier(
        &self,
        identifier: &Identifier,
        exclude: Option<RecordId>,
    ) -> Result<bool, DirectoryError> {
        let mut query = vec![
            ("select", "id".to_string()),
            ("identifier", format!("eq.{}", identifier.formatted())),
        ];
        if let Some(id) = exclude {
            query.push(("id", format!("neq.{id}")));
        }

        let req = self.request(Method::GET, self.table_url()?).query(&query);
        let rows: Vec<serde_json::Value> = Self::rows(req).await?;
        Ok(!rows.is_empty())
    }
}
