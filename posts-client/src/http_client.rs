use reqwest::{Client, RequestBuilder, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::ClientError;
use crate::models::{Claims, DeleteConfirmation, Health, NewPost, Post, PostUpdate, UserProfile};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    access_token: String,
}

/// Thin typed wrapper over the REST surface. Cloning is cheap; the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PostsClient {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    /// Same client presenting `token` as its bearer credential.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.set_token(Some(token.into()));
        client
    }

    /// Same client without credentials.
    pub fn anonymous(&self) -> Self {
        let mut client = self.clone();
        client.token = None;
        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.authorize(req).send().await?;
        debug!(status = resp.status().as_u16(), url = %resp.url(), "response received");

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(ClientError::from_http_response(resp).await)
        }
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        let req = self.client.post(self.url("/auth/signup")).json(&json!({
            "name": name,
            "email": email,
            "password": password,
        }));
        self.send(req).await
    }

    /// Signs in and keeps the returned token for later calls.
    pub async fn signin(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
        let req = self.client.post(self.url("/auth/signin")).json(&json!({
            "email": email,
            "password": password,
        }));
        let session: SignInResponse = self.send(req).await?;
        self.token = Some(session.access_token.clone());
        Ok(session.access_token)
    }

    pub async fn me(&self) -> Result<Claims, ClientError> {
        self.send(self.client.get(self.url("/auth/me"))).await
    }

    pub async fn list_public(&self) -> Result<Vec<Post>, ClientError> {
        self.send(self.client.get(self.url("/posts"))).await
    }

    pub async fn list_all(&self) -> Result<Vec<Post>, ClientError> {
        self.send(self.client.get(self.url("/posts/all"))).await
    }

    pub async fn search(&self, title: &str) -> Result<Vec<Post>, ClientError> {
        let req = self
            .client
            .get(self.url("/posts/search"))
            .query(&[("title", title)]);
        self.send(req).await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, ClientError> {
        self.send(self.client.get(self.url(&format!("/posts/{id}"))))
            .await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        self.send(self.client.post(self.url("/posts")).json(post))
            .await
    }

    pub async fn update_post(&self, id: i64, update: &PostUpdate) -> Result<Post, ClientError> {
        self.send(self.client.put(self.url(&format!("/posts/{id}"))).json(update))
            .await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_post(&self, id: i64) -> Result<String, ClientError> {
        let confirmation: DeleteConfirmation = self
            .send(self.client.delete(self.url(&format!("/posts/{id}"))))
            .await?;
        Ok(confirmation.message)
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }
}
