use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use sphere_core::upload::UploadKind;
use sphere_core::{
    AuthResponse, Comment, CreateComment, CreatePost, ErrorBody, Login, MessageResponse, Post,
    Register, UpdateCommentContent, UpdateCommentEmoji, UpdatePost, UploadResponse,
};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::store::ContentStore;

#[derive(Debug, Clone)]
/// HTTP-реализация [`ContentStore`] поверх REST API `sphere-server`.
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    /// Создаёт хранилище с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();

        match response.json::<ErrorBody>().await {
            Ok(body) => ClientError::from_body(status, body),
            Err(_) => ClientError::from_status(status, format!("http status {status}")),
        }
    }

    async fn execute<TRes>(request: RequestBuilder) -> ClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<TRes>().await?)
    }

    /// универсальный helper для запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> ClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let mut request = self.client.request(method, self.endpoint(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::execute(request).await
    }

    async fn send_empty<TRes>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::execute(request).await
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    async fn register(&self, req: Register) -> ClientResult<MessageResponse> {
        self.send_json(Method::POST, "/api/auth/register", &req, None)
            .await
    }

    async fn login(&self, req: Login) -> ClientResult<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/login", &req, None)
            .await
    }

    async fn list_posts(&self, author_id: Option<Uuid>) -> ClientResult<Vec<Post>> {
        let mut request = self.client.get(self.endpoint("/api/posts"));
        if let Some(author_id) = author_id {
            request = request.query(&[("author_id", author_id.to_string())]);
        }
        Self::execute(request).await
    }

    async fn my_posts(&self, session: &Session) -> ClientResult<Vec<Post>> {
        self.send_empty(Method::GET, "/api/posts/mine", Some(&session.token))
            .await
    }

    async fn get_post(&self, id: Uuid) -> ClientResult<Post> {
        self.send_empty(Method::GET, &format!("/api/posts/{id}"), None)
            .await
    }

    async fn create_post(&self, session: &Session, req: CreatePost) -> ClientResult<Post> {
        self.send_json(Method::POST, "/api/posts", &req, Some(&session.token))
            .await
    }

    async fn update_post(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdatePost,
    ) -> ClientResult<Post> {
        self.send_json(
            Method::PUT,
            &format!("/api/posts/{id}"),
            &req,
            Some(&session.token),
        )
        .await
    }

    async fn delete_post(&self, session: &Session, id: Uuid) -> ClientResult<MessageResponse> {
        self.send_empty(
            Method::DELETE,
            &format!("/api/posts/{id}"),
            Some(&session.token),
        )
        .await
    }

    async fn toggle_post_like(&self, session: &Session, id: Uuid) -> ClientResult<Post> {
        self.send_empty(
            Method::POST,
            &format!("/api/posts/{id}/like"),
            Some(&session.token),
        )
        .await
    }

    async fn list_comments(
        &self,
        post_id: Uuid,
        emoji: Option<&str>,
    ) -> ClientResult<Vec<Comment>> {
        let mut request = self
            .client
            .get(self.endpoint("/api/comments"))
            .query(&[("post_id", post_id.to_string())]);
        if let Some(emoji) = emoji {
            request = request.query(&[("emoji", emoji)]);
        }
        Self::execute(request).await
    }

    async fn create_comment(
        &self,
        session: &Session,
        req: CreateComment,
    ) -> ClientResult<Comment> {
        self.send_json(Method::POST, "/api/comments", &req, Some(&session.token))
            .await
    }

    async fn update_comment(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentContent,
    ) -> ClientResult<Comment> {
        self.send_json(
            Method::PUT,
            &format!("/api/comments/{id}"),
            &req,
            Some(&session.token),
        )
        .await
    }

    async fn update_comment_emoji(
        &self,
        session: &Session,
        id: Uuid,
        req: UpdateCommentEmoji,
    ) -> ClientResult<Comment> {
        self.send_json(
            Method::PUT,
            &format!("/api/comments/{id}/emoji"),
            &req,
            Some(&session.token),
        )
        .await
    }

    async fn delete_comment(
        &self,
        session: &Session,
        id: Uuid,
    ) -> ClientResult<MessageResponse> {
        self.send_empty(
            Method::DELETE,
            &format!("/api/comments/{id}"),
            Some(&session.token),
        )
        .await
    }

    async fn toggle_comment_like(&self, session: &Session, id: Uuid) -> ClientResult<Comment> {
        self.send_empty(
            Method::POST,
            &format!("/api/comments/{id}/like"),
            Some(&session.token),
        )
        .await
    }

    async fn upload(
        &self,
        session: &Session,
        kind: UploadKind,
        filename: &str,
        mimetype: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadResponse> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mimetype)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(self.endpoint(&format!("/api/uploads/{}", kind.as_str())))
            .bearer_auth(&session.token)
            .multipart(form);
        Self::execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::HttpStore;

    #[test]
    fn endpoint_normalizes_slashes() {
        let store = HttpStore::new("http://localhost:8080/");
        assert_eq!(
            store.endpoint("/api/posts"),
            "http://localhost:8080/api/posts"
        );
        assert_eq!(
            store.endpoint("api/comments"),
            "http://localhost:8080/api/comments"
        );
    }
}
