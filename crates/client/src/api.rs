//! HTTP transport
//!
//! `ApiClient` wraps a `reqwest::Client`, attaches the bearer token of the
//! shared session and turns failed responses into `ClientError`s. A 401
//! clears the session so the UI falls back to the login view.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionContext;
use reqwest::{Client, Method};
use serde_json::Value;

// ============================================================================
// API Client
// ============================================================================

/// JSON-over-HTTP client bound to a session
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying reqwest HTTP client
    client: Client,
    config: ClientConfig,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client for `config`, authenticating with `session`
    pub fn new(config: ClientConfig, session: SessionContext) -> ClientResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    /// GET a JSON document
    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        self.send(Method::GET, path, None).await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// PUT a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// PATCH a JSON body
    pub async fn patch(&self, path: &str, body: &Value) -> ClientResult<Value> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }

    /// Send a request and decode the response
    ///
    /// An empty or non-JSON success body decodes to `Value::Null`.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let url = self.config.build_url(path);
        tracing::debug!("{} {}", method, url);

        let mut req = self.client.request(method.clone(), &url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.inspect_err(|e| {
            tracing::error!("{} {} failed: {}", method, url, e);
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let data: Option<Value> = serde_json::from_slice(&bytes).ok();

        // Any 401 drops the stored credentials, a rejected login included;
        // only the UI decides whether to leave the current view.
        if status.as_u16() == 401 {
            tracing::warn!("{} {} rejected the session", method, url);
            if let Err(e) = self.session.clear() {
                tracing::error!("Failed to clear session: {}", e);
            }
        }

        if !status.is_success() {
            let err = ClientError::from_response(status.as_u16(), data.as_ref());
            tracing::error!("{} {} -> {}: {}", method, url, status, err.user_message());
            return Err(err);
        }

        Ok(data.unwrap_or(Value::Null))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::session::{Session, UserProfile};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve canned responses, one per connection, returning the raw requests
    pub(crate) async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });
        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    pub(crate) fn logged_in() -> SessionContext {
        SessionContext::in_memory(Session::new(
            "secret",
            UserProfile {
                nombre: "Ana".into(),
                rol: Some("ADMIN".into()),
                ..UserProfile::default()
            },
        ))
    }

    pub(crate) fn client(base: &str, session: SessionContext) -> ApiClient {
        ApiClient::new(ClientConfig::default().with_api_base(base), session).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let (base, server) = serve(vec![(200, r#"[{"id": 1}]"#.into())]).await;
        let api = client(&base, logged_in());

        let value = api.get("/api/roles/").await.unwrap();
        assert_eq!(value, json!([{"id": 1}]));

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /api/roles/ HTTP/1.1"));
        assert!(requests[0].to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let (base, server) = serve(vec![(401, r#"{"detail": "Token inválido"}"#.into())]).await;
        let session = logged_in();
        let api = client(&base, session.clone());

        let err = api.get("/api/residentes/").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Token inválido");
        assert!(!session.is_authenticated());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_body_message() {
        let (base, server) = serve(vec![
            (400, r#"{"error": "DNI duplicado"}"#.into()),
            (500, "<html>oops</html>".into()),
        ])
        .await;
        let api = client(&base, logged_in());

        let err = api.post("/api/residentes/", &json!({})).await.unwrap_err();
        assert_eq!(err.user_message(), "DNI duplicado");
        let err = api.delete("/api/residentes/3/").await.unwrap_err();
        assert_eq!(err.user_message(), "Error");
        assert!(api.session().is_authenticated());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_connection_reads_generic() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let api = client(&base, logged_in());

        let err = api.get("/api/areas-comunes/").await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert_eq!(err.user_message(), "Error");
        assert!(api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_login_clears_stale_session() {
        let (base, server) = serve(vec![(401, r#"{"detail": "Credenciales inválidas"}"#.into())]).await;
        let session = logged_in();
        let api = client(&base, session.clone());

        let err = api
            .post("/api/cuenta/login/", &json!({"correo": "ana@condo.bo", "password": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Credenciales inválidas");
        assert!(!session.is_authenticated());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let (base, server) = serve(vec![(204, String::new())]).await;
        let api = client(&base, logged_in());
        api.delete("/api/mascotas/2/").await.unwrap();
        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("DELETE /api/mascotas/2/"));
    }
}
