//! Entity resource calls
//!
//! Schema-driven CRUD on top of `ApiClient`: listing collections, loading
//! reference collections, saving form submissions (including the secondary
//! assignment write) and deleting records. Also the login call.

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::session::UserProfile;
use condo_core::{Record, RecordId};
use condo_model::{EntitySchema, References, Submission};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinSet;

/// Login endpoint
pub const LOGIN_PATH: &str = "/api/cuenta/login/";

/// Body returned by a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl ApiClient {
    // ========================================================================
    // Collections
    // ========================================================================

    /// Fetch a collection; anything other than a JSON array reads as empty
    pub async fn list_path(&self, path: &str) -> ClientResult<Vec<Record>> {
        let value = self.get(path).await?;
        Ok(into_records(path, value))
    }

    /// Fetch an entity's collection
    pub async fn list(&self, schema: &EntitySchema) -> ClientResult<Vec<Record>> {
        tracing::info!("Loading {}", schema.name);
        self.list_path(&schema.endpoint).await
    }

    /// Fetch every reference collection the schema names, concurrently
    ///
    /// Fails if any one of them fails.
    pub async fn fetch_references(&self, schema: &EntitySchema) -> ClientResult<References> {
        let mut tasks = JoinSet::new();
        for source in &schema.references {
            let api = self.clone();
            let name = source.name.clone();
            let endpoint = source.endpoint.clone();
            tasks.spawn(async move { (name, api.list_path(&endpoint).await) });
        }

        let mut references = References::new();
        while let Some(joined) = tasks.join_next().await {
            let (name, records) = joined.map_err(|e| ClientError::Parse(e.to_string()))?;
            references.insert(name, records?);
        }
        Ok(references)
    }

    /// Fetch an entity's collection together with its references
    pub async fn load_page(&self, schema: &EntitySchema) -> ClientResult<(Vec<Record>, References)> {
        let (records, references) = tokio::join!(self.list(schema), self.fetch_references(schema));
        Ok((records?, references?))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create or update depending on whether the submission carries an id,
    /// then apply the secondary assignment if there is one
    pub async fn save(&self, schema: &EntitySchema, submission: &Submission) -> ClientResult<Value> {
        let body = Value::Object(submission.payload.clone());
        let (saved, id) = match submission.id {
            Some(id) => {
                tracing::info!("Updating {} {}", schema.name, id);
                (self.put(&schema.item_path(id), &body).await?, Some(id))
            }
            None => {
                tracing::info!("Creating {}", schema.singular);
                let created = self.post(&schema.endpoint, &body).await?;
                let id = created.as_object().and_then(|r| schema.record_id(r));
                (created, id)
            }
        };

        if let Some(related) = &submission.related {
            let id = id.ok_or_else(|| {
                ClientError::Parse(format!("{} response carried no id", schema.singular))
            })?;
            self.assign_related(schema, id, related).await?;
        }
        Ok(saved)
    }

    /// Replace the records linked to `id` through the schema's assignment action
    pub async fn assign_related(
        &self,
        schema: &EntitySchema,
        id: RecordId,
        related: &[RecordId],
    ) -> ClientResult<()> {
        let (Some(path), Some(assignment)) = (schema.assignment_path(id), &schema.assignment) else {
            return Err(ClientError::Config(format!(
                "{} has no related assignment",
                schema.name
            )));
        };
        let mut body = serde_json::Map::new();
        body.insert(assignment.body_key.clone(), json!(related));
        self.post(&path, &Value::Object(body)).await?;
        Ok(())
    }

    /// Delete one record
    pub async fn remove(&self, schema: &EntitySchema, id: RecordId) -> ClientResult<()> {
        tracing::info!("Deleting {} {}", schema.name, id);
        self.delete(&schema.item_path(id)).await
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in and store the session
    pub async fn login(&self, correo: &str, password: &str) -> ClientResult<UserProfile> {
        let body = json!({"correo": correo, "password": password});
        let value = self.post(LOGIN_PATH, &body).await?;
        let response: LoginResponse =
            serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))?;
        self.session()
            .sign_in(response.token, response.user.clone())
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(response.user)
    }

    /// Drop the stored session
    pub fn logout(&self) {
        tracing::info!("Logging out");
        if let Err(e) = self.session().clear() {
            tracing::error!("Failed to clear session: {}", e);
        }
    }
}

fn into_records(path: &str, value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        other => {
            tracing::warn!("{} returned {} instead of a list", path, json_kind(&other));
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{client, logged_in, serve};
    use crate::session::{Session, SessionContext};
    use condo_model::catalog;
    use pretty_assertions::assert_eq;

    fn body_of(request: &str) -> Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_non_array_collection_reads_empty() {
        let (base, server) = serve(vec![(200, r#"{"detail": "ok"}"#.into())]).await;
        let api = client(&base, logged_in());
        let records = api.list(catalog().get("roles").unwrap()).await.unwrap();
        assert!(records.is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_then_assign() {
        let (base, server) = serve(vec![
            (201, r#"{"id": 12, "nombre": "Piscina"}"#.into()),
            (200, r#"{"ok": true}"#.into()),
        ])
        .await;
        let api = client(&base, logged_in());
        let schema = catalog().get("areas").unwrap();
        let mut payload = Record::new();
        payload.insert("nombre".into(), json!("Piscina"));
        let submission = Submission {
            id: None,
            payload,
            related: Some(vec![1, 7]),
        };

        api.save(schema, &submission).await.unwrap();

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/areas-comunes/ "));
        assert!(requests[1].starts_with("POST /api/areas-comunes/12/asignar-reglas/ "));
        assert_eq!(body_of(&requests[1]), json!({"reglas": [1, 7]}));
    }

    #[tokio::test]
    async fn test_update_uses_item_path() {
        let (base, server) = serve(vec![(200, r#"{"numero": 4}"#.into())]).await;
        let api = client(&base, logged_in());
        let schema = catalog().get("residencias").unwrap();
        let mut payload = Record::new();
        payload.insert("numero".into(), json!(4));
        let submission = Submission {
            id: Some(4),
            payload,
            related: None,
        };

        api.save(schema, &submission).await.unwrap();

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("PUT /api/residencias/4/ "));
        assert_eq!(body_of(&requests[0]), json!({"numero": 4}));
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let (base, server) = serve(vec![(
            200,
            r#"{"token": "t1", "user": {"nombre": "Ana", "apellido": "Rojas", "rol": "ADMIN"}}"#
                .into(),
        )])
        .await;
        let session = SessionContext::in_memory(Session::default());
        let api = client(&base, session.clone());

        let user = api.login("ana@condo.bo", "x").await.unwrap();
        assert_eq!(user.full_name(), "Ana Rojas");
        assert_eq!(session.token().as_deref(), Some("t1"));

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/cuenta/login/ "));
        assert!(!requests[0].to_lowercase().contains("authorization:"));

        api.logout();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_logged_out() {
        let (base, server) =
            serve(vec![(401, r#"{"detail": "Credenciales inválidas"}"#.into())]).await;
        let session = SessionContext::in_memory(Session::default());
        let api = client(&base, session.clone());

        let err = api.login("ana@condo.bo", "mal").await.unwrap_err();
        assert_eq!(err.user_message(), "Credenciales inválidas");
        assert!(!session.is_authenticated());
        server.await.unwrap();
    }
}
