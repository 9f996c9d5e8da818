//! Cloud Firestore client over the REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::DocumentStore;
use crate::models::{Note, NoteFields, NoteId, UserDocument, Username};
use crate::util::{compact_text, normalize_text_option};
use crate::{Error, Result};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE_ID: &str = "(default)";
const LIST_PAGE_SIZE: u32 = 300;

/// Connection settings for a Firestore database.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    /// Web API key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,
    /// OAuth access token, sent as a bearer token
    #[serde(default)]
    pub access_token: Option<String>,
    /// `host:port` of a local emulator; switches to plain HTTP
    #[serde(default)]
    pub emulator_host: Option<String>,
}

fn default_database_id() -> String {
    DEFAULT_DATABASE_ID.to_string()
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: default_database_id(),
            api_key: None,
            access_token: None,
            emulator_host: None,
        }
    }

    /// Root of the document tree, without a trailing slash
    pub fn documents_url(&self) -> String {
        let origin = normalize_text_option(self.emulator_host.clone()).map_or_else(
            || FIRESTORE_BASE_URL.to_string(),
            |host| format!("http://{}", host.trim_end_matches('/')),
        );
        format!(
            "{origin}/v1/projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("emulator_host", &self.emulator_host)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Document store backed by Cloud Firestore.
#[derive(Clone)]
pub struct FirestoreStore {
    config: FirestoreConfig,
    documents_url: String,
    client: Client,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::Config(
                "Firestore project id must not be empty".to_string(),
            ));
        }
        Ok(Self {
            documents_url: config.documents_url(),
            config,
            client: Client::builder().build()?,
        })
    }

    fn user_url(&self, username: &Username) -> String {
        format!(
            "{}/users/{}",
            self.documents_url,
            urlencoding::encode(username.as_str())
        )
    }

    fn notes_url(&self, username: &Username) -> String {
        format!("{}/notes", self.user_url(username))
    }

    fn note_url(&self, username: &Username, id: &NoteId) -> String {
        format!(
            "{}/{}",
            self.notes_url(username),
            urlencoding::encode(id.as_str())
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match self.config.api_key.as_deref() {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        match self.config.access_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        Ok(self.authorize(request).send().await?)
    }
}

async fn error_from_response(operation: &str, response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Error::Store(format!(
        "Firestore {operation} returned HTTP {status}: {}",
        compact_text(&body)
    ))
}

/// Read a response body as JSON.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn note_fields_body(fields: &NoteFields) -> Value {
    json!({
        "fields": {
            "title": { "stringValue": fields.title },
            "content": { "stringValue": fields.content },
        }
    })
}

fn user_body(document: &UserDocument) -> Value {
    let mut fields = Map::new();
    if let Some(password) = document.password() {
        fields.insert("password".to_string(), json!({ "stringValue": password }));
    }
    json!({ "fields": fields })
}

fn user_from_document(username: &Username, document: &RawDocument) -> UserDocument {
    string_field(&document.fields, "password").map_or_else(
        || {
            tracing::warn!("User document {username} has no string password field");
            UserDocument::without_password()
        },
        UserDocument::new,
    )
}

/// Last path segment of a document resource name
fn document_id(name: &str) -> Result<NoteId> {
    name.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(NoteId::new)
        .ok_or_else(|| Error::Store(format!("Malformed document name: {name}")))
}

fn note_from_document(document: RawDocument) -> Result<Note> {
    let id = document_id(&document.name)?;
    let title = string_field(&document.fields, "title").unwrap_or_else(|| {
        tracing::warn!("Note {id} has no string title; treating it as empty");
        String::new()
    });
    let content = string_field(&document.fields, "content").unwrap_or_else(|| {
        tracing::warn!("Note {id} has no string content; treating it as empty");
        String::new()
    });
    Ok(Note::new(id, NoteFields::new(title, content)))
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    async fn get_user(&self, username: &Username) -> Result<Option<UserDocument>> {
        let response = self.send(self.client.get(self.user_url(username))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response("get user", response).await);
        }

        let document: RawDocument = decode(response).await?;
        Ok(Some(user_from_document(username, &document)))
    }

    async fn create_user(&self, username: &Username, document: &UserDocument) -> Result<bool> {
        let request = self
            .client
            .post(format!("{}/users", self.documents_url))
            .query(&[("documentId", username.as_str())])
            .json(&user_body(document));
        let response = self.send(request).await?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(error_from_response("create user", response).await);
        }
        Ok(true)
    }

    async fn list_notes(&self, username: &Username) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.notes_url(username))
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(error_from_response("list notes", response).await);
            }

            let page: ListDocumentsResponse = decode(response).await?;
            for document in page.documents {
                notes.push(note_from_document(document)?);
            }

            match normalize_text_option(page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(notes)
    }

    async fn add_note(&self, username: &Username, fields: &NoteFields) -> Result<NoteId> {
        let request = self
            .client
            .post(self.notes_url(username))
            .json(&note_fields_body(fields));
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(error_from_response("add note", response).await);
        }

        let document: RawDocument = decode(response).await?;
        let id = document_id(&document.name)?;
        tracing::debug!("Firestore assigned note id {id}");
        Ok(id)
    }

    async fn set_note(
        &self,
        username: &Username,
        id: &NoteId,
        fields: &NoteFields,
    ) -> Result<()> {
        // PATCH without an update mask replaces the whole document.
        let request = self
            .client
            .patch(self.note_url(username, id))
            .json(&note_fields_body(fields));
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(error_from_response("set note", response).await);
        }
        Ok(())
    }

    async fn delete_note(&self, username: &Username, id: &NoteId) -> Result<()> {
        let response = self
            .send(self.client.delete(self.note_url(username, id)))
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response("delete note", response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn documents_url_targets_production_by_default() {
        let config = FirestoreConfig::new("notes-app");
        assert_eq!(
            config.documents_url(),
            "https://firestore.googleapis.com/v1/projects/notes-app/databases/(default)/documents"
        );
    }

    #[test]
    fn documents_url_uses_emulator_host() {
        let config = FirestoreConfig {
            emulator_host: Some("localhost:8080/".to_string()),
            ..FirestoreConfig::new("demo")
        };
        assert_eq!(
            config.documents_url(),
            "http://localhost:8080/v1/projects/demo/databases/(default)/documents"
        );
    }

    #[test]
    fn new_rejects_blank_project() {
        assert!(FirestoreStore::new(FirestoreConfig::new("  ")).is_err());
    }

    #[test]
    fn notes_stay_under_the_user_document() {
        let store = FirestoreStore::new(FirestoreConfig::new("p")).unwrap();
        let base = "/v1/projects/p/databases/(default)/documents";

        for raw in ["a.b", "...", "x..y"] {
            let username = Username::parse(raw).unwrap();
            let user = reqwest::Url::parse(&store.user_url(&username)).unwrap();
            let notes = reqwest::Url::parse(&store.notes_url(&username)).unwrap();
            assert_eq!(user.path(), format!("{base}/users/{raw}"));
            assert_eq!(notes.path(), format!("{base}/users/{raw}/notes"));
        }
        assert!(Username::parse("..").is_err());
    }

    #[test]
    fn user_without_password_field_never_verifies() {
        let alice = Username::parse("alice").unwrap();
        let document: RawDocument = parse_body(
            r#"{"name": "projects/p/databases/(default)/documents/users/alice",
                "fields": {"pass": {"stringValue": "pw"}}}"#,
        )
        .unwrap();
        assert_eq!(user_from_document(&alice, &document).password(), None);

        let document: RawDocument = parse_body(
            r#"{"name": "projects/p/databases/(default)/documents/users/alice",
                "fields": {"password": {"stringValue": "pw"}}}"#,
        )
        .unwrap();
        assert_eq!(user_from_document(&alice, &document).password(), Some("pw"));
    }

    #[test]
    fn malformed_body_is_a_serialization_error() {
        let error = parse_body::<RawDocument>("{ not json").unwrap_err();
        assert!(matches!(error, Error::Serialization(_)));
    }

    #[test]
    fn user_body_omits_missing_password() {
        assert_eq!(
            user_body(&UserDocument::without_password()),
            json!({ "fields": {} })
        );
        assert_eq!(
            user_body(&UserDocument::new("h")),
            json!({ "fields": { "password": { "stringValue": "h" } } })
        );
    }

    #[test]
    fn note_urls_escape_path_segments() {
        let store = FirestoreStore::new(FirestoreConfig::new("p")).unwrap();
        let username = Username::parse("ann marie").unwrap();
        let url = store.note_url(&username, &NoteId::new("abc"));
        assert!(url.ends_with("/users/ann%20marie/notes/abc"));
    }

    #[test]
    fn note_body_uses_string_values() {
        let body = note_fields_body(&NoteFields::new("Groceries", "Milk"));
        assert_eq!(
            body,
            json!({
                "fields": {
                    "title": { "stringValue": "Groceries" },
                    "content": { "stringValue": "Milk" },
                }
            })
        );
    }

    #[test]
    fn list_response_decodes_notes() {
        let payload = r#"
        {
          "documents": [
            {
              "name": "projects/p/databases/(default)/documents/users/alice/notes/Xy12",
              "fields": {
                "title": { "stringValue": "Groceries" },
                "content": { "stringValue": "Milk, eggs" }
              },
              "createTime": "2024-01-01T00:00:00Z",
              "updateTime": "2024-01-01T00:00:00Z"
            },
            {
              "name": "projects/p/databases/(default)/documents/users/alice/notes/Zz99",
              "fields": {
                "title": { "integerValue": "4" }
              }
            }
          ],
          "nextPageToken": ""
        }
        "#;

        let page: ListDocumentsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some(""));
        let notes = page
            .documents
            .into_iter()
            .map(note_from_document)
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(
            notes,
            vec![
                Note::new(NoteId::new("Xy12"), NoteFields::new("Groceries", "Milk, eggs")),
                Note::new(NoteId::new("Zz99"), NoteFields::new("", "")),
            ]
        );
    }

    #[test]
    fn empty_collection_decodes_to_no_documents() {
        let page: ListDocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn document_id_rejects_trailing_slash() {
        assert!(document_id("projects/p/documents/users/alice/notes/").is_err());
        assert_eq!(document_id("a/b/c").unwrap().as_str(), "c");
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = FirestoreConfig {
            api_key: Some("secret-key".to_string()),
            access_token: Some("secret-token".to_string()),
            ..FirestoreConfig::new("p")
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("secret-token"));
    }

    /// Run against the emulator: FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test firestore_emulator -- --ignored
    #[tokio::test]
    #[ignore = "Requires FIRESTORE_EMULATOR_HOST"]
    async fn firestore_emulator_roundtrip() {
        let host = std::env::var("FIRESTORE_EMULATOR_HOST").unwrap();
        let store = FirestoreStore::new(FirestoreConfig {
            emulator_host: Some(host),
            ..FirestoreConfig::new("cloudnote-test")
        })
        .unwrap();
        let username = Username::parse(&format!("user-{}", NoteId::generate())).unwrap();

        assert!(store
            .create_user(&username, &UserDocument::new("pw"))
            .await
            .unwrap());
        assert!(!store
            .create_user(&username, &UserDocument::new("pw"))
            .await
            .unwrap());

        let id = store
            .add_note(&username, &NoteFields::new("t", "c"))
            .await
            .unwrap();
        store
            .set_note(&username, &id, &NoteFields::new("t2", "c2"))
            .await
            .unwrap();
        let notes = store.list_notes(&username).await.unwrap();
        assert_eq!(notes, vec![Note::new(id.clone(), NoteFields::new("t2", "c2"))]);

        store.delete_note(&username, &id).await.unwrap();
        assert!(store.list_notes(&username).await.unwrap().is_empty());
    }
}
