/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::snapd
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Query the snapd REST API over its Unix socket to enumerate
    installed snaps with version and publisher metadata.

  Security / Safety Notes:
    Performs a single read-only GET per call. No write
    operations, no retries, no credentials.

  Dependencies:
    reqwest over the snapd Unix socket, serde_json for
    response parsing.

  Operational Scope:
    Supplies the inspector with the installed-package inventory
    once per refresh cycle.

  Revision History:
    2026-10-18 COD  Implemented snapd socket client.
  ------------------------------------------------------------
  SSE Principles Observed:
    - One connection per request, released on return
    - Structured response parsing with explicit error paths
    - Failures surfaced immediately, never retried
============================================================*/

use serde_json::Value;

use crate::config::SnapdConfig;
use crate::error::{Result, SnapL10nError};
use crate::package_info::PackageRecord;

const DEFAULT_ERROR_MESSAGE: &str = "snapd error";

/// Client for the snapd REST API.
#[derive(Debug, Clone)]
pub struct SnapdClient {
    client: reqwest::Client,
    url: String,
}

impl SnapdClient {
    /// Construct a new client from configuration.
    pub fn new(config: &SnapdConfig) -> Result<Self> {
        // The host is ignored on a Unix socket; snapd expects `localhost`.
        let client = reqwest::Client::builder()
            .unix_socket(config.socket_path.clone())
            .pool_max_idle_per_host(0)
            .user_agent("Snap-L10n-Core/0.2 (linux)")
            .build()
            .map_err(|err| {
                SnapL10nError::RegistryUnavailable(format!("Failed to build snapd client: {err}"))
            })?;

        Ok(Self {
            client,
            url: format!("http://localhost{}", config.endpoint),
        })
    }

    /// List installed snaps in the order snapd reports them.
    pub async fn list_installed_packages(&self) -> Result<Vec<PackageRecord>> {
        let response = self.client.get(&self.url).send().await.map_err(|err| {
            SnapL10nError::RegistryUnavailable(format!("snapd request to {} failed: {err}", self.url))
        })?;
        let status = response.status();
        let payload = response.bytes().await.map_err(|err| {
            SnapL10nError::RegistryUnavailable(format!("failed to read snapd response: {err}"))
        })?;

        let body: Value = serde_json::from_slice(&payload).map_err(|err| {
            SnapL10nError::RegistryUnavailable(format!(
                "malformed response from {} (HTTP {}): {err}",
                self.url,
                status.as_u16()
            ))
        })?;

        if body.get("type").and_then(Value::as_str) == Some("error") {
            let message = body
                .get("result")
                .and_then(|result| result.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_ERROR_MESSAGE);
            return Err(SnapL10nError::RegistryUnavailable(message.to_string()));
        }

        if !status.is_success() {
            return Err(SnapL10nError::RegistryUnavailable(format!(
                "{} answered HTTP {}",
                self.url,
                status.as_u16()
            )));
        }

        decode_snap_list(&body).ok_or_else(|| {
            SnapL10nError::RegistryUnavailable(format!(
                "malformed response from {}: expected a list of snaps",
                self.url
            ))
        })
    }
}

// snapd wraps payloads in `result`, but the top-level body is accepted too
// when `result` is not a list. This is a compatibility shim, not a protocol
// guarantee. Entries that are not objects are skipped.
fn decode_snap_list(body: &Value) -> Option<Vec<PackageRecord>> {
    let entries = match body.get("result").and_then(Value::as_array) {
        Some(entries) => entries,
        None => body.as_array()?,
    };
    Some(entries.iter().filter_map(snap_record).collect())
}

// Non-string `name`/`version` values decode as empty strings.
fn snap_record(entry: &Value) -> Option<PackageRecord> {
    let fields = entry.as_object()?;
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(PackageRecord::new(
        text("name"),
        text("version"),
        resolve_publisher(fields.get("publisher")),
    ))
}

/// Publisher precedence: `display-name`, then `username`, then empty.
fn resolve_publisher(publisher: Option<&Value>) -> String {
    match publisher {
        Some(Value::Object(fields)) => ["display-name", "username"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(name)) => name.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::config::InspectConfig;
    use crate::inspector::TranslationInspector;
    use crate::logger::Logger;
    use crate::package_info::TranslationStatus;
    use crate::report::build_report;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixListener;

    /// Serve one canned response and hand back the request line.
    fn serve_once(socket_path: PathBuf, response: String) -> tokio::task::JoinHandle<String> {
        let listener = UnixListener::bind(&socket_path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).await.unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            reader.get_mut().write_all(response.as_bytes()).await.unwrap();
            reader.get_mut().shutdown().await.unwrap();
            request_line
        })
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client_for(socket_path: PathBuf) -> SnapdClient {
        SnapdClient::new(&SnapdConfig {
            socket_path,
            ..SnapdConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn lists_snaps_from_result_field() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let body = r#"{"type":"sync","status-code":200,"result":[
            {"name":"firefox","version":"130.0","publisher":{"username":"mozilla","display-name":"Mozilla"}},
            {"name":"core22","version":"20240111","publisher":{"username":"canonical","display-name":""}},
            {"name":"local-thing","version":"0.1"}
        ]}"#;
        let server = serve_once(socket.clone(), json_response("200 OK", body));

        let snaps = client_for(socket).list_installed_packages().await.unwrap();
        assert_eq!(
            snaps,
            vec![
                PackageRecord::new("firefox", "130.0", "Mozilla"),
                PackageRecord::new("core22", "20240111", "canonical"),
                PackageRecord::new("local-thing", "0.1", ""),
            ]
        );
        assert_eq!(server.await.unwrap(), "GET /v2/snaps HTTP/1.1\r\n");
    }

    #[tokio::test]
    async fn error_document_becomes_registry_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let body = r#"{"type":"error","result":{"message":"no such daemon"}}"#;
        let server = serve_once(socket.clone(), json_response("500 Internal Server Error", body));

        let err = client_for(socket).list_installed_packages().await.unwrap_err();
        match err {
            SnapL10nError::RegistryUnavailable(message) => assert_eq!(message, "no such daemon"),
            other => panic!("unexpected error {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn error_without_message_uses_generic_text() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let server = serve_once(
            socket.clone(),
            json_response("400 Bad Request", r#"{"type":"error"}"#),
        );

        let err = client_for(socket).list_installed_packages().await.unwrap_err();
        assert!(matches!(err, SnapL10nError::RegistryUnavailable(ref m) if m == "snapd error"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn failing_status_without_error_document_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let server = serve_once(
            socket.clone(),
            json_response("503 Service Unavailable", r#"{"type":"sync","result":[]}"#),
        );

        let err = client_for(socket).list_installed_packages().await.unwrap_err();
        match err {
            SnapL10nError::RegistryUnavailable(message) => {
                assert!(message.contains("503"), "status missing from `{message}`")
            }
            other => panic!("unexpected error {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn result_that_is_not_a_list_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let server = serve_once(
            socket.clone(),
            json_response("200 OK", r#"{"type":"sync","result":{"name":"firefox"}}"#),
        );

        let err = client_for(socket).list_installed_packages().await.unwrap_err();
        match err {
            SnapL10nError::RegistryUnavailable(message) => {
                assert!(message.contains("expected a list of snaps"), "{message}")
            }
            other => panic!("unexpected error {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn chunked_body_without_result_wrapper_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let body = r#"[{"name":"hello","version":"2.10","publisher":"someone"}]"#;
        let (first, second) = body.split_at(10);
        let response = format!(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n{first}\r\n{:x}\r\n{second}\r\n0\r\n\r\n",
            first.len(),
            second.len()
        );
        let server = serve_once(socket.clone(), response);

        let snaps = client_for(socket).list_installed_packages().await.unwrap();
        assert_eq!(snaps, vec![PackageRecord::new("hello", "2.10", "someone")]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn missing_socket_is_registry_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = client_for(dir.path().join("absent.socket"))
            .list_installed_packages()
            .await
            .unwrap_err();
        assert!(matches!(err, SnapL10nError::RegistryUnavailable(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_registry_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("snapd.socket");
        let server = serve_once(socket.clone(), json_response("200 OK", "<html>nope</html>"));

        let err = client_for(socket).list_installed_packages().await.unwrap_err();
        assert!(matches!(err, SnapL10nError::RegistryUnavailable(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refresh_classifies_registry_snaps_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let snap_root = dir.path().join("snap");
        let alpha = snap_root.join("alpha/current/usr/share/locale/fr/LC_MESSAGES");
        fs::create_dir_all(&alpha).unwrap();
        fs::write(alpha.join("x.mo"), b"mo").unwrap();
        let beta = snap_root.join("beta/current/meta/gui");
        fs::create_dir_all(&beta).unwrap();
        fs::write(beta.join("beta.desktop"), "[Desktop Entry]\nName=Beta\n").unwrap();

        let socket = dir.path().join("snapd.socket");
        let body = r#"{"type":"sync","result":[
            {"name":"beta","version":"2"},
            {"name":"alpha","version":"1"}
        ]}"#;
        let server = serve_once(socket.clone(), json_response("200 OK", body));

        let packages = client_for(socket).list_installed_packages().await.unwrap();
        let inspector = TranslationInspector::new(&InspectConfig {
            snap_root,
            ..InspectConfig::default()
        });
        let logger = Logger::new(None, false).unwrap();
        let document = build_report(&packages, &inspector, &logger);

        let statuses: Vec<(&str, TranslationStatus)> = document
            .snaps
            .iter()
            .map(|snap| (snap.name(), snap.status()))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("alpha", TranslationStatus::Partial),
                ("beta", TranslationStatus::None),
            ]
        );
        server.await.unwrap();
    }

    #[test]
    fn null_fields_do_not_sink_the_list() {
        let body = serde_json::json!({"type": "sync", "result": [
            {"name": "good", "version": "1"},
            {"name": "odd", "version": null, "publisher": null},
            {"name": 7, "version": "3"},
            "not-an-object"
        ]});
        assert_eq!(
            decode_snap_list(&body),
            Some(vec![
                PackageRecord::new("good", "1", ""),
                PackageRecord::new("odd", "", ""),
                PackageRecord::new("", "3", ""),
            ])
        );
    }

    #[test]
    fn result_shim_falls_back_to_whole_body() {
        let bare = serde_json::json!([{"name": "hello", "version": "2.10"}]);
        assert_eq!(
            decode_snap_list(&bare),
            Some(vec![PackageRecord::new("hello", "2.10", "")])
        );
        let object_result = serde_json::json!({"type": "sync", "result": {"name": "hello"}});
        assert_eq!(decode_snap_list(&object_result), None);
    }

    #[test]
    fn publisher_precedence() {
        let both = serde_json::json!({"display-name": "Mozilla", "username": "mozilla"});
        assert_eq!(resolve_publisher(Some(&both)), "Mozilla");
        let user_only = serde_json::json!({"username": "canonical"});
        assert_eq!(resolve_publisher(Some(&user_only)), "canonical");
        assert_eq!(resolve_publisher(Some(&serde_json::json!({}))), "");
        assert_eq!(resolve_publisher(None), "");
        assert_eq!(resolve_publisher(Some(&Value::Null)), "");
    }
}
