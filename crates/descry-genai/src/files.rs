//! Remote file store client: upload, status reads, await-ready polling.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, info};

use descry_types::{FileState, MediaKind, UploadedFile};

use crate::error::GenAiError;

/// Fixed-interval polling policy for uploads that process asynchronously.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Maximum status reads before giving up.
    pub max_checks: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_checks: 60,
        }
    }
}

/// HTTP client for the remote file store.
pub struct FileStoreClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll: PollPolicy,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

impl FileStoreClient {
    /// Create a new client against `base_url` with the given credential.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll: PollPolicy::default(),
        }
    }

    /// Replace the default polling policy.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Upload a local file, returning the remote file record.
    pub async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile, GenAiError> {
        let data = tokio::fs::read(path).await?;

        let metadata = serde_json::json!({
            "file": { "mimeType": mime_type, "displayName": display_name }
        });
        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part("file", multipart::Part::bytes(data).mime_str(mime_type)?);

        let resp = self
            .client
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "multipart")
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenAiError::Upload(format!("{status}: {body}")));
        }

        let parsed: UploadResponse = resp.json().await?;
        info!(name = %parsed.file.name, mime_type, "file uploaded");
        Ok(parsed.file)
    }

    /// Fetch the current remote record for `name` (e.g. "files/abc123").
    pub async fn get_file(&self, name: &str) -> Result<UploadedFile, GenAiError> {
        let resp = self
            .client
            .get(format!("{}/v1beta/{name}", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenAiError::Upload(format!("status read {status}: {body}")));
        }
        Ok(resp.json().await?)
    }

    /// Upload the fixed file for `kind` and wait until the remote store is
    /// done with it.
    ///
    /// Kinds whose processing is synchronous return right after the upload
    /// with state `Ready`. For the rest the state is read once, then
    /// re-read every `PollPolicy::interval` until it leaves `Processing`,
    /// up to `PollPolicy::max_checks` reads in total.
    pub async fn await_ready(
        &self,
        kind: MediaKind,
        path: &Path,
    ) -> Result<UploadedFile, GenAiError> {
        let uploaded = self
            .upload_file(path, kind.mime_type(), kind.display_name())
            .await?;

        if !kind.pollable() {
            return Ok(UploadedFile {
                state: FileState::Ready,
                ..uploaded
            });
        }

        let mut file = self.get_file(&uploaded.name).await?;
        let mut checks: u32 = 1;
        while file.state == FileState::Processing {
            if checks >= self.poll.max_checks {
                return Err(GenAiError::ProcessingTimeout { kind, checks });
            }
            debug!(%kind, checks, "file still processing");
            tokio::time::sleep(self.poll.interval).await;
            file = self.get_file(&uploaded.name).await?;
            checks += 1;
        }

        if file.state == FileState::Failed {
            return Err(GenAiError::ProcessingFailed(kind));
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_policy() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_checks: 10,
        }
    }

    fn temp_media(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    fn upload_body(state: &str) -> String {
        format!(
            r#"{{"file":{{"name":"files/abc123","uri":"https://files.example/abc123","mimeType":"audio/mp3","state":"{state}"}}}}"#
        )
    }

    fn file_body(state: &str) -> String {
        format!(
            r#"{{"name":"files/abc123","uri":"https://files.example/abc123","mimeType":"audio/mp3","state":"{state}"}}"#
        )
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = FileStoreClient::new("http://localhost:9999/", "k");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[tokio::test]
    async fn test_upload_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let media = temp_media(b"jpeg bytes");
        let client = FileStoreClient::new(&server.url(), "bad-key");
        let err = client
            .await_ready(MediaKind::Image, media.path())
            .await
            .unwrap_err();
        match err {
            GenAiError::Upload(msg) => assert!(msg.contains("403")),
            other => panic!("expected Upload error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_local_file_is_io_error() {
        let client = FileStoreClient::new("http://localhost:9999", "k");
        let err = client
            .await_ready(MediaKind::Image, Path::new("/nonexistent/jetpack.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::Io(_)));
    }

    #[tokio::test]
    async fn test_non_pollable_returns_immediately() {
        let mut server = mockito::Server::new_async().await;
        let upload = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upload_body("PROCESSING"))
            .expect(1)
            .create_async()
            .await;
        // A status read would be a protocol violation for non-pollable kinds.
        let status = server
            .mock("GET", "/v1beta/files/abc123")
            .expect(0)
            .create_async()
            .await;

        let media = temp_media(b"jpeg bytes");
        let client = FileStoreClient::new(&server.url(), "k").with_poll_policy(test_policy());
        let file = client
            .await_ready(MediaKind::Image, media.path())
            .await
            .unwrap();

        assert_eq!(file.state, FileState::Ready);
        upload.assert_async().await;
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_pollable_first_read_terminal_reads_exactly_once() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upload_body("PROCESSING"))
            .create_async()
            .await;
        let status = server
            .mock("GET", "/v1beta/files/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(file_body("ACTIVE"))
            .expect(1)
            .create_async()
            .await;

        let media = temp_media(b"mp3 bytes");
        let client = FileStoreClient::new(&server.url(), "k").with_poll_policy(test_policy());
        let file = client
            .await_ready(MediaKind::Audio, media.path())
            .await
            .unwrap();

        assert_eq!(file.state, FileState::Ready);
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_processing_then_ready_takes_one_poll_cycle() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upload_body("PROCESSING"))
            .create_async()
            .await;

        let reads = Arc::new(AtomicUsize::new(0));
        let reads_in_mock = reads.clone();
        let status = server
            .mock("GET", "/v1beta/files/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |_| {
                match reads_in_mock.fetch_add(1, Ordering::SeqCst) {
                    0 => file_body("PROCESSING").into_bytes(),
                    _ => file_body("READY").into_bytes(),
                }
            })
            .expect(2)
            .create_async()
            .await;

        let media = temp_media(b"mp3 bytes");
        let client = FileStoreClient::new(&server.url(), "k").with_poll_policy(test_policy());
        let file = client
            .await_ready(MediaKind::Audio, media.path())
            .await
            .unwrap();

        assert_eq!(file.state, FileState::Ready);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_processing_twice_then_failed() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upload_body("PROCESSING"))
            .create_async()
            .await;

        let reads = Arc::new(AtomicUsize::new(0));
        let reads_in_mock = reads.clone();
        let status = server
            .mock("GET", "/v1beta/files/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |_| {
                match reads_in_mock.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 => file_body("PROCESSING").into_bytes(),
                    _ => file_body("FAILED").into_bytes(),
                }
            })
            .expect(3)
            .create_async()
            .await;

        let media = temp_media(b"mp4 bytes");
        let client = FileStoreClient::new(&server.url(), "k").with_poll_policy(test_policy());
        let err = client
            .await_ready(MediaKind::Video, media.path())
            .await
            .unwrap_err();

        assert!(matches!(err, GenAiError::ProcessingFailed(MediaKind::Video)));
        // Two sleep/poll cycles after the initial read
        assert_eq!(reads.load(Ordering::SeqCst), 3);
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_poll_bound_exceeded_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _upload = server
            .mock("POST", "/upload/v1beta/files")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upload_body("PROCESSING"))
            .create_async()
            .await;
        let status = server
            .mock("GET", "/v1beta/files/abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(file_body("PROCESSING"))
            .expect(3)
            .create_async()
            .await;

        let media = temp_media(b"mp4 bytes");
        let client = FileStoreClient::new(&server.url(), "k").with_poll_policy(PollPolicy {
            interval: Duration::from_millis(1),
            max_checks: 3,
        });
        let err = client
            .await_ready(MediaKind::Video, media.path())
            .await
            .unwrap_err();

        match err {
            GenAiError::ProcessingTimeout { kind, checks } => {
                assert_eq!(kind, MediaKind::Video);
                assert_eq!(checks, 3);
            }
            other => panic!("expected ProcessingTimeout, got {other:?}"),
        }
        status.assert_async().await;
    }
}
