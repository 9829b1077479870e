//! Source file uploads.
//!
//! Uploads use a three-step handshake: request a presigned URL and pending
//! source id from the backend, PUT the raw bytes directly to object storage,
//! then notify the backend so it can finalize the source record. Presigned
//! URLs may name internal-only hosts (`minio:9000`); those are rewritten to
//! the configured public endpoint before the PUT is issued.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use futures_util::future::join_all;
use serde_json::json;
use tokio_util::io::ReaderStream;

use crate::client::PlatformClient;
use crate::models::PresignedUpload;
use crate::ui::progress_bar;

const INTERNAL_STORAGE_HOST: &str = "minio:9000";

// === Types ===

/// One successfully uploaded and finalized source.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub source_id: String,
    pub file_name: String,
}

// === Upload Flow ===

/// Upload a single file through the presigned handshake.
pub async fn upload_source(client: &PlatformClient, path: &Path) -> Result<UploadOutcome> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let presigned: PresignedUpload = client
        .post_json(
            "/api/v1/sources/upload-url",
            &json!({ "filename": file_name }),
        )
        .await
        .with_context(|| format!("Failed to request upload URL for {file_name}"))?;

    let target = match client.session().storage_url.as_deref() {
        Some(public) => rewrite_presigned_url(&presigned.upload_url, public),
        None => presigned.upload_url.clone(),
    };

    put_file(&target, path)
        .await
        .with_context(|| format!("Failed to upload {file_name} to object storage"))?;

    let _: serde_json::Value = client
        .post_json(
            &format!("/api/v1/sources/{}/complete", presigned.source_id),
            &json!({ "filename": file_name }),
        )
        .await
        .with_context(|| format!("Failed to finalize upload of {file_name}"))?;

    Ok(UploadOutcome {
        source_id: presigned.source_id,
        file_name,
    })
}

/// Upload a batch of files concurrently.
///
/// All uploads run in parallel; the batch succeeds only if every file
/// succeeds. On failure the first error (in file order) is propagated and
/// sibling in-flight uploads are left to finish on their own - their results
/// are simply not surfaced.
pub async fn upload_batch(
    client: &PlatformClient,
    paths: &[PathBuf],
) -> Result<Vec<UploadOutcome>> {
    let uploads = join_all(paths.iter().map(|path| upload_source(client, path))).await;

    let mut outcomes = Vec::with_capacity(uploads.len());
    for result in uploads {
        outcomes.push(result?);
    }
    Ok(outcomes)
}

/// Rewrite a presigned URL that names the internal storage host to use the
/// public endpoint instead. URLs without the internal fragment pass through
/// unchanged.
#[must_use]
pub fn rewrite_presigned_url(url: &str, public_endpoint: &str) -> String {
    match url.find(INTERNAL_STORAGE_HOST) {
        Some(index) => {
            let rest = &url[index + INTERNAL_STORAGE_HOST.len()..];
            format!("{}{}", public_endpoint.trim_end_matches('/'), rest)
        }
        None => url.to_string(),
    }
}

/// PUT raw file bytes to the presigned URL. The presigned URL carries its
/// own authorization, so this request goes out on a bare client without the
/// platform auth headers.
async fn put_file(url: &str, path: &Path) -> Result<()> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let total = file.metadata().await?.len();

    let label = format!("Uploading {}...", path.display());
    let progress = progress_bar(total, &label);
    let progress_clone = progress.clone();
    let stream = ReaderStream::new(file).map_ok(move |chunk| {
        progress_clone.inc(chunk.len() as u64);
        chunk
    });
    let body = reqwest::Body::wrap_stream(stream);

    let response = reqwest::Client::new()
        .put(url)
        .header(reqwest::header::CONTENT_LENGTH, total)
        .body(body)
        .send()
        .await?;
    progress.finish_and_clear();

    if !response.status().is_success() {
        let status = response.status();
        anyhow::bail!("Object storage rejected the upload: HTTP {}", status.as_u16());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn internal_host_is_rewritten_to_public_endpoint() {
        let url = "http://minio:9000/bucket/key?X-Amz-Signature=abc";
        let rewritten = rewrite_presigned_url(url, "https://storage.example.com");
        assert_eq!(
            rewritten,
            "https://storage.example.com/bucket/key?X-Amz-Signature=abc"
        );
    }

    #[test]
    fn public_urls_pass_through_unchanged() {
        let url = "https://storage.example.com/bucket/key?X-Amz-Signature=abc";
        assert_eq!(
            rewrite_presigned_url(url, "https://public.example.com"),
            url
        );
    }

    #[test]
    fn trailing_slash_on_public_endpoint_is_trimmed() {
        let url = "http://minio:9000/bucket/key";
        assert_eq!(
            rewrite_presigned_url(url, "https://storage.example.com/"),
            "https://storage.example.com/bucket/key"
        );
    }
}
