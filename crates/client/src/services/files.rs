//! File service (`{files_url}/api/files`).

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::error::ClientError;

/// Multipart field the file service reads the upload from.
pub const UPLOAD_FIELD: &str = "inputFile";

/// Metadata the file service returns for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "tcc_core::types::null_as_default")]
    pub size: u64,
    /// URI to store on the referencing entity.
    pub uri: String,
}

pub struct FileService<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn files(&self) -> FileService<'_> {
        FileService { api: self }
    }
}

impl FileService<'_> {
    /// Upload one file. Only one upload runs at a time per client; a
    /// second call while one is in flight fails with
    /// [`ClientError::Busy`].
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, ClientError> {
        let _guard = self.api.upload_gate().try_acquire()?;

        let size = bytes.len();
        let mut part = Part::bytes(bytes).file_name(file_name.to_string());
        if let Some(mime) = content_type {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        let uploaded: UploadedFile = self.api.upload("/api/files", form).await?;
        tracing::info!(file = file_name, size, uri = %uploaded.uri, "File uploaded");
        Ok(uploaded)
    }
}
