use std::path::{Path, PathBuf};

use axum::extract::{Multipart, multipart::Field};
use stt::AudioFile;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::ProcessError;

/// Filename forwarded upstream when the file part carries none
const DEFAULT_FILENAME: &str = "audio";

/// Directory that holds uploads while their pipeline runs
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

/// Parsed `/process` form
pub struct Upload {
    pub audio: StagedAudio,
    pub model: Option<String>,
    pub prompt: Option<String>,
}

/// Uploaded audio written to a temporary file
///
/// The file is deleted when this value is dropped.
pub struct StagedAudio {
    file: AudioFile,
    _path: TempPath,
}

impl StagedAudio {
    pub const fn file(&self) -> &AudioFile {
        &self.file
    }
}

impl StagingArea {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the multipart form, streaming the `file` field to disk
    pub async fn receive(&self, mut multipart: Multipart) -> Result<Upload, ProcessError> {
        let mut audio = None;
        let mut model = None;
        let mut prompt = None;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ProcessError::MalformedRequest(format!("Failed to parse form: {e}")))?
        {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                // Only the first file part is used
                Some("file") if audio.is_none() => audio = Some(self.stage(&mut field).await?),
                Some("model") => model = Some(read_text(field, "model").await?),
                Some("prompt") => prompt = Some(read_text(field, "prompt").await?),
                _ => {}
            }
        }

        let audio = audio.ok_or_else(|| {
            ProcessError::MalformedRequest("Failed to get audio file: missing 'file' field".to_string())
        })?;

        Ok(Upload { audio, model, prompt })
    }

    async fn stage(&self, field: &mut Field<'_>) -> Result<StagedAudio, ProcessError> {
        let filename = field
            .file_name()
            .and_then(|name| Path::new(name).file_name())
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);

        let (file, path) = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&extension_suffix(&filename))
            .tempfile_in(&self.dir)
            .map_err(|e| ProcessError::Staging(format!("Failed to create temp file: {e}")))?
            .into_parts();

        let mut file = tokio::fs::File::from_std(file);
        let mut written: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ProcessError::MalformedRequest(format!("Failed to get audio file: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| ProcessError::Staging(format!("Failed to write temp file: {e}")))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| ProcessError::Staging(format!("Failed to write temp file: {e}")))?;

        tracing::debug!(path = %path.display(), bytes = written, filename = %filename, "upload staged");

        Ok(StagedAudio {
            file: AudioFile {
                path: path.to_path_buf(),
                filename,
                content_type,
            },
            _path: path,
        })
    }
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ProcessError> {
    field
        .text()
        .await
        .map_err(|e| ProcessError::MalformedRequest(format!("Failed to read {name} field: {e}")))
}

/// `.ext` of the uploaded filename, if it is a plain alphanumeric extension
fn extension_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(String::new, |ext| format!(".{ext}"))
}
