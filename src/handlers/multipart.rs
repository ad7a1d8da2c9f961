//! Multipart form reading for the forms that carry a file.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::store::upload::UploadedFile;

/// Text fields longer than this are refused outright.
const MAX_TEXT_FIELD: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Deserialize the text fields into a form struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let value = serde_json::to_value(&self.fields)
            .map_err(|e| AppError::Upload(format!("Formulário inválido: {e}")))?;
        serde_json::from_value(value).map_err(|e| AppError::Upload(format!("Formulário inválido: {e}")))
    }

    pub fn csrf_token(&self) -> &str {
        self.fields.get("csrf_token").map(String::as_str).unwrap_or_default()
    }
}

/// Read every part. The file part named `file_field` is buffered up to
/// `max_bytes + 1` bytes, enough for validation to see it is too large
/// without holding the whole body. A file input left empty yields no file.
pub async fn read(mut payload: Multipart, file_field: &str, max_bytes: usize) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            let content_type = field
                .content_type()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_default();

            let cap = max_bytes.saturating_add(1);
            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                let room = cap.saturating_sub(bytes.len());
                bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }

            if !(file_name.is_empty() && bytes.is_empty()) {
                form.file = Some(UploadedFile { file_name, content_type, bytes });
            }
        } else {
            let mut value = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                if value.len() + chunk.len() > MAX_TEXT_FIELD {
                    return Err(AppError::Upload(format!("Campo {name} muito grande")));
                }
                value.extend_from_slice(&chunk);
            }
            form.fields.insert(name, String::from_utf8_lossy(&value).into_owned());
        }
    }

    Ok(form)
}
