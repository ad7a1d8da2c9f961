//! File validation, object naming and the upload-then-patch saga.

use uuid::Uuid;

use crate::models::campaign::{Campaign, UpdateCampaign};
use crate::models::graphic_asset::{GraphicAsset, NewGraphicAsset, UpdateGraphicAsset};
use crate::remote::{ObjectStorage, RemoteError};

use super::{ResourceStore, Toast};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Which files a form accepts.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// MIME prefixes; `image/` matches any image subtype.
    pub allowed: &'static [&'static str],
    pub max_bytes: usize,
}

/// Campaign covers.
pub const IMAGE_POLICY: UploadPolicy = UploadPolicy { allowed: &["image/"], max_bytes: MAX_UPLOAD_BYTES };

/// Graphic-asset files: images or PDF.
pub const ASSET_POLICY: UploadPolicy = UploadPolicy {
    allowed: &["image/", "application/pdf"],
    max_bytes: MAX_UPLOAD_BYTES,
};

/// A file field read from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Tipo de arquivo não permitido: {0}")]
    NotAllowedType(String),
    #[error("O arquivo excede o limite de {} MB", .max / (1024 * 1024))]
    TooLarge { size: usize, max: usize },
    #[error("O arquivo está vazio")]
    Empty,
}

impl UploadPolicy {
    pub fn accepts_type(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed.iter().any(|prefix| content_type.starts_with(prefix))
    }

    /// Type and size check. Runs before any remote call.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), UploadRejection> {
        if !self.accepts_type(&file.content_type) {
            return Err(UploadRejection::NotAllowedType(file.content_type.clone()));
        }
        if file.size() == 0 {
            return Err(UploadRejection::Empty);
        }
        if file.size() > self.max_bytes {
            return Err(UploadRejection::TooLarge { size: file.size(), max: self.max_bytes });
        }
        Ok(())
    }
}

/// Extension from the file name, else the MIME subtype, else `bin`.
pub fn extension(file_name: &str, content_type: &str) -> String {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext.to_ascii_lowercase();
    }

    content_type
        .split_once('/')
        .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub).trim())
        .filter(|sub| !sub.is_empty())
        .map(|sub| sub.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

/// `{parentId}-{timestampMillis}.{ext}`
pub fn object_key(parent: Uuid, timestamp_millis: i64, file: &UploadedFile) -> String {
    format!("{}-{}.{}", parent, timestamp_millis, extension(&file.file_name, &file.content_type))
}

/// A file that made it into object storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub key: String,
    pub public_url: String,
}

const REJECTED: &str = "Arquivo inválido";
const UPLOAD_FAILED: (&str, &str) = ("Erro no upload", "Não foi possível enviar o arquivo.");
const COVER_UPDATED: (&str, &str) = ("Capa atualizada!", "A imagem de capa foi salva.");
const COVER_FAILED: (&str, &str) = ("Erro ao atualizar capa", "Não foi possível salvar a imagem de capa.");

impl<R: super::Resource> ResourceStore<R> {
    /// Validate, then upload under a fresh key. Failures become toasts.
    pub async fn store_file(
        &mut self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        parent: Uuid,
        policy: &UploadPolicy,
        file: &UploadedFile,
    ) -> Option<StoredFile> {
        if let Err(rejection) = policy.validate(file) {
            log::warn!("Upload of {:?} rejected: {}", file.file_name, rejection);
            self.notify(Toast::error(REJECTED, &rejection.to_string()));
            return None;
        }

        let key = object_key(parent, chrono::Utc::now().timestamp_millis(), file);
        let result = storage
            .upload(&self.owner().access_token, bucket, &key, &file.content_type, file.bytes.clone())
            .await;
        match result {
            Ok(()) => {
                let public_url = storage.public_url(bucket, &key);
                Some(StoredFile { key, public_url })
            }
            Err(e) => {
                self.record_failure("upload", &e, UPLOAD_FAILED);
                None
            }
        }
    }

    /// Compensation for a stored file whose row write failed.
    async fn discard_file(&mut self, storage: &dyn ObjectStorage, bucket: &str, key: &str) {
        if let Err(e) = storage.remove(&self.owner().access_token, bucket, key).await {
            log::error!("Could not remove orphaned object {}/{}: {}", bucket, key, e);
        }
    }
}

impl ResourceStore<Campaign> {
    /// Upload a cover image and point the campaign at it. If the patch
    /// fails the uploaded object is removed and the campaign keeps its
    /// previous cover.
    pub async fn attach_cover(
        &mut self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        campaign_id: Uuid,
        file: &UploadedFile,
    ) -> Option<Campaign> {
        let stored = self.store_file(storage, bucket, campaign_id, &IMAGE_POLICY, file).await?;

        let patch = UpdateCampaign { cover_image: Some(stored.public_url.clone()), ..Default::default() };
        let patch = match serde_json::to_value(&patch) {
            Ok(v) => v,
            Err(e) => {
                self.record_failure("cover", &RemoteError::from(e), COVER_FAILED);
                self.discard_file(storage, bucket, &stored.key).await;
                return None;
            }
        };

        match self.apply_patch(campaign_id, patch).await {
            Ok(campaign) => {
                self.notify(Toast::success(COVER_UPDATED.0, COVER_UPDATED.1));
                self.sync_updated(campaign.clone()).await;
                Some(campaign)
            }
            Err(e) => {
                self.record_failure("cover", &e, COVER_FAILED);
                self.discard_file(storage, bucket, &stored.key).await;
                None
            }
        }
    }
}

impl ResourceStore<GraphicAsset> {
    /// Create an asset, uploading its file first when one was sent. A
    /// failed insert removes the uploaded object.
    pub async fn create_with_file(
        &mut self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        mut new: NewGraphicAsset,
        file: Option<&UploadedFile>,
    ) -> Option<GraphicAsset> {
        let Some(file) = file else {
            return self.create(&new).await;
        };
        let parent = self.parent()?;
        let stored = self.store_file(storage, bucket, parent, &ASSET_POLICY, file).await?;

        new.file_url = Some(stored.public_url.clone());
        new.file_name = Some(file.file_name.clone());
        new.file_size = Some(file.size() as i64);
        new.file_type = Some(file.content_type.clone());

        let created = self.create(&new).await;
        if created.is_none() {
            self.discard_file(storage, bucket, &stored.key).await;
        }
        created
    }

    /// Edit an asset, replacing its file when a new one was sent. A failed
    /// patch removes the new object and the row keeps its old file.
    pub async fn update_with_file(
        &mut self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        id: Uuid,
        mut patch: UpdateGraphicAsset,
        file: Option<&UploadedFile>,
    ) -> Option<GraphicAsset> {
        let Some(file) = file else {
            return self.update(id, &patch).await;
        };
        let parent = self.parent()?;
        let stored = self.store_file(storage, bucket, parent, &ASSET_POLICY, file).await?;

        patch.file_url = Some(stored.public_url.clone());
        patch.file_name = Some(file.file_name.clone());
        patch.file_size = Some(file.size() as i64);
        patch.file_type = Some(file.content_type.clone());

        let updated = self.update(id, &patch).await;
        if updated.is_none() {
            self.discard_file(storage, bucket, &stored.key).await;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile { file_name: name.into(), content_type: content_type.into(), bytes: vec![0u8; size] }
    }

    #[test]
    fn exactly_the_limit_is_accepted() {
        assert!(IMAGE_POLICY.validate(&file("a.png", "image/png", MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn one_byte_over_is_rejected() {
        let err = IMAGE_POLICY
            .validate(&file("a.png", "image/png", MAX_UPLOAD_BYTES + 1))
            .unwrap_err();
        assert!(matches!(err, UploadRejection::TooLarge { .. }));
        assert_eq!(err.to_string(), "O arquivo excede o limite de 5 MB");
    }

    #[test]
    fn non_images_are_rejected_for_covers() {
        let err = IMAGE_POLICY.validate(&file("a.pdf", "application/pdf", 10)).unwrap_err();
        assert_eq!(err, UploadRejection::NotAllowedType("application/pdf".into()));
    }

    #[test]
    fn asset_policy_also_takes_pdf() {
        assert!(ASSET_POLICY.validate(&file("brief.pdf", "application/pdf", 10)).is_ok());
        assert!(ASSET_POLICY.validate(&file("x.zip", "application/zip", 10)).is_err());
    }

    #[test]
    fn empty_file_is_rejected() {
        assert_eq!(IMAGE_POLICY.validate(&file("a.png", "image/png", 0)), Err(UploadRejection::Empty));
    }

    #[test]
    fn extension_prefers_file_name() {
        assert_eq!(extension("Capa.JPG", "image/png"), "jpg");
        assert_eq!(extension("capa", "image/webp"), "webp");
        assert_eq!(extension("logo", "image/svg+xml"), "svg");
        assert_eq!(extension("", ""), "bin");
    }

    #[test]
    fn object_key_has_parent_and_timestamp() {
        let parent = Uuid::new_v4();
        let key = object_key(parent, 1_700_000_000_000, &file("capa.png", "image/png", 1));
        assert_eq!(key, format!("{parent}-1700000000000.png"));
    }
}
