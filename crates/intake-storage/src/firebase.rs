use crate::keys::{generate_storage_key, is_valid_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};

const FIREBASE_DOWNLOAD_BASE: &str = "https://firebasestorage.googleapis.com/v0/b";

/// Firebase Storage implementation
///
/// Firebase Storage buckets are plain Google Cloud Storage buckets, so writes go
/// through `object_store`'s GCS client. Credentials come from the environment
/// (`GOOGLE_SERVICE_ACCOUNT`, `GOOGLE_SERVICE_ACCOUNT_KEY` or
/// `GOOGLE_APPLICATION_CREDENTIALS`). Returned URLs use the Firebase download
/// endpoint and are readable when the bucket's security rules allow public
/// reads under `leads/`.
#[derive(Debug, Clone)]
pub struct FirebaseStorage {
    store: GoogleCloudStorage,
    bucket: String,
}

impl FirebaseStorage {
    /// Create a new FirebaseStorage instance
    ///
    /// # Arguments
    /// * `bucket` - Bucket name, e.g. "my-project.firebasestorage.app"
    pub async fn new(bucket: String) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(FirebaseStorage { store, bucket })
    }

    /// Public download URL for an object.
    pub fn download_url(&self, key: &str) -> String {
        firebase_download_url(&self.bucket, key)
    }
}

/// `https://firebasestorage.googleapis.com/v0/b/{bucket}/o/{encoded key}?alt=media`
pub fn firebase_download_url(bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/o/{}?alt=media",
        FIREBASE_DOWNLOAD_BASE,
        bucket,
        urlencoding::encode(key)
    )
}

#[async_trait]
impl Storage for FirebaseStorage {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let key = generate_storage_key(file_name);
        let size = data.len() as u64;
        let location = Path::from(key.clone());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Firebase upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.download_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Firebase upload successful"
        );

        Ok((key, url))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        if !is_valid_key(storage_key) {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        let location = Path::from(storage_key.to_string());

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Firebase
    }

    async fn check_connectivity(&self) -> StorageResult<()> {
        // A missing object still proves the bucket is reachable and we are authorized.
        match self.exists("leads/.healthcheck").await {
            Ok(_) => Ok(()),
            Err(e) => Err(StorageError::BackendError(format!(
                "Firebase bucket {} unreachable: {}",
                self.bucket, e
            ))),
        }
    }
}
