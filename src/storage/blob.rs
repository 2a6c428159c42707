use base64::Engine;
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::FlowError;
use crate::flow::field::AttachmentRef;
use crate::utils::{blobs_dir_in, ensure_dir};

use super::Result;

/// Content-addressed store for attachment bytes.
///
/// Bytes are written once under their SHA-256 digest; drafts carry only an
/// [`AttachmentRef`], keeping the serialized draft free of encoded payloads.
/// The transportable data-URL form is produced on demand at the submission
/// boundary.
#[derive(Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn new(base: &Path) -> Result<Self> {
        let dir = blobs_dir_in(base);
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn blob_path(&self, digest: &str) -> PathBuf {
        self.dir.join(digest)
    }

    /// Stores attachment bytes, returning the reference to persist in the
    /// draft. Storing identical content twice yields the same reference.
    pub fn put(
        &self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<AttachmentRef> {
        let digest = hex::encode(Sha256::digest(bytes));
        let path = self.blob_path(&digest);
        if !path.exists() {
            let tmp = path.with_extension("tmp");
            fs::write(&tmp, bytes)?;
            fs::rename(&tmp, &path)?;
        }
        Ok(AttachmentRef {
            digest,
            file_name: file_name.into(),
            content_type: content_type.into(),
            len: bytes.len() as u64,
        })
    }

    /// Reads the bytes behind a reference.
    pub fn read(&self, reference: &AttachmentRef) -> Result<Vec<u8>> {
        let path = self.blob_path(&reference.digest);
        if !path.exists() {
            return Err(FlowError::InvalidRef(format!(
                "attachment blob `{}` not found",
                reference.digest
            )));
        }
        Ok(fs::read(&path)?)
    }

    /// Encodes the referenced bytes as the data URL the gateway expects.
    pub fn data_url(&self, reference: &AttachmentRef) -> Result<String> {
        let bytes = self.read(reference)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{}", reference.content_type, encoded))
    }

    /// Deletes the referenced bytes, ignoring already-missing blobs.
    pub fn remove(&self, reference: &AttachmentRef) -> Result<()> {
        let path = self.blob_path(&reference.digest);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (BlobStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = BlobStore::new(temp.path()).expect("blob store");
        (store, temp)
    }

    #[test]
    fn put_is_content_addressed() {
        let (store, _guard) = store_with_temp_dir();
        let first = store.put("scan.png", "image/png", b"bytes").expect("put");
        let second = store.put("copy.png", "image/png", b"bytes").expect("put");
        assert_eq!(first.digest, second.digest);
        assert_eq!(store.read(&first).expect("read"), b"bytes");
    }

    #[test]
    fn data_url_encodes_content_type_and_payload() {
        let (store, _guard) = store_with_temp_dir();
        let reference = store.put("scan.png", "image/png", b"hi").expect("put");
        let url = store.data_url(&reference).expect("data url");
        assert_eq!(url, "data:image/png;base64,aGk=");
    }

    #[test]
    fn missing_blob_is_an_invalid_reference() {
        let (store, _guard) = store_with_temp_dir();
        let reference = AttachmentRef {
            digest: "ab".repeat(32),
            file_name: "gone.png".into(),
            content_type: "image/png".into(),
            len: 2,
        };
        assert!(matches!(
            store.read(&reference),
            Err(FlowError::InvalidRef(_))
        ));
    }
}
