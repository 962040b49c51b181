// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan persistence — write the original and processed images to disk with a
// JSON metadata record per scan.
//
// Layout under the data directory:
//
//   scans/<uuid>/original.png
//   scans/<uuid>/rectified.png
//   scans/<uuid>/scan.json

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flatscan_core::{FlatscanError, RasterImage, Result, ScanOutcome, ScanResult};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::data_dir;

const SCANS_DIR: &str = "scans";
const ORIGINAL_FILE: &str = "original.png";
const RECTIFIED_FILE: &str = "rectified.png";
const METADATA_FILE: &str = "scan.json";

/// Metadata for one persisted scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScan {
    pub id: Uuid,
    /// Name of the file the user scanned.
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub original_path: PathBuf,
    /// SHA-256 (hex) of the stored original PNG.
    pub original_sha256: String,
    pub rectified_path: PathBuf,
    /// SHA-256 (hex) of the stored rectified PNG.
    pub rectified_sha256: String,
    pub warning: bool,
    pub outcome: ScanOutcome,
}

/// Somewhere finished scans can be kept.
pub trait ScanStore {
    /// Persist the source image and the scan output under a fresh id.
    fn save(&self, original: &RasterImage, result: &ScanResult, filename: &str)
    -> Result<StoredScan>;

    /// Look up a previously saved scan.
    fn load(&self, id: Uuid) -> Result<StoredScan>;
}

/// [`ScanStore`] backed by a plain directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    scans_dir: PathBuf,
}

impl DirectoryStore {
    /// Open (and create if needed) the store under `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let scans_dir = data_dir::data_subdir(root, SCANS_DIR)?;
        debug!(path = %scans_dir.display(), "Scan store opened");
        Ok(Self { scans_dir })
    }

    fn scan_dir(&self, id: Uuid) -> PathBuf {
        self.scans_dir.join(id.to_string())
    }
}

impl ScanStore for DirectoryStore {
    #[instrument(skip(self, original, result))]
    fn save(
        &self,
        original: &RasterImage,
        result: &ScanResult,
        filename: &str,
    ) -> Result<StoredScan> {
        let id = Uuid::new_v4();
        let dir = self.scan_dir(id);
        std::fs::create_dir_all(&dir)?;

        let original_png = encode_png(original)?;
        let rectified_png = encode_png(result.image())?;

        let original_path = dir.join(ORIGINAL_FILE);
        let rectified_path = dir.join(RECTIFIED_FILE);
        std::fs::write(&original_path, &original_png)?;
        std::fs::write(&rectified_path, &rectified_png)?;

        let record = StoredScan {
            id,
            filename: filename.to_owned(),
            created_at: Utc::now(),
            original_path,
            original_sha256: hash_bytes(&original_png),
            rectified_path,
            rectified_sha256: hash_bytes(&rectified_png),
            warning: result.warning(),
            outcome: result.outcome(),
        };

        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(dir.join(METADATA_FILE), json)?;

        info!(%id, outcome = ?record.outcome, "Scan stored");
        Ok(record)
    }

    fn load(&self, id: Uuid) -> Result<StoredScan> {
        let path = self.scan_dir(id).join(METADATA_FILE);
        let data = std::fs::read_to_string(&path).map_err(|err| {
            FlatscanError::Storage(format!("no scan {id} at {}: {err}", path.display()))
        })?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .as_dynamic()
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| FlatscanError::ImageError(format!("PNG encoding failed: {err}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn tiny(value: u8) -> RasterImage {
        RasterImage::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 6, Luma([value]))))
            .expect("non-empty")
    }

    #[test]
    fn hash_empty_input() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = DirectoryStore::open(tmp.path()).expect("store");

        let original = tiny(40);
        let result = ScanResult::passthrough(original.clone());
        let saved = store.save(&original, &result, "receipt.jpg").expect("saved");

        assert_eq!(saved.filename, "receipt.jpg");
        assert!(saved.warning);
        assert_eq!(saved.outcome, ScanOutcome::Passthrough);
        assert_eq!(store.load(saved.id).expect("loaded"), saved);
    }

    #[test]
    fn stored_files_match_their_hashes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = DirectoryStore::open(tmp.path()).expect("store");

        let original = tiny(10);
        let result = ScanResult::passthrough(tiny(200));
        let saved = store.save(&original, &result, "page.png").expect("saved");

        let bytes = std::fs::read(&saved.original_path).expect("original on disk");
        assert_eq!(hash_bytes(&bytes), saved.original_sha256);
        let bytes = std::fs::read(&saved.rectified_path).expect("rectified on disk");
        assert_eq!(hash_bytes(&bytes), saved.rectified_sha256);
        assert_ne!(saved.original_sha256, saved.rectified_sha256);

        let reread = image::open(&saved.rectified_path).expect("valid png");
        assert_eq!((reread.width(), reread.height()), (8, 6));
    }

    #[test]
    fn each_save_gets_a_new_id() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = DirectoryStore::open(tmp.path()).expect("store");
        let original = tiny(1);
        let result = ScanResult::passthrough(original.clone());
        let a = store.save(&original, &result, "a.png").expect("saved");
        let b = store.save(&original, &result, "a.png").expect("saved");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn unknown_id_is_a_storage_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = DirectoryStore::open(tmp.path()).expect("store");
        let err = store.load(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, FlatscanError::Storage(_)));
    }
}
