//! Product image storage
//!
//! Uploaded images are validated, re-encoded to JPEG and content-addressed
//! by SHA-256, so repeated uploads of the same picture map to one file.
//! Stored files are served statically under `/uploads/`.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::utils::AppError;

/// Maximum accepted upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted source formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored product images
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Validate, re-encode and store an uploaded image. Returns the public
    /// URL path (`/uploads/<hash>.jpg`).
    pub fn save(&self, data: &[u8], original_name: Option<&str>) -> Result<String, AppError> {
        validate_upload(data, original_name)?;

        let img = image::load_from_memory(data)
            .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

        // Re-encode to JPEG with a fixed quality
        let mut buffer = Vec::new();
        {
            let mut cursor = Cursor::new(&mut buffer);
            let rgb_img = img.to_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
            rgb_img
                .write_with_encoder(encoder)
                .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
        }

        let hash = hex::encode(Sha256::digest(&buffer));
        let filename = format!("{}.jpg", &hash[..16]);
        let path = self.dir.join(&filename);

        if !path.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| AppError::internal(format!("Failed to create uploads dir: {}", e)))?;
            fs::write(&path, &buffer)
                .map_err(|e| AppError::internal(format!("Failed to store image: {}", e)))?;
        }

        Ok(format!("/uploads/{}", filename))
    }
}

fn validate_upload(data: &[u8], original_name: Option<&str>) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty image upload"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if let Some(name) = original_name {
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported image format: {}",
                ext
            )));
        }
        // extension must also resolve to an image mime type
        let mime = mime_guess::from_path(name).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(AppError::validation("Uploaded file is not an image"));
        }
    }

    Ok(())
}
