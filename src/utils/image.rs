//! Utility functions for image loading.
//!
//! This module provides functions for checking upload names, spooling upload
//! bytes to a temporary file, and decoding images from disk into `RgbImage`.
//! Decoding sniffs the content, so a PNG named `.jpg` still loads.

use crate::core::constants::{ACCEPTED_EXTENSIONS, DEFAULT_PARALLEL_THRESHOLD};
use crate::core::{BanaError, BanaResult};
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Converts a DynamicImage to an RgbImage.
///
/// Alpha is dropped and grayscale is expanded to three channels.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Checks that a file name carries one of the accepted image extensions.
///
/// The comparison ignores case. Returns the lower-cased extension.
///
/// # Errors
///
/// Returns `BanaError::UnsupportedExtension` for any other extension, including none.
pub fn check_extension(file_name: &str) -> BanaResult<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(BanaError::UnsupportedExtension {
            extension,
            accepted: ACCEPTED_EXTENSIONS.join(", "),
        })
    }
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// * `BanaError::Io` if the file cannot be opened
/// * `BanaError::InputFormat` if the content is not a decodable image
pub fn load_image(path: &Path) -> BanaResult<RgbImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(dynamic_to_rgb(img))
}

/// Loads a batch of images from file paths.
///
/// Each path gets its own result so one bad file does not hide the others.
/// Loading runs in parallel above [`DEFAULT_PARALLEL_THRESHOLD`] images.
pub fn load_images_batch<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> Vec<BanaResult<RgbImage>> {
    if paths.len() > DEFAULT_PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}

/// Writes upload bytes to a fresh temporary file.
///
/// The file is deleted when the returned handle is dropped.
pub fn spool_upload(bytes: &[u8]) -> BanaResult<NamedTempFile> {
    let mut spool = tempfile::Builder::new()
        .prefix("banaclass-upload-")
        .tempfile()
        .map_err(|e| BanaError::spooling("failed to create spool file", e))?;
    spool
        .write_all(bytes)
        .and_then(|_| spool.flush())
        .map_err(|e| BanaError::spooling("failed to write spool file", e))?;
    Ok(spool)
}

/// Decodes uploaded bytes into an RGB image by way of a spool file.
///
/// # Errors
///
/// * `BanaError::InvalidInput` for an empty upload
/// * `BanaError::InputFormat` if the bytes are not a decodable image
pub fn decode_upload(bytes: &[u8]) -> BanaResult<RgbImage> {
    if bytes.is_empty() {
        return Err(BanaError::invalid_input("the uploaded file is empty"));
    }
    let spool = spool_upload(bytes)?;
    load_image(spool.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 180, 20]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_check_extension() {
        assert_eq!(check_extension("pisang.JPG").unwrap(), "jpg");
        assert_eq!(check_extension("a/b/kepok.jpeg").unwrap(), "jpeg");
        assert_eq!(check_extension("tanduk.png").unwrap(), "png");
        assert!(matches!(
            check_extension("notes.txt"),
            Err(BanaError::UnsupportedExtension { .. })
        ));
        assert!(check_extension("no_extension").is_err());
    }

    #[test]
    fn test_decode_upload_png() {
        let img = decode_upload(&png_bytes(7, 5)).unwrap();
        assert_eq!(img.dimensions(), (7, 5));
        assert_eq!(img.get_pixel(0, 0), &Rgb([200, 180, 20]));
    }

    #[test]
    fn test_decode_upload_rejects_non_images() {
        let err = decode_upload(b"this is plain text, not a picture").unwrap_err();
        assert!(matches!(err, BanaError::InputFormat(_)));
        assert!(err.is_input_error());

        assert!(decode_upload(&[]).unwrap_err().is_input_error());
    }

    #[test]
    fn test_spool_is_removed_on_drop() {
        let spool = spool_upload(b"bytes").unwrap();
        let path = spool.path().to_path_buf();
        assert!(path.exists());
        drop(spool);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_images_batch_keeps_per_file_results() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        std::fs::write(&good, png_bytes(3, 3)).unwrap();
        let bad = dir.path().join("bad.jpg");
        std::fs::write(&bad, b"garbage").unwrap();

        let results = load_images_batch(&[good, bad]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(BanaError::InputFormat(_))));
    }
}
