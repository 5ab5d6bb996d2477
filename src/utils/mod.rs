//! Utility functions for the classifier.
//!
//! This module provides image loading helpers, including the upload spooling
//! used by the web server.

pub mod image;

pub use image::{
    check_extension, decode_upload, dynamic_to_rgb, load_image, load_images_batch, spool_upload,
};
