//! Classification models.
//!
//! This module contains the banana variety classifier and its builder.

pub mod banana;

pub use banana::{BananaClassifier, BananaClassifierBuilder};
