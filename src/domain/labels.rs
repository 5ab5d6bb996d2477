//! The banana varieties the classifier distinguishes.
//!
//! The declaration order of [`BananaVariety`] is the output index order of the
//! model's probability vector and must never be changed.

use crate::core::constants::NUM_CLASSES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A banana variety, i.e. one class of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BananaVariety {
    #[serde(rename = "Pisang Ambon")]
    Ambon,
    #[serde(rename = "Pisang Cavendish")]
    Cavendish,
    #[serde(rename = "Pisang Genderuwo")]
    Genderuwo,
    #[serde(rename = "Pisang Kepok")]
    Kepok,
    #[serde(rename = "Pisang Tanduk")]
    Tanduk,
}

impl BananaVariety {
    /// All varieties in model output order.
    pub const ALL: [BananaVariety; NUM_CLASSES] = [
        BananaVariety::Ambon,
        BananaVariety::Cavendish,
        BananaVariety::Genderuwo,
        BananaVariety::Kepok,
        BananaVariety::Tanduk,
    ];

    /// Returns the variety for a model output index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the model output index of this variety.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the name shown to users, e.g. `Pisang Kepok`.
    pub fn display_name(self) -> &'static str {
        match self {
            BananaVariety::Ambon => "Pisang Ambon",
            BananaVariety::Cavendish => "Pisang Cavendish",
            BananaVariety::Genderuwo => "Pisang Genderuwo",
            BananaVariety::Kepok => "Pisang Kepok",
            BananaVariety::Tanduk => "Pisang Tanduk",
        }
    }

    /// Display names of all varieties in model output order.
    pub fn display_names() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|v| v.display_name().to_string())
            .collect()
    }
}

impl fmt::Display for BananaVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BananaVariety {
    type Err = String;

    /// Parses either the display name (`Pisang Kepok`) or the short name
    /// (`kepok`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let short = normalized
            .strip_prefix("pisang ")
            .unwrap_or(&normalized)
            .trim();

        Self::ALL
            .iter()
            .copied()
            .find(|v| v.display_name()["Pisang ".len()..].eq_ignore_ascii_case(short))
            .ok_or_else(|| format!("unknown banana variety: {s}"))
    }
}
