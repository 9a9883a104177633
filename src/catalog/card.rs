//! Analysis-ready product (CARD) types

use std::fmt;
use std::str::FromStr;

use crate::errors::ExtractError;

/// Product type of a catalog image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    /// Sentinel-2 surface reflectance
    SurfaceReflectance,
    /// Sentinel-1 radar backscatter
    Backscatter,
    /// Sentinel-1 6-day coherence
    Coherence6,
    /// Sentinel-1 12-day coherence
    Coherence12,
}

impl CardType {
    /// Code stored in the catalog `card` column
    pub fn code(&self) -> &'static str {
        match self {
            CardType::SurfaceReflectance => "s2",
            CardType::Backscatter => "bs",
            CardType::Coherence6 => "c6",
            CardType::Coherence12 => "c1",
        }
    }

    /// Suffix appended to band labels so product types never share a label
    pub fn band_suffix(&self) -> &'static str {
        match self {
            CardType::Backscatter => "b",
            CardType::Coherence6 => "c",
            CardType::SurfaceReflectance | CardType::Coherence12 => "",
        }
    }

    /// Result label for `band` of this product type
    pub fn band_label(&self, band: &str) -> String {
        format!("{}{}", band, self.band_suffix())
    }

    /// Default band set
    ///
    /// Sentinel-2 bands depend on the resolution pass: 10 m, 20 m, or `-1`
    /// for the scene classification layer. Radar products ignore it.
    pub fn default_bands(&self, resolution: Option<i32>) -> Result<Vec<String>, ExtractError> {
        let bands: &[&str] = match self {
            CardType::Backscatter | CardType::Coherence6 => &["VV", "VH"],
            CardType::Coherence12 => &["VV"],
            CardType::SurfaceReflectance => match resolution.unwrap_or(10) {
                10 => &["B02", "B03", "B04", "B08"],
                20 => &["B05", "B11"],
                -1 => &["SCL"],
                other => {
                    return Err(ExtractError::Config(format!("No Sentinel-2 band set for resolution {}", other)));
                }
            },
        };
        Ok(bands.iter().map(|b| b.to_string()).collect())
    }
}

impl FromStr for CardType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s2" => Ok(CardType::SurfaceReflectance),
            "bs" => Ok(CardType::Backscatter),
            "c6" => Ok(CardType::Coherence6),
            "c1" | "c12" => Ok(CardType::Coherence12),
            other => Err(ExtractError::Config(format!("Unknown card type: {}", other))),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
