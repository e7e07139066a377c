//! Design asset value types: file references, print placements, palette,
//! and the lifecycle/print-method vocabularies.
//!
//! Lives in `core` so that the persistence layer (JSONB columns), the diff
//! engine, and the orchestration layer all share one definition of a
//! version's content.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Print areas
// ---------------------------------------------------------------------------

/// Garment region a placement is printed on. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintArea {
    Front,
    Back,
    LeftSleeve,
    RightSleeve,
    LeftChest,
    RightChest,
    NeckLabel,
    Hood,
    Pocket,
    FullWrap,
}

impl PrintArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "FRONT",
            Self::Back => "BACK",
            Self::LeftSleeve => "LEFT_SLEEVE",
            Self::RightSleeve => "RIGHT_SLEEVE",
            Self::LeftChest => "LEFT_CHEST",
            Self::RightChest => "RIGHT_CHEST",
            Self::NeckLabel => "NECK_LABEL",
            Self::Hood => "HOOD",
            Self::Pocket => "POCKET",
            Self::FullWrap => "FULL_WRAP",
        }
    }
}

// ---------------------------------------------------------------------------
// Print method
// ---------------------------------------------------------------------------

/// Production technique used for the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintMethod {
    ScreenPrint,
    Dtg,
    Dtf,
    Embroidery,
    Sublimation,
    HeatTransfer,
}

impl PrintMethod {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScreenPrint => "SCREEN_PRINT",
            Self::Dtg => "DTG",
            Self::Dtf => "DTF",
            Self::Embroidery => "EMBROIDERY",
            Self::Sublimation => "SUBLIMATION",
            Self::HeatTransfer => "HEAT_TRANSFER",
        }
    }
}

impl FromStr for PrintMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCREEN_PRINT" => Ok(Self::ScreenPrint),
            "DTG" => Ok(Self::Dtg),
            "DTF" => Ok(Self::Dtf),
            "EMBROIDERY" => Ok(Self::Embroidery),
            "SUBLIMATION" => Ok(Self::Sublimation),
            "HEAT_TRANSFER" => Ok(Self::HeatTransfer),
            other => Err(CoreError::Validation(format!(
                "Unknown print method '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Asset status
// ---------------------------------------------------------------------------

/// Lifecycle status of a design asset. New assets and branches start as
/// [`AssetStatus::Draft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Draft,
    InReview,
    Approved,
    InProduction,
    Archived,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InReview => "IN_REVIEW",
            Self::Approved => "APPROVED",
            Self::InProduction => "IN_PRODUCTION",
            Self::Archived => "ARCHIVED",
        }
    }
}

// ---------------------------------------------------------------------------
// Version content
// ---------------------------------------------------------------------------

/// References to the artwork files of one version. Only `prod_url` is
/// required; file identity is the literal reference string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DesignFiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockup_url: Option<String>,
    #[validate(length(min = 1, message = "production file reference must not be empty"))]
    pub prod_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separation_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embroidery_url: Option<String>,
}

impl DesignFiles {
    /// Files with only a production reference.
    pub fn production(prod_url: impl Into<String>) -> Self {
        Self {
            mockup_url: None,
            prod_url: prod_url.into(),
            separation_urls: None,
            embroidery_url: None,
        }
    }
}

/// One placement of the artwork on a garment area, in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub area: PrintArea,
    #[validate(range(min = 0.0, message = "width must not be negative"))]
    pub width_cm: f64,
    #[validate(range(min = 0.0, message = "height must not be negative"))]
    pub height_cm: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

impl Placement {
    pub fn new(area: PrintArea, width_cm: f64, height_cm: f64) -> Self {
        Self {
            area,
            width_cm,
            height_cm,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum allowed length for a design asset name.
pub const MAX_ASSET_NAME_LENGTH: usize = 200;

/// Validate the content of a version about to be created.
///
/// Requires a non-empty production reference and a non-empty placement list
/// whose dimensions are finite and non-negative.
pub fn validate_version_content(
    files: &DesignFiles,
    placements: &[Placement],
) -> Result<(), CoreError> {
    files
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    if files.prod_url.trim().is_empty() {
        return Err(CoreError::Validation(
            "production file reference must not be empty".to_string(),
        ));
    }

    if placements.is_empty() {
        return Err(CoreError::Validation(
            "at least one placement is required".to_string(),
        ));
    }

    for (index, placement) in placements.iter().enumerate() {
        let dims = [
            placement.width_cm,
            placement.height_cm,
            placement.offset_x,
            placement.offset_y,
        ];
        if dims.iter().any(|d| !d.is_finite()) {
            return Err(CoreError::Validation(format!(
                "placement {index} ({}) has a non-numeric dimension",
                placement.area.as_str()
            )));
        }
        placement
            .validate()
            .map_err(|e| CoreError::Validation(format!("placement {index}: {e}")))?;
    }

    Ok(())
}

/// Validate a design asset name: non-empty after trimming and within
/// [`MAX_ASSET_NAME_LENGTH`].
pub fn validate_asset_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Design name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_ASSET_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Design name must not exceed {MAX_ASSET_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
