//! Numeric precision of a pricing run.

use std::fmt;
use std::str::FromStr;

use super::SpecError;

/// Floating-point precision used for every device pass of one run.
///
/// A run never mixes precisions: path generation, valuation, and the host
/// finishing step all use the selected width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Precision {
    /// IEEE-754 binary32 (`f32`).
    Single,
    /// IEEE-754 binary64 (`f64`).
    #[default]
    Double,
}

impl Precision {
    /// Size in bytes of one scalar at this precision.
    #[inline]
    pub fn scalar_bytes(&self) -> usize {
        match self {
            Precision::Single => std::mem::size_of::<f32>(),
            Precision::Double => std::mem::size_of::<f64>(),
        }
    }

    /// Lowercase name used in reports and configuration files.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Single => "single",
            Precision::Double => "double",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "float" | "f32" => Ok(Precision::Single),
            "double" | "f64" => Ok(Precision::Double),
            other => Err(SpecError::InvalidParameter {
                name: "precision",
                reason: format!("unknown precision '{}': expected single or double", other),
            }),
        }
    }
}
