//! Integer cell types for energy boards and kernels.
//!
//! Every grid in qforce stores signed integers. The width of those integers
//! is chosen by the caller through [`CellWidth`]; the layout engine is generic
//! over the [`Cell`] trait and is instantiated once per width.
//!
//! # Overflow
//!
//! All grid arithmetic wraps. Overflow is never detected: callers must pick a
//! width large enough for their kernel scales. Wrapping keeps subtraction an
//! exact inverse of addition, so the board can always be restored even after
//! an overflow.

use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};

use num_traits::{Bounded, NumCast, PrimInt, Signed, WrappingAdd, WrappingSub};
use serde::{Deserialize, Serialize};

/// A signed integer usable as a grid cell.
///
/// Implemented for `i16`, `i32` and `i64`.
pub trait Cell:
    PrimInt + Signed + WrappingAdd + WrappingSub + Debug + Display + Default + Send + Sync + 'static
{
    /// Convert a floating point value by truncating toward zero.
    ///
    /// Values outside the range of the cell type saturate at its bounds.
    fn truncate_from(value: f64) -> Self {
        let truncated = value.trunc();
        <Self as NumCast>::from(truncated).unwrap_or_else(|| {
            if truncated.is_sign_negative() {
                <Self as Bounded>::min_value()
            } else {
                <Self as Bounded>::max_value()
            }
        })
    }
}

impl Cell for i16 {}
impl Cell for i32 {}
impl Cell for i64 {}

/// Bit width of the cells used for boards and kernels.
///
/// The names match external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellWidth {
    /// 16-bit cells
    I16,
    /// 32-bit cells (default)
    #[default]
    I32,
    /// 64-bit cells
    I64,
}

impl FromStr for CellWidth {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i16" => Ok(Self::I16),
            "i32" => Ok(Self::I32),
            "i64" => Ok(Self::I64),
            _ => Err("Unsupported cell width"),
        }
    }
}

impl From<CellWidth> for &'static str {
    fn from(val: CellWidth) -> Self {
        match val {
            CellWidth::I16 => "i16",
            CellWidth::I32 => "i32",
            CellWidth::I64 => "i64",
        }
    }
}

impl Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}
