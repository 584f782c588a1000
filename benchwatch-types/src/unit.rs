//! Physical units for measurement values.
//!
//! A unit carries a dimension tag and a scale factor relative to the base
//! unit of its dimension (e.g. mV scales by 1e-3 relative to V). Conversion
//! is only defined between units of the same dimension.

use core::fmt;

use thiserror::Error;

/// Errors that can occur when working with units.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// Conversion was attempted between units of different dimensions.
    #[error("Incompatible units: {from} -> {to}")]
    Incompatible {
        /// Symbol of the source unit.
        from: &'static str,
        /// Symbol of the target unit.
        to: &'static str,
    },
}

/// A physical unit: a dimension tag, a display symbol, and a scale factor
/// relative to the base unit of the dimension.
///
/// # Example
///
/// ```rust
/// use benchwatch_types::{MILLIVOLT, VOLT};
///
/// let v = MILLIVOLT.convert_to(1500.0, &VOLT).unwrap();
/// assert_eq!(v, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Dimension tag, e.g. "voltage". Units are convertible iff tags match.
    pub dimension: &'static str,
    /// Display symbol, e.g. "mV".
    pub symbol: &'static str,
    /// Multiplier to convert a value in this unit to the dimension base.
    pub scale: f64,
}

impl Unit {
    /// Define a unit.
    pub const fn new(dimension: &'static str, symbol: &'static str, scale: f64) -> Self {
        Self {
            dimension,
            symbol,
            scale,
        }
    }

    /// Convert `value` expressed in this unit to `other`.
    ///
    /// Fails if the units do not share a dimension; dimension mismatches are
    /// programming errors and must surface to the caller.
    pub fn convert_to(&self, value: f64, other: &Unit) -> Result<f64, UnitError> {
        if self.dimension != other.dimension {
            return Err(UnitError::Incompatible {
                from: self.symbol,
                to: other.symbol,
            });
        }
        Ok(value * (self.scale / other.scale))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

/// Convert `value` from one unit to another of the same dimension.
///
/// Free-function form of [`Unit::convert_to`].
pub fn convert(value: f64, from: &Unit, to: &Unit) -> Result<f64, UnitError> {
    from.convert_to(value, to)
}

// Base units
pub const VOLT: Unit = Unit::new("voltage", "V", 1.0);
pub const AMPERE: Unit = Unit::new("current", "A", 1.0);
pub const OHM: Unit = Unit::new("resistance", "Ω", 1.0);
pub const HERTZ: Unit = Unit::new("frequency", "Hz", 1.0);
pub const SECOND: Unit = Unit::new("time", "s", 1.0);
pub const DEGREE: Unit = Unit::new("angle", "°", 1.0);

// Scaled units
pub const MILLIVOLT: Unit = Unit::new("voltage", "mV", 1e-3);
pub const KILOVOLT: Unit = Unit::new("voltage", "kV", 1e3);

pub const MILLIAMP: Unit = Unit::new("current", "mA", 1e-3);
pub const KILOAMP: Unit = Unit::new("current", "kA", 1e3);

pub const MILLISECOND: Unit = Unit::new("time", "ms", 1e-3);
pub const MICROSECOND: Unit = Unit::new("time", "µs", 1e-6);

pub const KILOHERTZ: Unit = Unit::new("frequency", "kHz", 1e3);
pub const MEGAHERTZ: Unit = Unit::new("frequency", "MHz", 1e6);
