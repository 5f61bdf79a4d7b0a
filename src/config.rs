use core::fmt;

use embassy_time::Duration;

use crate::direction::FlickDirection;

/// Cell and region indices travel as `u8`, so a grid may not have more
/// cells than that index space can address.
pub const MAX_CELLS: usize = 256;

/// Opaque behavior reference forwarded to the action sink; the processor
/// never interprets the fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub behavior: u16,
    pub param: u32,
}

/// One full direction set for a cell, indexed by [`FlickDirection::index`].
/// A `None` slot is a configured silent no-op, not an error.
pub type CellBindings = [Option<Action>; FlickDirection::COUNT];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

impl Domain {
    pub const fn width(&self) -> u16 {
        self.x_max - self.x_min
    }

    pub const fn height(&self) -> u16 {
        self.y_max - self.y_min
    }

    pub(crate) const fn center(&self) -> (u16, u16) {
        (
            self.x_min + self.width() / 2,
            self.y_min + self.height() / 2,
        )
    }
}

/// Immutable per-instance configuration, supplied once at construction.
#[derive(Clone, Copy)]
pub struct GridConfig {
    pub rows: u8,
    pub cols: u8,
    pub domain: Domain,
    /// Minimum per-axis movement, in input units, for a session to count
    /// as a directional flick rather than a tap.
    pub flick_threshold: u16,
    /// Idle period after the last coordinate update before the watchdog
    /// terminates the session or region.
    pub idle_timeout: Duration,
    /// Whether recognized pointer events are consumed or passed through.
    pub suppress_input: bool,
    /// Row-major binding table, one entry per cell. Gesture instances
    /// require exactly `rows * cols` entries; region instances carry no
    /// bindings and leave this empty.
    pub bindings: &'static [CellBindings],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroGrid,
    EmptyDomain,
    TooManyCells { got: usize },
    BindingCount { expected: usize, got: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroGrid => write!(f, "grid rows and cols must be non-zero"),
            Self::EmptyDomain => write!(f, "coordinate domain must have positive width and height"),
            Self::TooManyCells { got } => {
                write!(f, "grid has {got} cells, the limit is {MAX_CELLS}")
            }
            Self::BindingCount { expected, got } => {
                write!(f, "binding table has {got} cells, expected {expected}")
            }
        }
    }
}

impl GridConfig {
    /// Shape checks shared by both processor variants.
    pub fn validate_geometry(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroGrid);
        }
        if self.domain.x_max <= self.domain.x_min || self.domain.y_max <= self.domain.y_min {
            return Err(ConfigError::EmptyDomain);
        }
        let cells = self.rows as usize * self.cols as usize;
        if cells > MAX_CELLS {
            return Err(ConfigError::TooManyCells { got: cells });
        }
        Ok(())
    }

    /// Gesture instances additionally require one full direction set per
    /// cell; the instance refuses to come up otherwise.
    pub fn validate_bindings(&self) -> Result<(), ConfigError> {
        let expected = self.rows as usize * self.cols as usize;
        if self.bindings.len() != expected {
            return Err(ConfigError::BindingCount {
                expected,
                got: self.bindings.len(),
            });
        }
        Ok(())
    }
}
