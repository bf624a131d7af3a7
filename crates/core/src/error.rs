//! Error types shared by every raster-synth crate.

use thiserror::Error;

/// Errors produced by raster, effect and automaton operations.
///
/// Everything except [`RasterError::Io`] and [`RasterError::Codec`] is a
/// configuration error: it is detected synchronously where the bad value is
/// used and recurs identically until the configuration is fixed.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Width or height was unusable for the requested operation, or
    /// `width * height` overflowed.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Two buffers that must share a size did not.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A buffer that had to be initialized was not.
    #[error("missing buffer: {0}")]
    MissingBuffer(&'static str),

    /// A rule was asked to run on a neighborhood it does not define.
    #[error("rule '{rule}' does not support the {topology} neighborhood")]
    InvalidTopology { rule: String, topology: String },

    /// A rule name was not found in the registry.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// A configuration value was present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// The image codec rejected the data.
    #[error("codec error: {0}")]
    Codec(String),
}

impl RasterError {
    /// True for errors caused by configuration rather than the environment.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, RasterError::Io(_) | RasterError::Codec(_))
    }

    /// Builds a [`RasterError::DimensionMismatch`] from two `(width, height)` pairs.
    pub fn mismatch(lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        RasterError::DimensionMismatch {
            lhs_w: lhs.0,
            lhs_h: lhs.1,
            rhs_w: rhs.0,
            rhs_h: rhs.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_includes_all_dimensions() {
        let err = RasterError::mismatch((10, 20), (30, 40));
        let msg = format!("{err}");
        for n in ["10", "20", "30", "40"] {
            assert!(msg.contains(n), "missing {n} in: {msg}");
        }
    }

    #[test]
    fn invalid_topology_names_rule_and_neighborhood() {
        let err = RasterError::InvalidTopology {
            rule: "life".into(),
            topology: "margolus".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("life"), "missing rule in: {msg}");
        assert!(msg.contains("margolus"), "missing topology in: {msg}");
    }

    #[test]
    fn missing_buffer_names_the_buffer() {
        let msg = RasterError::MissingBuffer("front").to_string();
        assert!(msg.contains("front"), "got: {msg}");
    }

    #[test]
    fn configuration_classification() {
        assert!(RasterError::UnknownRule("x".into()).is_configuration());
        assert!(RasterError::InvalidDimensions("0x0".into()).is_configuration());
        assert!(RasterError::mismatch((1, 1), (2, 2)).is_configuration());
        assert!(!RasterError::Io("disk full".into()).is_configuration());
        assert!(!RasterError::Codec("bad png".into()).is_configuration());
    }

    #[test]
    fn raster_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RasterError>();
    }
}
