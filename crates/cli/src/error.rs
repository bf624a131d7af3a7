//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: configuration error (unknown rule, bad topology, size mismatch)
//! - 11: I/O error (image read or write)
//! - 12: input error (bad JSON params, unreadable config file, no rule)
//! - 13: serialization error

use raster_synth_core::RasterError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A configuration error reported by the raster or automaton layer.
    Config(RasterError),
    /// An I/O or codec error.
    Io(String),
    /// A user input error.
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        if e.is_configuration() {
            CliError::Config(e)
        } else {
            CliError::Io(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_exit_code_is_10() {
        let err = CliError::Config(RasterError::UnknownRule("foo".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = CliError::Io("write failed".into());
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad params".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn raster_io_and_codec_route_to_cli_io() {
        for raster_err in [
            RasterError::Io("disk full".into()),
            RasterError::Codec("bad png".into()),
        ] {
            let cli_err = CliError::from(raster_err);
            assert_eq!(cli_err.exit_code(), 11);
        }
        assert!(CliError::from(RasterError::Io("disk full".into()))
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn raster_configuration_routes_to_cli_config() {
        let cli_err = CliError::from(RasterError::mismatch((4, 4), (8, 8)));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains('8'));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
