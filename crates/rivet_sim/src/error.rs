//! Simulation error types.
//!
//! Expression evaluation never fails; these cover the boundaries around it.

use std::io;

/// Errors that can occur during simulation setup or waveform export.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No module name could be recovered from the source.
    #[error("Failed to parse Verilog module")]
    ParseFailed,

    /// A stimulus or signal filter names something the module does not have.
    #[error("unknown signal `{name}`")]
    UnknownSignal {
        /// The name that failed to resolve.
        name: String,
    },

    /// A clock stimulus was configured with a zero half period.
    #[error("clock `{signal}` has a zero half period")]
    ZeroHalfPeriod {
        /// The clock signal.
        signal: String,
    },

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}
