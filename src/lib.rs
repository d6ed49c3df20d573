
pub mod burst;
pub mod config;
pub mod demod;
pub mod detect;
pub mod sigproc;
pub mod synth;
pub mod tracing_init;

pub use burst::Burst;
pub use config::{ConfigError, TrxConfig};
pub use demod::{demodulate_burst, BurstOutput, Demodulated};
pub use detect::{detect_burst, CorrType, DetectError, Detection};
