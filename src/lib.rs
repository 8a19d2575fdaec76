//! Falloff lookup texture synthesis.
//!
//! 2D point lights attenuate with distance according to a per-light *falloff intensity*. Instead
//! of evaluating the attenuation curve per fragment, the renderer samples a precomputed lookup
//! texture. This crate produces that texture.
//!
//! # Overview
//!
//! - [`gradient`] computes the [`GradientField`], a `rows x cols` table where each row is one
//!   falloff intensity and each column one normalized distance. The value at `(row, col)` is
//!   `base(col) ^ exponent(row)`, with `base` spanning `[0, 1]` and `exponent` decaying
//!   exponentially from `e^1.5` to `e^-1.5`.
//! - [`layout`] pads the field into an RGBA [`OutputImage`].
//! - [`codec`] reads and writes image files behind the [`ImageCodec`] trait.
//! - [`synth`] strings everything together in the [`GradientSynthesizer`].
//!
//! # Environment Variables
//!
//! Only logging is configurable from the environment: `RUST_LOG` is parsed after the defaults set
//! by [`init_logger!`].

use log::LevelFilter;

pub mod codec;
pub mod gradient;
pub mod layout;
pub mod shape;
pub mod synth;
pub mod timer;

pub use codec::{FileCodec, ImageCodec, SampleDepth, SourceImage};
pub use gradient::{GradientField, GradientParams};
pub use layout::OutputImage;
pub use shape::Shape;
pub use synth::GradientSynthesizer;

/// Path of the image inspected by the `falloff-gradient` binary, relative to the working
/// directory.
pub const SOURCE_PATH: &str = "a.png";

/// Path the `falloff-gradient` binary writes the lookup texture to.
pub const OUTPUT_PATH: &str = "a1.png";

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library log at *debug* level unless `RUST_LOG` says otherwise.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
