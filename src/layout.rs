//! Packing a [`GradientField`] into an RGBA sample array.

use ndarray::{s, Array2, Array3, ArrayView2, Axis};

use crate::{GradientField, Shape};

/// An RGBA sample array of shape `(rows, cols, 4)`.
///
/// Channel 0 holds the gradient values, channels 1 and 2 are 0 and channel 3 (alpha) is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputImage {
    samples: Array3<f64>,
}

impl OutputImage {
    /// Number of channels of every [`OutputImage`].
    pub const CHANNELS: usize = 4;

    /// Lays out `field` as an image.
    ///
    /// The field gains a trailing channel axis, is zero-padded to 3 channels, and finally gets a
    /// 4th channel filled with 1.
    pub fn from_field(field: GradientField) -> Self {
        let samples = field.into_values().insert_axis(Axis(2));
        let samples = pad_channels(samples, 2, 0.0);
        let samples = pad_channels(samples, 1, 1.0);
        Self { samples }
    }

    pub fn shape(&self) -> Shape {
        Shape::from(self.samples.dim())
    }

    /// Returns a view of a single channel plane.
    ///
    /// # Panics
    ///
    /// This will panic if `channel` is not less than [`OutputImage::CHANNELS`].
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, f64> {
        self.samples.index_axis(Axis(2), channel)
    }

    #[inline]
    pub fn samples(&self) -> &Array3<f64> {
        &self.samples
    }

    /// Extracts the gradient values again.
    pub fn to_field_values(&self) -> Array2<f64> {
        self.channel(0).to_owned()
    }
}

/// Appends `count` channels filled with `value` along the trailing axis.
fn pad_channels(samples: Array3<f64>, count: usize, value: f64) -> Array3<f64> {
    let (rows, cols, channels) = samples.dim();
    let mut padded = Array3::from_elem((rows, cols, channels + count), value);
    padded.slice_mut(s![.., .., ..channels]).assign(&samples);
    padded
}
