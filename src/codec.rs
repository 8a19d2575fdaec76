//! Image decoding and encoding.

use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use ndarray::{Array3, ArrayView2, Axis};

use crate::{OutputImage, Shape};

/// Reads and writes sample arrays from and to image files.
pub trait ImageCodec {
    /// Decodes the image file at `path`.
    fn decode(&self, path: &Path) -> anyhow::Result<SourceImage>;

    /// Encodes `image` to `path`, creating or overwriting the file.
    fn encode(&self, path: &Path, image: &OutputImage) -> anyhow::Result<()>;
}

/// Enumeration of image formats supported by [`FileCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageFormat {
    /// JFIF JPEG. Decoding only.
    Jpeg,
    /// Portable Network Graphics.
    Png,
    /// Graphics Interchange Format. Decoding only, first frame.
    Gif,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            Some("gif") => Ok(Self::Gif),
            _ => anyhow::bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }

    /// Whether [`FileCodec`] can write this format.
    ///
    /// Only PNG qualifies, since the output always carries an alpha channel.
    pub fn can_encode(self) -> bool {
        matches!(self, Self::Png)
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

/// Bit depth of the samples written by [`FileCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleDepth {
    /// 8 bits per sample. Values are quantized as `(v * 255) as u8`.
    #[default]
    Eight,
    /// 16 bits per sample. Values are quantized as `(v * 65535) as u16`.
    Sixteen,
}

impl SampleDepth {
    pub fn bits(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    /// Returns the largest representable sample value.
    pub fn max_value(self) -> u32 {
        match self {
            Self::Eight => u32::from(u8::MAX),
            Self::Sixteen => u32::from(u16::MAX),
        }
    }
}

/// A decoded image, with samples normalized to `[0, 1]`.
///
/// The channel count follows the file's color type: 1 for grayscale, 2 for grayscale with alpha,
/// 3 for RGB and 4 for RGBA.
#[derive(Debug, Clone)]
pub struct SourceImage {
    samples: Array3<f32>,
}

impl SourceImage {
    /// Wraps an existing `(rows, cols, channels)` sample array.
    pub fn from_samples(samples: Array3<f32>) -> Self {
        Self { samples }
    }

    fn from_dynamic(image: &DynamicImage) -> anyhow::Result<Self> {
        let (width, height) = image.dimensions();
        let channels = usize::from(image.color().channel_count());
        let buf = match channels {
            1 => image.to_luma32f().into_raw(),
            2 => image.to_luma_alpha32f().into_raw(),
            3 => image.to_rgb32f().into_raw(),
            _ => image.to_rgba32f().into_raw(),
        };
        let channels = channels.min(4);
        let samples = Array3::from_shape_vec((height as usize, width as usize, channels), buf)?;
        Ok(Self { samples })
    }

    pub fn shape(&self) -> Shape {
        Shape::from(self.samples.dim())
    }

    #[inline]
    pub fn samples(&self) -> &Array3<f32> {
        &self.samples
    }

    /// Returns a view of a single channel plane.
    ///
    /// # Panics
    ///
    /// This will panic if `channel` is out of bounds.
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.samples.index_axis(Axis(2), channel)
    }
}

/// An [`ImageCodec`] backed by the file system and the `image` crate.
///
/// The file format is selected by the path's extension (`png`, `jpg`, `jpeg` or `gif`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec {
    depth: SampleDepth,
}

impl FileCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [`SampleDepth`] used when encoding.
    #[inline]
    pub fn depth(mut self, depth: SampleDepth) -> Self {
        self.depth = depth;
        self
    }
}

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> anyhow::Result<SourceImage> {
        // TODO: add a file size limit; this loads the whole file into memory
        let format = ImageFormat::from_path(path)?;
        let data =
            std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let image = image::load_from_memory_with_format(&data, format.into())
            .with_context(|| format!("failed to decode '{}'", path.display()))?;
        let source = SourceImage::from_dynamic(&image)?;
        log::info!("decoded '{}' {}", path.display(), source.shape());
        Ok(source)
    }

    fn encode(&self, path: &Path, image: &OutputImage) -> anyhow::Result<()> {
        let format = ImageFormat::from_path(path)?;
        if !format.can_encode() {
            anyhow::bail!(
                "cannot encode '{}' ({:?} output is not supported)",
                path.display(),
                format
            );
        }

        let samples = image.samples();
        if let Some(((row, col, channel), value)) = samples
            .indexed_iter()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            anyhow::bail!(
                "cannot encode '{}': sample {value} at ({row}, {col}, {channel}) is outside of [0, 1]",
                path.display()
            );
        }

        let shape = image.shape();
        let width = u32::try_from(shape.cols())?;
        let height = u32::try_from(shape.rows())?;
        let max = f64::from(self.depth.max_value());
        let result = match self.depth {
            SampleDepth::Eight => {
                let buf = samples.iter().map(|&v| (v * max) as u8).collect();
                RgbaImage::from_raw(width, height, buf)
                    .context("sample buffer does not match image dimensions")?
                    .save_with_format(path, format.into())
            }
            SampleDepth::Sixteen => {
                let buf = samples.iter().map(|&v| (v * max) as u16).collect();
                ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(width, height, buf)
                    .context("sample buffer does not match image dimensions")?
                    .save_with_format(path, format.into())
            }
        };
        result.with_context(|| format!("failed to write '{}'", path.display()))?;

        log::info!(
            "wrote '{}' {} ({}-bit)",
            path.display(),
            shape,
            self.depth.bits()
        );
        Ok(())
    }
}
