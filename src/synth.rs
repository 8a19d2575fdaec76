//! The end-to-end lookup texture pipeline.

use std::path::Path;

use crate::{
    timer::Timer, FileCodec, GradientField, GradientParams, ImageCodec, OutputImage, Shape,
};

/// Reads a source image for inspection, synthesizes the gradient field and writes it out as an
/// RGBA image.
///
/// The output only depends on the [`GradientParams`]; the source image is decoded solely to report
/// its shape.
pub struct GradientSynthesizer<C = FileCodec> {
    codec: C,
    params: GradientParams,
    t_decode: Timer,
    t_synthesize: Timer,
    t_layout: Timer,
    t_encode: Timer,
}

impl GradientSynthesizer {
    /// Creates a synthesizer producing the default field through a [`FileCodec`].
    pub fn new() -> Self {
        Self::with_codec(FileCodec::new())
    }
}

impl Default for GradientSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> GradientSynthesizer<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            params: GradientParams::default(),
            t_decode: Timer::new("decode"),
            t_synthesize: Timer::new("synthesize"),
            t_layout: Timer::new("layout"),
            t_encode: Timer::new("encode"),
        }
    }

    /// Sets the [`GradientParams`] of the synthesized field.
    pub fn params(mut self, params: GradientParams) -> Self {
        self.params = params;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decodes the image at `path` and prints its shape to stdout.
    pub fn inspect_source<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<Shape> {
        let path = path.as_ref();
        let source = self.t_decode.time(|| self.codec.decode(path))?;
        let shape = source.shape();
        println!("{shape}");
        Ok(shape)
    }

    /// Computes the gradient field.
    pub fn synthesize_gradient(&mut self) -> anyhow::Result<GradientField> {
        self.t_synthesize.time(|| self.params.synthesize())
    }

    /// Pads `field` to the 4-channel image layout.
    pub fn to_image_layout(&mut self, field: GradientField) -> OutputImage {
        self.t_layout.time(|| OutputImage::from_field(field))
    }

    /// Encodes `image` to `path`.
    pub fn write_output<P: AsRef<Path>>(
        &mut self,
        image: &OutputImage,
        path: P,
    ) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.t_encode.time(|| self.codec.encode(path, image))
    }

    /// Runs the whole pipeline: inspects `source`, builds the lookup texture and writes it to
    /// `output`.
    ///
    /// The source and output shapes are printed to stdout, in that order.
    pub fn run<S: AsRef<Path>, O: AsRef<Path>>(
        &mut self,
        source: S,
        output: O,
    ) -> anyhow::Result<Shape> {
        self.inspect_source(source)?;

        let field = self.synthesize_gradient()?;
        let image = self.to_image_layout(field);
        let shape = image.shape();
        println!("{shape}");

        self.write_output(&image, output)?;

        log::debug!("{}", self.timers().map(|t| t.to_string()).join(", "));
        Ok(shape)
    }

    /// Returns the per-stage timers.
    pub fn timers(&self) -> [&Timer; 4] {
        [
            &self.t_decode,
            &self.t_synthesize,
            &self.t_layout,
            &self.t_encode,
        ]
    }
}
