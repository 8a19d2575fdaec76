//! The power-law gradient field.
//!
//! The field is a lookup table of light attenuation values. Row `r` corresponds to a falloff
//! intensity and holds the curve `t ^ exponent(r)` sampled at `cols` evenly spaced distances `t` in
//! `[0, 1]`. Exponents decay exponentially over the rows, so the first row falls off slowly near the
//! light and the last row falls off quickly.

use itertools::{Itertools, MinMaxResult};
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};

/// Parameters of a [`GradientField`].
///
/// The defaults produce the `128 x 2048` table with `exponent(row) = e^(1.5 - 3 * row / 127)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientParams {
    rows: usize,
    cols: usize,
    exponent_offset: f64,
    exponent_span: f64,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            rows: 128,
            cols: 2048,
            exponent_offset: 1.5,
            exponent_span: 3.0,
        }
    }
}

impl GradientParams {
    /// Sets the number of rows (falloff intensities).
    #[inline]
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the number of columns (distance samples).
    #[inline]
    pub fn cols(mut self, cols: usize) -> Self {
        self.cols = cols;
        self
    }

    /// Sets the natural logarithm of the exponent used for the first row.
    #[inline]
    pub fn exponent_offset(mut self, offset: f64) -> Self {
        self.exponent_offset = offset;
        self
    }

    /// Sets how far the logarithm of the exponent drops between the first and the last row.
    #[inline]
    pub fn exponent_span(mut self, span: f64) -> Self {
        self.exponent_span = span;
        self
    }

    /// Returns the `rows` evenly spaced exponents, `e^(offset - span * x)` for `x` in `[0, 1]`.
    pub fn exponents(&self) -> Array1<f64> {
        let (offset, span) = (self.exponent_offset, self.exponent_span);
        linspace(0.0, 1.0, self.rows).mapv(|x| (offset - span * x).exp())
    }

    /// Returns the `cols` evenly spaced bases in `[0, 1]`.
    pub fn bases(&self) -> Array1<f64> {
        linspace(0.0, 1.0, self.cols)
    }

    /// Computes the [`GradientField`] described by these parameters.
    ///
    /// Fails if `rows` or `cols` is zero.
    pub fn synthesize(&self) -> anyhow::Result<GradientField> {
        if self.rows == 0 || self.cols == 0 {
            anyhow::bail!(
                "gradient field must not be empty (requested {}x{})",
                self.rows,
                self.cols
            );
        }

        let values = outer_pow(self.exponents(), self.bases());
        if let MinMaxResult::MinMax(min, max) = values.iter().copied().minmax() {
            log::debug!(
                "synthesized {}x{} gradient field, values in [{min}, {max}]",
                self.rows,
                self.cols
            );
        }

        Ok(GradientField { values })
    }
}

/// Raises every base to every exponent, yielding an `(exponents.len(), bases.len())` array.
fn outer_pow(exponents: Array1<f64>, bases: Array1<f64>) -> Array2<f64> {
    // (rows, 1) and (1, cols), broadcast against each other into (rows, cols).
    let exponents = exponents.insert_axis(Axis(1));
    let bases = bases.insert_axis(Axis(0));

    let mut values = Array2::zeros((exponents.nrows(), bases.ncols()));
    Zip::from(&mut values)
        .and_broadcast(&exponents)
        .and_broadcast(&bases)
        .for_each(|value, &exponent, &base| *value = base.powf(exponent));
    values
}

/// `n` evenly spaced samples over `[start, stop]`, both ends included.
///
/// Sample `i` is `start + (stop - start) * (i / (n - 1))`, so the endpoints are exact. A single
/// sample sits at `start`.
fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    let denom = n.saturating_sub(1).max(1) as f64;
    Array1::from_shape_fn(n, |i| start + (stop - start) * (i as f64 / denom))
}

/// A 2D table of falloff values, indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    values: Array2<f64>,
}

impl GradientField {
    /// Computes the default `128 x 2048` field.
    pub fn synthesize() -> Self {
        let params = GradientParams::default();
        Self {
            values: outer_pow(params.exponents(), params.bases()),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Returns the value stored at `(row, col)`.
    ///
    /// # Panics
    ///
    /// This will panic if `(row, col)` is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    #[inline]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Samples the field like a texture with bilinear filtering.
    ///
    /// `falloff` selects the row and `distance` the column, both normalized to `[0, 1]` so that
    /// `0` hits the first texel center and `1` the last. Coordinates outside of that range are
    /// clamped to the edge.
    pub fn sample(&self, falloff: f64, distance: f64) -> f64 {
        let (rows, cols) = self.values.dim();
        let y = falloff.clamp(0.0, 1.0) * (rows - 1) as f64;
        let x = distance.clamp(0.0, 1.0) * (cols - 1) as f64;

        let (y0, x0) = (y.floor() as usize, x.floor() as usize);
        let (y1, x1) = ((y0 + 1).min(rows - 1), (x0 + 1).min(cols - 1));
        let (fy, fx) = (y - y0 as f64, x - x0 as f64);

        let v = &self.values;
        let top = lerp(v[[y0, x0]], v[[y0, x1]], fx);
        let bottom = lerp(v[[y1, x0]], v[[y1, x1]], fx);
        lerp(top, bottom, fy)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use itertools::iproduct;

    use super::*;

    fn expected(row: usize, col: usize) -> f64 {
        let base = col as f64 / 2047.0;
        let exponent = (1.5 - 3.0 * row as f64 / 127.0).exp();
        base.powf(exponent)
    }

    #[test]
    fn default_dimensions() {
        let field = GradientField::synthesize();
        assert_eq!(field.rows(), 128);
        assert_eq!(field.cols(), 2048);
        assert_eq!(field.values().dim(), (128, 2048));
    }

    #[test]
    fn closed_form() {
        let field = GradientField::synthesize();
        for (row, col) in iproduct!(0..128, 0..2048) {
            assert_relative_eq!(
                field.get(row, col),
                expected(row, col),
                epsilon = 1e-15,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn broadcast_matches_elementwise() {
        let params = GradientParams::default();
        let (exponents, bases) = (params.exponents(), params.bases());
        let elementwise =
            Array2::from_shape_fn((128, 2048), |(row, col)| bases[col].powf(exponents[row]));
        assert_eq!(GradientField::synthesize().into_values(), elementwise);
        assert_eq!(params.synthesize().unwrap(), GradientField::synthesize());
    }

    #[test]
    fn edge_columns() {
        let field = GradientField::synthesize();
        assert_eq!(field.get(0, 2047), 1.0);
        for row in 0..128 {
            assert_eq!(field.get(row, 0), 0.0);
            assert_eq!(field.get(row, 2047), 1.0);
        }
        assert_eq!(field.get(127, 0), 0.0);
    }

    #[test]
    fn values_in_unit_range() {
        let field = GradientField::synthesize();
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn exponents_decay() {
        let exponents = GradientParams::default().exponents();
        assert_eq!(exponents.len(), 128);
        assert_relative_eq!(exponents[0], 1.5f64.exp());
        assert_relative_eq!(exponents[127], (-1.5f64).exp(), max_relative = 1e-12);
        assert!(exponents.windows(2).into_iter().all(|w| w[0] > w[1]));
        assert!(exponents.iter().all(|&e| e > 0.0));
    }

    #[test]
    fn bases_span_unit_interval() {
        let bases = GradientParams::default().bases();
        assert_eq!(bases.len(), 2048);
        assert_eq!(bases[0], 0.0);
        assert_eq!(bases[2047], 1.0);
        assert_relative_eq!(bases[1], 1.0 / 2047.0);
    }

    #[test]
    fn deterministic() {
        assert_eq!(GradientField::synthesize(), GradientField::synthesize());
    }

    #[test]
    fn custom_size() {
        let field = GradientParams::default()
            .rows(4)
            .cols(3)
            .exponent_offset(0.0)
            .exponent_span(0.0)
            .synthesize()
            .unwrap();
        assert_eq!((field.rows(), field.cols()), (4, 3));
        // An exponent of `e^0 = 1` reproduces the bases.
        for row in 0..4 {
            assert_relative_eq!(field.get(row, 1), 0.5);
        }
    }

    #[test]
    fn single_row() {
        let field = GradientParams::default().rows(1).cols(5).synthesize().unwrap();
        assert_relative_eq!(field.get(0, 2), 0.5f64.powf(1.5f64.exp()));
        assert_relative_eq!(field.sample(0.7, 0.5), field.get(0, 2));
    }

    #[test]
    fn empty_is_rejected() {
        assert!(GradientParams::default().rows(0).synthesize().is_err());
        assert!(GradientParams::default().cols(0).synthesize().is_err());
    }

    #[test]
    fn sample_texel_centers() {
        let field = GradientField::synthesize();
        for (row, col) in iproduct!([0, 1, 64, 126, 127], [0, 1, 1000, 2046, 2047]) {
            let falloff = row as f64 / 127.0;
            let distance = col as f64 / 2047.0;
            assert_relative_eq!(
                field.sample(falloff, distance),
                field.get(row, col),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn sample_clamps() {
        let field = GradientField::synthesize();
        assert_eq!(field.sample(-1.0, -3.0), field.get(0, 0));
        assert_eq!(field.sample(2.0, 5.0), field.get(127, 2047));
        assert_eq!(field.sample(-0.5, 1.5), field.get(0, 2047));
    }

    #[test]
    fn sample_interpolates() {
        let field = GradientParams::default()
            .rows(2)
            .cols(2)
            .synthesize()
            .unwrap();
        // Row values are `[0, 1]` regardless of the exponent.
        assert_relative_eq!(field.sample(0.0, 0.25), 0.25);
        assert_relative_eq!(field.sample(0.5, 0.5), 0.5);
    }

    #[test]
    fn sample_monotonic_in_distance() {
        let field = GradientField::synthesize();
        for falloff in [0.0, 0.3, 0.5, 0.99, 1.0] {
            let samples = (0..=500)
                .map(|i| field.sample(falloff, i as f64 / 500.0))
                .collect::<Vec<_>>();
            assert!(samples.windows(2).all(|w| w[0] <= w[1] + 1e-12));
        }
    }
}
