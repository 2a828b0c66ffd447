//! Box-filter downsampling of distance fields

use crate::distance::DistanceField;
use crate::{AtlasError, Result};

/// Integer-factor box decimation.
///
/// Every output sample is the mean of its `factor x factor` input block.
/// Distances keep their source-pixel units; averaging does not rescale them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    factor: u32,
}

impl Resampler {
    pub fn new(factor: u32) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Check that the factor evenly divides a `width x height` field
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        if self.factor == 0 || width % self.factor != 0 || height % self.factor != 0 {
            return Err(AtlasError::InvalidDownsampleFactor {
                factor: self.factor,
                width,
                height,
            });
        }
        Ok(())
    }

    /// Downsample `field`, rejecting factors that do not divide it
    pub fn resample(&self, field: &DistanceField) -> Result<DistanceField> {
        self.validate(field.width(), field.height())?;

        if self.factor == 1 {
            return Ok(field.clone());
        }

        let k = self.factor as usize;
        let width = field.width() as usize;
        let out_width = width / k;
        let out_height = field.height() as usize / k;
        let block_area = (k * k) as f32;
        let input = field.as_slice();

        let mut output = Vec::with_capacity(out_width * out_height);
        for oy in 0..out_height {
            for ox in 0..out_width {
                let mut accum = 0.0f32;
                for ky in 0..k {
                    let row = (oy * k + ky) * width + ox * k;
                    accum += input[row..row + k].iter().sum::<f32>();
                }
                output.push(accum / block_area);
            }
        }

        DistanceField::new(out_width as u32, out_height as u32, output)
    }
}
