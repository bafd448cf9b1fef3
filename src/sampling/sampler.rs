//! Averaged patch color and noise from raw window samples
//!
//! Channel decoding depends on the run's color space:
//! - LAB: L* code scaled by 100/255; a*/b* codes ≥ 128 re-based by -256
//! - RGB: all three channels kept as raw 0-255 codes
//!
//! The average always divides by the stencil area. A short sample set is not
//! an error: missing pixels count as zero and pull the average (and noise)
//! toward zero. Samples beyond the stencil area are ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{PixelSource, RawPixel, SampleWindow};
use crate::color::rounding::round1;
use crate::constants::lab_encoding::{LIGHTNESS_SCALE, SIGNED_OFFSET, SIGNED_THRESHOLD};
use crate::geometry::PixelPoint;
use crate::{ColorSpace, MeasureError, Result};

/// Measured value of one patch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchSample {
    /// Averaged channel triplet in reference units, one decimal
    pub measured: [f64; 3],

    /// Standard deviation of the first channel in raw code units, one decimal
    pub noise: f64,

    /// Number of pixels actually delivered by the extractor
    pub sample_count: usize,
}

/// Patch sampler for one run
#[derive(Debug, Clone, Copy)]
pub struct PatchSampler {
    color_space: ColorSpace,
    stencil: u32,
}

impl PatchSampler {
    /// Create a sampler for `color_space` with a square stencil of side `stencil`
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidParameter`] for a zero stencil
    pub fn new(color_space: ColorSpace, stencil: u32) -> Result<Self> {
        if stencil == 0 {
            return Err(MeasureError::InvalidParameter {
                parameter: "stencil".into(),
                value: stencil.to_string(),
            });
        }
        Ok(Self {
            color_space,
            stencil,
        })
    }

    pub fn stencil(&self) -> u32 {
        self.stencil
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    fn area(&self) -> usize {
        (self.stencil as usize) * (self.stencil as usize)
    }

    /// Decode one raw pixel into reference units
    fn decode(&self, pixel: RawPixel) -> [f64; 3] {
        match self.color_space {
            ColorSpace::Lab => [
                pixel[0] * LIGHTNESS_SCALE,
                signed_code(pixel[1]),
                signed_code(pixel[2]),
            ],
            ColorSpace::Rgb => pixel,
        }
    }

    /// First-channel average converted back to raw code units
    fn raw_lightness(&self, measured: f64) -> f64 {
        match self.color_space {
            ColorSpace::Lab => measured / LIGHTNESS_SCALE,
            ColorSpace::Rgb => measured,
        }
    }

    /// Average the samples of one window and estimate its noise.
    ///
    /// Noise is taken around the rounded average, expressed in raw codes,
    /// over the full stencil area.
    pub fn sample_patch(&self, samples: &[RawPixel]) -> PatchSample {
        let area = self.area();
        let used = &samples[..samples.len().min(area)];

        let mut sums = [0.0_f64; 3];
        for pixel in used {
            let decoded = self.decode(*pixel);
            for (sum, value) in sums.iter_mut().zip(decoded) {
                *sum += value;
            }
        }

        let divisor = area as f64;
        let measured = sums.map(|sum| round1(sum / divisor));

        let mean_raw = self.raw_lightness(measured[0]);
        let missing = (area - used.len()) as f64;
        let squared: f64 = used
            .iter()
            .map(|pixel| (mean_raw - pixel[0]).powi(2))
            .sum::<f64>()
            + missing * mean_raw.powi(2);
        let noise = round1((squared / divisor).sqrt());

        PatchSample {
            measured,
            noise,
            sample_count: samples.len(),
        }
    }

    /// Sample every patch in index order.
    ///
    /// # Arguments
    ///
    /// * `locations` - Located patch positions, in reference order
    /// * `source` - External pixel extractor
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::SamplingUnavailable`] as soon as the extractor
    /// fails for any patch; no partial sample set is returned
    pub fn sample_all(
        &self,
        locations: &[PixelPoint],
        source: &dyn PixelSource,
    ) -> Result<Vec<PatchSample>> {
        let mut samples = Vec::with_capacity(locations.len());

        for (patch, location) in locations.iter().enumerate() {
            let window = SampleWindow::for_patch(patch, *location, self.stencil);
            let pixels = source
                .window_samples(&window)
                .map_err(|e| MeasureError::SamplingUnavailable {
                    patch,
                    reason: e.message,
                })?;

            if pixels.len() != window.area() {
                debug!(
                    patch,
                    delivered = pixels.len(),
                    expected = window.area(),
                    "Sample count differs from stencil area"
                );
            }

            let sample = self.sample_patch(&pixels);
            debug!(
                patch,
                window = %window.crop_geometry(),
                measured = ?sample.measured,
                noise = sample.noise,
                "Patch sampled"
            );
            samples.push(sample);
        }

        info!(patches = samples.len(), color_space = %self.color_space, "Color values measured");
        Ok(samples)
    }
}

/// Two's complement reading of an 8-bit a*/b* code
fn signed_code(code: f64) -> f64 {
    if code < SIGNED_THRESHOLD {
        code
    } else {
        code - SIGNED_OFFSET
    }
}
