//! Signed distance transform
//!
//! Implements the two-pass "dead reckoning" transform (Grevera 2004). Each
//! pixel carries a distance estimate and the boundary pixel that estimate
//! refers to. The forward and backward scans propagate boundary points
//! between neighbours; a neighbour's distance plus the step cost is only a
//! candidacy test, the stored value is always the exact Euclidean distance
//! to the adopted boundary point.
//!
//! The outermost pixel ring is never classified and the trailing rows and
//! columns are only partially reconciled, so those pixels may keep the
//! initial "infinite" magnitude of `hypot(width, height)`. Atlases keep at
//! least two pixels of clear margin around all ink for this reason.

use crate::bitmap::GrayscaleBitmap;
use crate::{AtlasError, Result};
use std::time::Instant;

/// Step cost to an axial neighbour
const DIST_UNIT: f32 = 1.0;

/// Step cost to a diagonal neighbour
const DIST_DIAG: f32 = std::f32::consts::SQRT_2;

/// Smallest bitmap edge the transform accepts (one interior pixel plus border)
pub const MIN_DIMENSION: u32 = 3;

/// Per-pixel signed distances, positive inside and negative outside
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DistanceField {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AtlasError::InvalidBitmap(format!(
                "{}x{} distance field needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Run the dead-reckoning transform over `bitmap`
    pub fn from_bitmap(bitmap: &GrayscaleBitmap) -> Result<Self> {
        DistanceFieldBuilder::new(bitmap)?.build()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Nearest known boundary pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BoundaryPoint {
    x: i32,
    y: i32,
}

impl BoundaryPoint {
    #[inline]
    fn distance_to(self, x: usize, y: usize) -> f32 {
        let dx = x as f32 - self.x as f32;
        let dy = y as f32 - self.y as f32;
        dx.hypot(dy)
    }
}

/// Builds a [`DistanceField`] from a binary bitmap.
///
/// Owns the scratch state for exactly one transform; the buffers are
/// dropped when [`build`](Self::build) returns.
pub struct DistanceFieldBuilder<'a> {
    bitmap: &'a GrayscaleBitmap,
    width: usize,
    height: usize,
    /// Best distance estimate per pixel
    distance: Vec<f32>,
    /// Boundary pixel the estimate refers to
    nearest: Vec<BoundaryPoint>,
}

impl<'a> DistanceFieldBuilder<'a> {
    pub fn new(bitmap: &'a GrayscaleBitmap) -> Result<Self> {
        if bitmap.width() < MIN_DIMENSION || bitmap.height() < MIN_DIMENSION {
            return Err(AtlasError::InvalidBitmap(format!(
                "distance transform needs at least {}x{} pixels, got {}x{}",
                MIN_DIMENSION,
                MIN_DIMENSION,
                bitmap.width(),
                bitmap.height()
            )));
        }

        let width = bitmap.width() as usize;
        let height = bitmap.height() as usize;
        let max_dist = (width as f32).hypot(height as f32);

        Ok(Self {
            bitmap,
            width,
            height,
            distance: vec![max_dist; width * height],
            nearest: vec![BoundaryPoint::default(); width * height],
        })
    }

    /// Run boundary detection, both dead-reckoning passes and sign assignment
    pub fn build(mut self) -> Result<DistanceField> {
        let start = Instant::now();

        let boundary_count = mark_boundaries(
            self.bitmap,
            &mut self.distance,
            &mut self.nearest,
        );
        forward_pass(&mut self.distance, &mut self.nearest, self.width, self.height);
        backward_pass(&mut self.distance, &mut self.nearest, self.width, self.height);
        apply_sign(self.bitmap, &mut self.distance);

        tracing::debug!(
            "distance field {}x{}: {} boundary pixels in {:?}",
            self.width,
            self.height,
            boundary_count,
            start.elapsed()
        );

        DistanceField::new(self.bitmap.width(), self.bitmap.height(), self.distance)
    }
}

/// Mark interior pixels whose class differs from a 4-neighbour.
///
/// Returns the number of boundary pixels found.
fn mark_boundaries(
    bitmap: &GrayscaleBitmap,
    distance: &mut [f32],
    nearest: &mut [BoundaryPoint],
) -> usize {
    let width = bitmap.width() as usize;
    let height = bitmap.height() as usize;
    let samples = bitmap.as_bytes();
    let inside = |i: usize| samples[i] > crate::bitmap::INSIDE_THRESHOLD;

    let mut count = 0;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let here = inside(i);
            if inside(i - 1) != here
                || inside(i + 1) != here
                || inside(i - width) != here
                || inside(i + width) != here
            {
                distance[i] = 0.0;
                nearest[i] = BoundaryPoint {
                    x: x as i32,
                    y: y as i32,
                };
                count += 1;
            }
        }
    }
    count
}

/// Adopt the neighbour's boundary point if it promises a shorter distance
#[inline]
#[allow(clippy::too_many_arguments)]
fn relax(
    distance: &mut [f32],
    nearest: &mut [BoundaryPoint],
    width: usize,
    x: usize,
    y: usize,
    nx: usize,
    ny: usize,
    cost: f32,
) {
    let here = y * width + x;
    let there = ny * width + nx;
    if distance[there] + cost < distance[here] {
        let point = nearest[there];
        nearest[here] = point;
        distance[here] = point.distance_to(x, y);
    }
}

/// Top-to-bottom, left-to-right scan over upper-left, up, upper-right, left
fn forward_pass(distance: &mut [f32], nearest: &mut [BoundaryPoint], width: usize, height: usize) {
    for y in 1..height - 2 {
        for x in 1..width - 2 {
            relax(distance, nearest, width, x, y, x - 1, y - 1, DIST_DIAG);
            relax(distance, nearest, width, x, y, x, y - 1, DIST_UNIT);
            relax(distance, nearest, width, x, y, x + 1, y - 1, DIST_DIAG);
            relax(distance, nearest, width, x, y, x - 1, y, DIST_UNIT);
        }
    }
}

/// Bottom-to-top, right-to-left scan over right, lower-left, down, lower-right
fn backward_pass(distance: &mut [f32], nearest: &mut [BoundaryPoint], width: usize, height: usize) {
    for y in (1..=height - 2).rev() {
        for x in (1..=width - 2).rev() {
            relax(distance, nearest, width, x, y, x + 1, y, DIST_UNIT);
            relax(distance, nearest, width, x, y, x - 1, y + 1, DIST_DIAG);
            relax(distance, nearest, width, x, y, x, y + 1, DIST_UNIT);
            relax(distance, nearest, width, x, y, x + 1, y + 1, DIST_DIAG);
        }
    }
}

/// Distances outside the figure are negative
fn apply_sign(bitmap: &GrayscaleBitmap, distance: &mut [f32]) {
    for (d, &sample) in distance.iter_mut().zip(bitmap.as_bytes()) {
        if sample <= crate::bitmap::INSIDE_THRESHOLD {
            *d = -*d;
        }
    }
}
