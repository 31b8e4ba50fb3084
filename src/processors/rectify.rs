//! Perspective rectification of a detected document boundary.
//!
//! [`RectifyPlan`] computes the target rectangle and the projective
//! transform mapping an ordered quad onto it; [`warp_perspective`]
//! materializes the rectified raster using inverse mapping with bilinear
//! interpolation. [`WarpResult`] carries the outcome together with the
//! quad that was used and whether true perspective correction was applied.

use crate::core::ScanError;
use crate::processors::geometry::{Point, Quad};
use image::{Rgb, RgbImage};
use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

/// A rectification plan: source quad, target size, and the projective
/// transform between them.
#[derive(Debug, Clone)]
pub struct RectifyPlan {
    /// The ordered source quadrilateral in raster space.
    pub quad: Quad,
    /// Target rectangle width in pixels.
    pub width: u32,
    /// Target rectangle height in pixels.
    pub height: u32,
    /// The 3x3 projective transform mapping the quad onto the target
    /// rectangle corners (0,0), (W-1,0), (W-1,H-1), (0,H-1).
    pub transform: Matrix3<f32>,
}

impl RectifyPlan {
    /// Computes the rectification plan for an ordered quad.
    ///
    /// The target size uses the longer of each pair of opposing edges, so a
    /// perspective-skewed trapezoid is never under-sized. Estimates are
    /// truncated to integers with a minimum of 1.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` if the quad is degenerate
    /// (coincident adjacent corners or a zero-length edge pair). The
    /// boundary detector's area band never emits such a quad, so hitting
    /// this is a contract violation, not a degraded outcome.
    pub fn from_quad(quad: &Quad) -> Result<RectifyPlan, ScanError> {
        if quad.is_degenerate() {
            return Err(ScanError::invalid_input(
                "degenerate quad: adjacent corners coincide",
            ));
        }

        let tl = quad.top_left;
        let tr = quad.top_right;
        let br = quad.bottom_right;
        let bl = quad.bottom_left;

        let width_estimate = br.distance(&bl).max(tr.distance(&tl));
        let height_estimate = tr.distance(&br).max(tl.distance(&bl));
        if width_estimate <= 0.0 || height_estimate <= 0.0 {
            return Err(ScanError::invalid_input(format!(
                "degenerate quad: estimated target size {}x{}",
                width_estimate, height_estimate
            )));
        }

        let width = (width_estimate as u32).max(1);
        let height = (height_estimate as u32).max(1);

        let destination = [
            Point::new(0.0, 0.0),
            Point::new((width - 1) as f32, 0.0),
            Point::new((width - 1) as f32, (height - 1) as f32),
            Point::new(0.0, (height - 1) as f32),
        ];
        let transform = perspective_transform(&quad.corners(), &destination)?;

        Ok(RectifyPlan {
            quad: *quad,
            width,
            height,
            transform,
        })
    }
}

/// Result of boundary detection plus rectification for one image.
///
/// Immutable after creation; one instance is produced per input image.
#[derive(Debug, Clone)]
pub struct WarpResult {
    /// The rectified image, or the original when no boundary was found.
    pub image: RgbImage,
    /// The quad used: a detected boundary or the full-frame fallback.
    pub quad: Quad,
    /// Whether true perspective correction was applied. `false` means the
    /// original frame passed through unchanged.
    pub used_warp: bool,
}

/// Calculates the projective transform mapping 4 source points onto 4
/// destination points.
///
/// Solves the standard 8x8 linear system for the homography coefficients.
fn perspective_transform(
    src_points: &[Point; 4],
    dst_points: &[Point; 4],
) -> Result<Matrix3<f32>, ScanError> {
    let mut a = nalgebra::DMatrix::<f32>::zeros(8, 8);
    let mut b = nalgebra::DVector::<f32>::zeros(8);

    for i in 0..4 {
        let src = &src_points[i];
        let dst = &dst_points[i];

        a.set_row(
            i * 2,
            &nalgebra::RowDVector::from_row_slice(&[
                src.x,
                src.y,
                1.0,
                0.0,
                0.0,
                0.0,
                -src.x * dst.x,
                -src.y * dst.x,
            ]),
        );
        b[i * 2] = dst.x;

        a.set_row(
            i * 2 + 1,
            &nalgebra::RowDVector::from_row_slice(&[
                0.0,
                0.0,
                0.0,
                src.x,
                src.y,
                1.0,
                -src.x * dst.y,
                -src.y * dst.y,
            ]),
        );
        b[i * 2 + 1] = dst.y;
    }

    let decomp = a.lu();
    let solution = decomp.solve(&b).ok_or_else(|| {
        ScanError::invalid_input("cannot solve perspective transform for the given quad")
    })?;

    Ok(Matrix3::new(
        solution[0],
        solution[1],
        solution[2],
        solution[3],
        solution[4],
        solution[5],
        solution[6],
        solution[7],
        1.0,
    ))
}

/// Applies a rectification plan to an image.
///
/// Uses inverse mapping with bilinear interpolation; rows of the output are
/// processed in parallel. Pixels mapping outside the source image are
/// black.
///
/// # Errors
///
/// Returns `ScanError::InvalidInput` if the plan's transform cannot be
/// inverted.
pub fn warp_perspective(src_image: &RgbImage, plan: &RectifyPlan) -> Result<RgbImage, ScanError> {
    let inv_matrix = plan
        .transform
        .try_inverse()
        .ok_or_else(|| ScanError::invalid_input("cannot invert rectification transform"))?;

    let mut dst_image = RgbImage::new(plan.width, plan.height);
    let (src_width, src_height) = src_image.dimensions();
    let buffer: &mut [u8] = dst_image.as_mut();

    buffer
        .par_chunks_mut((plan.width * 3) as usize)
        .enumerate()
        .for_each(|(dst_y, row_buffer)| {
            for dst_x in 0..plan.width {
                let dst_point = Vector3::new(dst_x as f32, dst_y as f32, 1.0);
                let src_point = inv_matrix * dst_point;

                let mut final_pixel = Rgb([0, 0, 0]);

                if src_point.z.abs() > f32::EPSILON {
                    let src_x = src_point.x / src_point.z;
                    let src_y = src_point.y / src_point.z;

                    if src_x >= 0.0
                        && src_y >= 0.0
                        && src_x < (src_width - 1) as f32
                        && src_y < (src_height - 1) as f32
                    {
                        final_pixel = bilinear_interpolate(src_image, src_x, src_y);
                    }
                }

                let index = (dst_x * 3) as usize;
                row_buffer[index..index + 3].copy_from_slice(&final_pixel.0);
            }
        });

    Ok(dst_image)
}

/// Bilinear interpolation of a pixel value at fractional coordinates.
fn bilinear_interpolate(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let x1 = x.floor() as u32;
    let y1 = y.floor() as u32;
    let x2 = (x1 + 1).min(image.width() - 1);
    let y2 = (y1 + 1).min(image.height() - 1);

    let dx = x - x1 as f32;
    let dy = y - y1 as f32;

    let p11 = image.get_pixel(x1, y1);
    let p12 = image.get_pixel(x1, y2);
    let p21 = image.get_pixel(x2, y1);
    let p22 = image.get_pixel(x2, y2);

    let mut result = [0u8; 3];
    for (i, result_channel) in result.iter_mut().enumerate() {
        let val = (1.0 - dx) * (1.0 - dy) * p11.0[i] as f32
            + dx * (1.0 - dy) * p21.0[i] as f32
            + (1.0 - dx) * dy * p12.0[i] as f32
            + dx * dy * p22.0[i] as f32;
        *result_channel = val.round().clamp(0.0, 255.0) as u8;
    }

    Rgb(result)
}
