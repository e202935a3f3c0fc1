//! Drawing surface abstraction.

use crate::error::{Error, Result};
use crate::model::{BorderLine, Color, Fill, Font, Rect};
use image::io::{Limits, Reader};
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;

/// Largest side of any raster allocated during export, in pixels.
pub const MAX_RASTER_SIDE: u32 = 16_384;

/// Largest pixel count of any raster allocated during export.
pub const MAX_RASTER_PIXELS: u64 = 64 * 1024 * 1024;

/// Whole-pixel size of a `width` × `height` raster, at least 1×1.
///
/// Sizes past [`MAX_RASTER_SIDE`] or [`MAX_RASTER_PIXELS`] are refused
/// before anything is allocated.
pub fn raster_size(width: f32, height: f32) -> Result<(u32, u32)> {
    let w = width.abs().round().max(1.0);
    let h = height.abs().round().max(1.0);
    let side = MAX_RASTER_SIDE as f32;
    if !(w <= side && h <= side) || (w as u64) * (h as u64) > MAX_RASTER_PIXELS {
        return Err(Error::Image(format!(
            "raster of {}x{} pixels exceeds the size limit",
            width, height
        )));
    }
    Ok((w as u32, h as u32))
}

/// Decode embedded image bytes, refusing images larger than a raster may be.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_RASTER_SIDE);
    limits.max_image_height = Some(MAX_RASTER_SIDE);
    limits.max_alloc = Some(MAX_RASTER_PIXELS * 4);

    let mut reader = Reader::new(Cursor::new(data)).with_guessed_format()?;
    reader.limits(limits);
    Ok(reader.decode()?)
}

/// One step of a path outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVerb {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32),
    Close,
}

/// Backend-independent vector outline in unscaled page coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    verbs: Vec<PathVerb>,
}

/// Control point distance for a quarter-circle Bezier approximation.
const KAPPA: f32 = 0.552_284_8;

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.verbs.push(PathVerb::MoveTo(x, y));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.verbs.push(PathVerb::LineTo(x, y));
        self
    }

    pub fn cubic_to(mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> Self {
        self.verbs.push(PathVerb::CubicTo(x1, y1, x2, y2, x, y));
        self
    }

    pub fn close(mut self) -> Self {
        self.verbs.push(PathVerb::Close);
        self
    }

    /// Closed polygon through the given points.
    pub fn polygon(points: &[(f32, f32)]) -> Self {
        let mut path = Self::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(x, y) } else { path.line_to(x, y) };
        }
        path.close()
    }

    /// Rectangle outline.
    pub fn rect(r: Rect) -> Self {
        let r = r.normalized();
        Self::polygon(&[
            (r.left, r.top),
            (r.right(), r.top),
            (r.right(), r.bottom()),
            (r.left, r.bottom()),
        ])
    }

    /// Ellipse inscribed in a rectangle.
    pub fn ellipse(r: Rect) -> Self {
        // radii clamp to half of each side
        Self::round_rect(r, f32::MAX)
    }

    /// Rectangle with rounded corners of the given radius.
    pub fn round_rect(r: Rect, radius: f32) -> Self {
        let r = r.normalized();
        let rx = radius.min(r.width / 2.0).max(0.0);
        let ry = radius.min(r.height / 2.0).max(0.0);
        let (l, t, rt, b) = (r.left, r.top, r.right(), r.bottom());
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        Self::new()
            .move_to(l + rx, t)
            .line_to(rt - rx, t)
            .cubic_to(rt - rx + kx, t, rt, t + ry - ky, rt, t + ry)
            .line_to(rt, b - ry)
            .cubic_to(rt, b - ry + ky, rt - rx + kx, b, rt - rx, b)
            .line_to(l + rx, b)
            .cubic_to(l + rx - kx, b, l, b - ry + ky, l, b - ry)
            .line_to(l, t + ry)
            .cubic_to(l, t + ry - ky, l + rx - kx, t, l + rx, t)
            .close()
    }

    /// Straight segment.
    pub fn segment(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new().move_to(x1, y1).line_to(x2, y2)
    }

    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

/// Target of object painting.
///
/// Drawing calls take unscaled page coordinates; the transform set with
/// [`Surface::set_transform`] maps them to surface pixels as
/// `(x * scale + dx, y * scale + dy)`.
pub trait Surface {
    /// Size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill every pixel with a colour.
    fn clear(&mut self, color: Color);

    fn set_transform(&mut self, scale: f32, dx: f32, dy: f32);

    /// Current scale factor.
    fn scale(&self) -> f32;

    /// Fill a closed path.
    fn fill_path(&mut self, path: &Path, fill: &Fill) -> Result<()>;

    /// Stroke a path with a border line pen. The pen width is in unscaled pixels.
    fn stroke_path(&mut self, path: &Path, pen: &BorderLine);

    /// Draw a bitmap into `dest`, rotated by `angle` degrees around its centre.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, opacity: f32, angle: f32);

    /// Draw text inside `rect`, rotated by `angle` degrees.
    fn draw_text(&mut self, text: &str, font: &Font, color: Color, rect: Rect, angle: f32);

    /// Number of non-empty text runs this surface could not draw.
    fn skipped_text(&self) -> u32 {
        0
    }

    /// Copy the pixels out as straight-alpha RGBA.
    fn snapshot(&self) -> Result<RgbaImage>;
}

/// Creates offscreen surfaces.
///
/// Surfaces are owned by the caller and released when dropped.
pub trait SurfaceFactory: Send + Sync {
    fn create(&self, width: u32, height: u32, background: Color) -> Result<Box<dyn Surface>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon() {
        let path = Path::polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert_eq!(path.verbs().len(), 4);
        assert_eq!(path.verbs()[0], PathVerb::MoveTo(0.0, 0.0));
        assert_eq!(path.verbs()[3], PathVerb::Close);
    }

    #[test]
    fn test_rect_normalizes() {
        let path = Path::rect(Rect::new(10.0, 10.0, -10.0, 5.0));
        assert_eq!(path.verbs()[0], PathVerb::MoveTo(0.0, 10.0));
    }

    #[test]
    fn test_round_rect_radius_clamped() {
        let path = Path::round_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 100.0);
        assert_eq!(path.verbs()[0], PathVerb::MoveTo(5.0, 0.0));
    }

    #[test]
    fn test_raster_size_rounds_up_to_one_pixel() {
        assert_eq!(raster_size(0.2, 3.6).unwrap(), (1, 4));
        assert_eq!(raster_size(-20.0, 0.0).unwrap(), (20, 1));
    }

    #[test]
    fn test_raster_size_limits() {
        assert!(matches!(raster_size(1e10, 1e10), Err(Error::Image(_))));
        assert!(raster_size(f32::INFINITY, 1.0).is_err());
        assert!(raster_size(MAX_RASTER_SIDE as f32 + 1.0, 1.0).is_err());
        assert!(raster_size(MAX_RASTER_SIDE as f32, 1.0).is_ok());
        // each side fits, the area does not
        assert!(raster_size(16_000.0, 16_000.0).is_err());
        assert!(raster_size(8_192.0, 8_192.0).is_ok());
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_image_limits() {
        assert_eq!(decode_image(&png(3, 2)).unwrap().width(), 3);
        assert!(decode_image(&png(MAX_RASTER_SIDE + 1, 1)).is_err());
        assert!(matches!(decode_image(b"garbage"), Err(Error::Image(_))));
    }
}
