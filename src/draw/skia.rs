//! Default surface backend built on tiny-skia pixmaps.

use super::{Path, PathVerb, Surface, SurfaceFactory};
use crate::error::{Error, Result};
use crate::model::{BorderLine, Color, Fill, Font, LineStyle, Rect};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, PathBuilder, Pattern,
    Pixmap, PixmapPaint, Point, SpreadMode, Stroke, StrokeDash, Transform,
};

/// Surface drawing into an in-memory pixmap.
///
/// Glyph rasterization needs font files, so [`Surface::draw_text`] is a
/// no-op here and is only counted. Hosts that need raster text provide
/// their own factory.
pub struct SkiaSurface {
    pixmap: Pixmap,
    scale: f32,
    transform: Transform,
    skipped_text: u32,
}

impl SkiaSurface {
    /// Create a surface of the given size, filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let mut pixmap = Pixmap::new(width.max(1), height.max(1)).ok_or_else(|| {
            Error::Surface(format!("Failed to create pixmap {}x{}", width, height))
        })?;
        pixmap.fill(skia_color(background));
        Ok(Self {
            pixmap,
            scale: 1.0,
            transform: Transform::identity(),
            skipped_text: 0,
        })
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for verb in path.verbs() {
        match *verb {
            PathVerb::MoveTo(x, y) => pb.move_to(x, y),
            PathVerb::LineTo(x, y) => pb.line_to(x, y),
            PathVerb::CubicTo(x1, y1, x2, y2, x, y) => pb.cubic_to(x1, y1, x2, y2, x, y),
            PathVerb::Close => pb.close(),
        }
    }
    pb.finish()
}

/// Convert a straight-alpha image into a premultiplied pixmap.
pub(crate) fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn pixmap_to_image(pixmap: &Pixmap) -> Option<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
}

impl Surface for SkiaSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: Color) {
        self.pixmap.fill(skia_color(color));
    }

    fn set_transform(&mut self, scale: f32, dx: f32, dy: f32) {
        self.scale = scale;
        self.transform = Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) -> Result<()> {
        let Some(skia_path) = to_skia_path(path) else {
            return Ok(());
        };
        let bounds = skia_path.bounds();

        match fill {
            Fill::Solid { color } => {
                if color.is_transparent() {
                    return Ok(());
                }
                let mut paint = Paint::default();
                paint.set_color(skia_color(*color));
                paint.anti_alias = true;
                self.pixmap
                    .fill_path(&skia_path, &paint, FillRule::Winding, self.transform, None);
            }
            Fill::LinearGradient { start, end, angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                let cx = bounds.left() + bounds.width() / 2.0;
                let cy = bounds.top() + bounds.height() / 2.0;
                let hx = cos * bounds.width() / 2.0;
                let hy = sin * bounds.height() / 2.0;
                let shader = LinearGradient::new(
                    Point::from_xy(cx - hx, cy - hy),
                    Point::from_xy(cx + hx, cy + hy),
                    vec![
                        GradientStop::new(0.0, skia_color(*start)),
                        GradientStop::new(1.0, skia_color(*end)),
                    ],
                    SpreadMode::Pad,
                    Transform::identity(),
                );
                let mut paint = Paint::default();
                paint.anti_alias = true;
                match shader {
                    Some(shader) => paint.shader = shader,
                    // degenerate gradient, fall back to the start colour
                    None => paint.set_color(skia_color(*start)),
                }
                self.pixmap
                    .fill_path(&skia_path, &paint, FillRule::Winding, self.transform, None);
            }
            Fill::Texture { image } => {
                let texture = super::decode_image(image)?.to_rgba8();
                let texture = pixmap_from_image(&texture)
                    .ok_or_else(|| Error::Surface("Empty texture image".into()))?;
                let sx = bounds.width() / texture.width() as f32;
                let sy = bounds.height() / texture.height() as f32;
                let mut paint = Paint::default();
                paint.anti_alias = true;
                paint.shader = Pattern::new(
                    texture.as_ref(),
                    SpreadMode::Repeat,
                    FilterQuality::Bicubic,
                    1.0,
                    Transform::from_row(sx, 0.0, 0.0, sy, bounds.left(), bounds.top()),
                );
                self.pixmap
                    .fill_path(&skia_path, &paint, FillRule::Winding, self.transform, None);
            }
        }
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, pen: &BorderLine) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        if pen.width <= 0.0 || pen.color.is_transparent() {
            return;
        }

        let mut paint = Paint::default();
        paint.set_color(skia_color(pen.color));
        paint.anti_alias = true;

        let dash = pen
            .style
            .dash_pattern()
            .and_then(|pattern| StrokeDash::new(pattern.iter().map(|d| d * pen.width).collect(), 0.0));
        let width = if pen.style == LineStyle::Double {
            pen.width * 3.0
        } else {
            pen.width
        };
        let stroke = Stroke {
            width,
            dash,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, self.transform, None);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, opacity: f32, angle: f32) {
        let Some(source) = pixmap_from_image(image) else {
            return;
        };
        let sx = dest.width / source.width() as f32;
        let sy = dest.height / source.height() as f32;
        let cx = dest.left + dest.width / 2.0;
        let cy = dest.top + dest.height / 2.0;

        let placement = Transform::from_row(sx, 0.0, 0.0, sy, dest.left, dest.top);
        let rotation = Transform::from_rotate_at(angle, cx, cy);
        let transform = self.transform.pre_concat(rotation).pre_concat(placement);

        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    fn draw_text(&mut self, text: &str, font: &Font, _color: Color, _rect: Rect, _angle: f32) {
        if text.trim().is_empty() {
            return;
        }
        self.skipped_text += 1;
        log::debug!(
            "Skipping raster text ({} chars, {} {}pt): no glyph backend",
            text.chars().count(),
            font.family,
            font.size
        );
    }

    fn skipped_text(&self) -> u32 {
        self.skipped_text
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        pixmap_to_image(&self.pixmap)
            .ok_or_else(|| Error::Surface("Pixmap buffer size mismatch".into()))
    }
}

/// Factory for [`SkiaSurface`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaSurfaceFactory;

impl SurfaceFactory for SkiaSurfaceFactory {
    fn create(&self, width: u32, height: u32, background: Color) -> Result<Box<dyn Surface>> {
        Ok(Box::new(SkiaSurface::new(width, height, background)?))
    }
}
