//! Painting document objects onto a surface.

use super::{Path, Surface};
use crate::error::{Error, Result};
use crate::model::{
    Border, BorderLine, CapStyle, Crop, Fill, LineObject, ObjectKind, PictureObject, Rect,
    ReportObject, ShapeKind, ShapeObject, SizeMode, TableCell, Watermark, WatermarkImageSize,
};
use image::RgbaImage;

/// What parts of an object to paint.
#[derive(Debug, Clone, Copy)]
pub struct PaintOptions {
    pub draw_border: bool,
    pub draw_text: bool,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            draw_border: true,
            draw_text: true,
        }
    }
}

/// Something that can be rasterized.
pub trait Drawable {
    /// Page-absolute bounds in unscaled pixels. Extents may be negative.
    fn bounds(&self) -> Rect;

    fn border(&self) -> &Border;

    fn paint(&self, surface: &mut dyn Surface, options: PaintOptions) -> Result<()>;

    /// Bytes identifying the rendered pixels when they are known before
    /// painting, such as a source picture plus its display settings.
    fn content_key(&self) -> Option<Vec<u8>> {
        None
    }
}

fn paint_border(surface: &mut dyn Surface, rect: Rect, border: &Border) {
    let r = rect.normalized();
    let sides = [
        (border.lines.left, &border.left, (r.left, r.top, r.left, r.bottom())),
        (border.lines.top, &border.top, (r.left, r.top, r.right(), r.top)),
        (border.lines.right, &border.right, (r.right(), r.top, r.right(), r.bottom())),
        (border.lines.bottom, &border.bottom, (r.left, r.bottom(), r.right(), r.bottom())),
    ];
    for (visible, pen, (x1, y1, x2, y2)) in sides {
        if visible {
            surface.stroke_path(&Path::segment(x1, y1, x2, y2), pen);
        }
    }
}

fn decode(data: &[u8]) -> Result<RgbaImage> {
    Ok(super::decode_image(data)?.to_rgba8())
}

fn apply_crop(image: RgbaImage, crop: Option<Crop>) -> Result<RgbaImage> {
    let Some(crop) = crop else {
        return Ok(image);
    };
    let width = image.width().saturating_sub(crop.left + crop.right);
    let height = image.height().saturating_sub(crop.top + crop.bottom);
    if width == 0 || height == 0 {
        return Err(Error::Image(format!(
            "Crop {:?} leaves nothing of a {}x{} image",
            crop,
            image.width(),
            image.height()
        )));
    }
    Ok(image::imageops::crop_imm(&image, crop.left, crop.top, width, height).to_image())
}

/// Destination of a picture of natural size `(w, h)` inside `rect`.
pub fn fit_picture(mode: SizeMode, rect: Rect, w: f32, h: f32) -> Rect {
    let r = rect.normalized();
    match mode {
        SizeMode::Normal => Rect::new(r.left, r.top, w, h),
        SizeMode::Center => Rect::new(r.left + (r.width - w) / 2.0, r.top + (r.height - h) / 2.0, w, h),
        SizeMode::Stretch => r,
        SizeMode::Zoom => {
            if w <= 0.0 || h <= 0.0 {
                return r;
            }
            let k = (r.width / w).min(r.height / h);
            let (fw, fh) = (w * k, h * k);
            Rect::new(r.left + (r.width - fw) / 2.0, r.top + (r.height - fh) / 2.0, fw, fh)
        }
    }
}

fn paint_picture(surface: &mut dyn Surface, rect: Rect, picture: &PictureObject) -> Result<()> {
    let Some(data) = picture.image.as_deref() else {
        return Ok(());
    };
    let image = apply_crop(decode(data)?, picture.crop)?;
    let dest = fit_picture(picture.size_mode, rect, image.width() as f32, image.height() as f32);
    surface.draw_image(&image, dest, 1.0 - picture.transparency, picture.angle);
    Ok(())
}

fn shape_path(shape: &ShapeObject, rect: Rect) -> Path {
    let r = rect.normalized();
    match shape.shape {
        ShapeKind::Rectangle => Path::rect(r),
        ShapeKind::RoundRectangle => {
            let radius = if shape.curve > 0.0 {
                shape.curve
            } else {
                r.width.min(r.height) / 4.0
            };
            Path::round_rect(r, radius)
        }
        ShapeKind::Ellipse => Path::ellipse(r),
        ShapeKind::Triangle => Path::polygon(&[
            (r.left + r.width / 2.0, r.top),
            (r.right(), r.bottom()),
            (r.left, r.bottom()),
        ]),
        ShapeKind::Diamond => Path::polygon(&[
            (r.left + r.width / 2.0, r.top),
            (r.right(), r.top + r.height / 2.0),
            (r.left + r.width / 2.0, r.bottom()),
            (r.left, r.top + r.height / 2.0),
        ]),
    }
}

const CAP_SIZE: f32 = 8.0;

fn paint_cap(surface: &mut dyn Surface, cap: CapStyle, tip: (f32, f32), from: (f32, f32), pen: &BorderLine) -> Result<()> {
    let (dx, dy) = (tip.0 - from.0, tip.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return Ok(());
    }
    let (ux, uy) = (dx / len, dy / len);
    let half = CAP_SIZE / 2.0;
    let fill = Fill::solid(pen.color);

    match cap {
        CapStyle::None => Ok(()),
        CapStyle::Arrow => {
            let base = (tip.0 - ux * CAP_SIZE, tip.1 - uy * CAP_SIZE);
            surface.fill_path(
                &Path::polygon(&[
                    tip,
                    (base.0 - uy * half, base.1 + ux * half),
                    (base.0 + uy * half, base.1 - ux * half),
                ]),
                &fill,
            )
        }
        CapStyle::Circle => surface.fill_path(
            &Path::ellipse(Rect::new(tip.0 - half, tip.1 - half, CAP_SIZE, CAP_SIZE)),
            &fill,
        ),
        CapStyle::Square => surface.fill_path(
            &Path::rect(Rect::new(tip.0 - half, tip.1 - half, CAP_SIZE, CAP_SIZE)),
            &fill,
        ),
    }
}

fn paint_line(surface: &mut dyn Surface, rect: Rect, line: &LineObject, pen: &BorderLine) -> Result<()> {
    let start = (rect.left, rect.top);
    let end = if line.diagonal {
        (rect.right(), rect.bottom())
    } else if rect.width.abs() >= rect.height.abs() {
        (rect.right(), rect.top)
    } else {
        (rect.left, rect.bottom())
    };

    surface.stroke_path(&Path::segment(start.0, start.1, end.0, end.1), pen);
    paint_cap(surface, line.start_cap, start, end, pen)?;
    paint_cap(surface, line.end_cap, end, start, pen)
}

impl Drawable for ReportObject {
    fn bounds(&self) -> Rect {
        self.base.rect()
    }

    fn border(&self) -> &Border {
        &self.base.border
    }

    fn paint(&self, surface: &mut dyn Surface, options: PaintOptions) -> Result<()> {
        let rect = self.bounds();

        match &self.kind {
            ObjectKind::Shape(shape) => {
                let path = shape_path(shape, rect);
                surface.fill_path(&path, &self.base.fill)?;
                surface.stroke_path(&path, &self.base.border.left);
                // shapes are outlined by their own path
                return Ok(());
            }
            ObjectKind::Line(line) => {
                return paint_line(surface, rect, line, &self.base.border.left);
            }
            _ => surface.fill_path(&Path::rect(rect), &self.base.fill)?,
        }

        match &self.kind {
            ObjectKind::Text(text) if options.draw_text => {
                let inner = rect.inset(&text.padding);
                surface.draw_text(&text.text, &text.font, text.text_color, inner, text.angle);
            }
            ObjectKind::CellularText(cellular) if options.draw_text => {
                surface.draw_text(&cellular.text, &cellular.font, cellular.text_color, rect, 0.0);
            }
            ObjectKind::Picture(picture) => paint_picture(surface, rect, picture)?,
            _ => {}
        }

        if options.draw_border {
            paint_border(surface, rect, &self.base.border);
        }
        Ok(())
    }

    fn content_key(&self) -> Option<Vec<u8>> {
        let ObjectKind::Picture(picture) = &self.kind else {
            return None;
        };
        let data = picture.image.as_deref()?;
        let mut key = data.to_vec();
        key.extend_from_slice(
            format!(
                "|{}|{}|{}|{}|{:?}|{:?}|{:?}",
                self.base.width,
                self.base.height,
                picture.angle,
                picture.transparency,
                picture.size_mode,
                picture.crop,
                self.base.fill
            )
            .as_bytes(),
        );
        Some(key)
    }
}

/// A table cell placed at page-absolute coordinates.
pub struct CellPaint<'a> {
    pub cell: &'a TableCell,
    pub rect: Rect,
}

impl Drawable for CellPaint<'_> {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn border(&self) -> &Border {
        &self.cell.border
    }

    fn paint(&self, surface: &mut dyn Surface, options: PaintOptions) -> Result<()> {
        surface.fill_path(&Path::rect(self.rect), &self.cell.fill)?;
        if options.draw_text {
            let text = &self.cell.text;
            surface.draw_text(
                &text.text,
                &text.font,
                text.text_color,
                self.rect.inset(&text.padding),
                text.angle,
            );
        }
        if options.draw_border {
            paint_border(surface, self.rect, &self.cell.border);
        }
        Ok(())
    }
}

/// A fill that CSS cannot express, painted over a rectangle.
pub struct FillPatch<'a> {
    pub rect: Rect,
    pub fill: &'a Fill,
    pub border: Border,
}

impl<'a> FillPatch<'a> {
    pub fn new(rect: Rect, fill: &'a Fill) -> Self {
        Self {
            rect,
            fill,
            border: Border::none(),
        }
    }
}

impl Drawable for FillPatch<'_> {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn border(&self) -> &Border {
        &self.border
    }

    fn paint(&self, surface: &mut dyn Surface, _options: PaintOptions) -> Result<()> {
        surface.fill_path(&Path::rect(self.rect), self.fill)
    }

    fn content_key(&self) -> Option<Vec<u8>> {
        Some(format!("fill|{}|{}|{:?}", self.rect.width, self.rect.height, self.fill).into_bytes())
    }
}

/// The image layer of a page watermark.
pub struct WatermarkImage<'a> {
    pub rect: Rect,
    pub watermark: &'a Watermark,
    pub border: Border,
}

impl<'a> WatermarkImage<'a> {
    pub fn new(rect: Rect, watermark: &'a Watermark) -> Self {
        Self {
            rect,
            watermark,
            border: Border::none(),
        }
    }
}

impl Drawable for WatermarkImage<'_> {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn border(&self) -> &Border {
        &self.border
    }

    fn paint(&self, surface: &mut dyn Surface, _options: PaintOptions) -> Result<()> {
        let Some(data) = self.watermark.image.as_deref() else {
            return Ok(());
        };
        let image = decode(data)?;
        let (w, h) = (image.width() as f32, image.height() as f32);
        let opacity = 1.0 - self.watermark.image_transparency;
        let r = self.rect;

        let mode = match self.watermark.image_size {
            WatermarkImageSize::Tile => {
                let mut y = r.top;
                while y < r.bottom() {
                    let mut x = r.left;
                    while x < r.right() {
                        surface.draw_image(&image, Rect::new(x, y, w, h), opacity, 0.0);
                        x += w.max(1.0);
                    }
                    y += h.max(1.0);
                }
                return Ok(());
            }
            WatermarkImageSize::Normal => SizeMode::Normal,
            WatermarkImageSize::Center => SizeMode::Center,
            WatermarkImageSize::Stretch => SizeMode::Stretch,
            WatermarkImageSize::Zoom => SizeMode::Zoom,
        };
        surface.draw_image(&image, fit_picture(mode, r, w, h), opacity, 0.0);
        Ok(())
    }

    fn content_key(&self) -> Option<Vec<u8>> {
        let data = self.watermark.image.as_deref()?;
        let mut key = data.to_vec();
        key.extend_from_slice(
            format!(
                "|{}|{}|{:?}|{}",
                self.rect.width, self.rect.height, self.watermark.image_size, self.watermark.image_transparency
            )
            .as_bytes(),
        );
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{SkiaSurface, Surface};
    use crate::model::{Color, ObjectBase};

    #[test]
    fn test_fit_picture_zoom() {
        let dest = fit_picture(SizeMode::Zoom, Rect::new(0.0, 0.0, 100.0, 50.0), 20.0, 20.0);
        assert_eq!(dest, Rect::new(25.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_fit_picture_center() {
        let dest = fit_picture(SizeMode::Center, Rect::new(10.0, 10.0, 40.0, 40.0), 20.0, 10.0);
        assert_eq!(dest, Rect::new(20.0, 25.0, 20.0, 10.0));
    }

    #[test]
    fn test_picture_decode_failure() {
        let obj = ReportObject::picture(
            ObjectBase::new("Broken", 0.0, 0.0, 10.0, 10.0),
            PictureObject::new(b"not an image".to_vec()),
        );
        let mut surface = SkiaSurface::new(10, 10, Color::WHITE).unwrap();
        assert!(obj.paint(&mut surface, PaintOptions::default()).is_err());
    }

    #[test]
    fn test_shape_fill() {
        let obj = ReportObject::shape(
            ObjectBase::new("Box", 0.0, 0.0, 10.0, 10.0).with_fill(Fill::solid(Color::rgb(0, 255, 0))),
            ShapeObject::new(ShapeKind::Rectangle),
        );
        let mut surface = SkiaSurface::new(10, 10, Color::TRANSPARENT).unwrap();
        obj.paint(&mut surface, PaintOptions::default()).unwrap();
        let image = surface.snapshot().unwrap();
        assert_eq!(image.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_content_key_tracks_display_settings() {
        let base = ObjectBase::new("Pic", 0.0, 0.0, 10.0, 10.0);
        let a = ReportObject::picture(base.clone(), PictureObject::new(vec![1, 2, 3]));
        let mut rotated = PictureObject::new(vec![1, 2, 3]);
        rotated.angle = 90.0;
        let b = ReportObject::picture(base, rotated);

        assert_eq!(a.content_key(), a.content_key());
        assert_ne!(a.content_key(), b.content_key());
    }
}
