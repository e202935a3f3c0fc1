//! Rasterization of objects into embeddable pictures.
//!
//! An object is painted onto an offscreen surface at `zoom × supersample`,
//! downsampled to the output size and encoded. Encoded pictures are keyed
//! by an MD5 content hash so that identical renders are encoded once per
//! session and referenced afterwards.

use super::options::{ExportOptions, ImageFormat};
use super::result::{ExportStats, StoredPicture};
use crate::draw::{raster_size, Drawable, PaintOptions, SurfaceFactory};
use crate::error::{Error, Result};
use crate::model::Color;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// JPEG quality used for rasterized pictures.
pub const JPEG_QUALITY: u8 = 95;

/// A rasterized picture ready to be referenced from markup.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPicture {
    /// Data URI or file name
    pub token: String,
    /// Content hash
    pub hash: String,
    /// Unscaled width; negative when the object extends to the left
    pub width: f32,
    /// Unscaled height; negative when the object extends upwards
    pub height: f32,
}

/// Picture rasterizer with a hash-addressed cache.
///
/// Each export session owns its own rasterizer; the cache is not shared.
pub struct PictureRasterizer {
    surfaces: Arc<dyn SurfaceFactory>,
    format: ImageFormat,
    zoom: f32,
    supersample: f32,
    embed: bool,
    prefix: String,
    /// Content hash to picture token
    cache: HashMap<String, String>,
    stored: Vec<StoredPicture>,
}

impl PictureRasterizer {
    pub fn new(options: &ExportOptions, surfaces: Arc<dyn SurfaceFactory>) -> Self {
        Self {
            surfaces,
            format: options.image_format,
            zoom: options.zoom,
            supersample: options.supersample(),
            embed: options.embed_pictures,
            prefix: options.image_prefix.clone(),
            cache: HashMap::new(),
            stored: Vec::new(),
        }
    }

    /// Render `drawable` without its border and return a reference to the
    /// encoded picture.
    pub fn rasterize(
        &mut self,
        drawable: &dyn Drawable,
        paint: PaintOptions,
        stats: &mut ExportStats,
    ) -> Result<RasterPicture> {
        let bounds = drawable.bounds();
        let border = drawable.border();
        let zoom = self.zoom;

        // zero-size objects still show their stroke
        let mut width = if bounds.width == 0.0 { border.left.width } else { bounds.width };
        let mut height = if bounds.height == 0.0 { border.top.width } else { bounds.height };
        if width.abs() * zoom < 1.0 {
            width = 1.0 / zoom;
        }
        if height.abs() * zoom < 1.0 {
            height = 1.0 / zoom;
        }

        let key_hash = drawable.content_key().map(|key| {
            let mut hasher = Md5::new();
            hasher.update(&key);
            hasher.update(format!("|{}|{}|{:?}", zoom, self.supersample, self.format).as_bytes());
            format!("{:x}", hasher.finalize())
        });

        if let Some(hash) = &key_hash {
            if let Some(token) = self.cache.get(hash) {
                stats.add_cache_hit();
                return Ok(RasterPicture {
                    token: token.clone(),
                    hash: hash.clone(),
                    width,
                    height,
                });
            }
        }

        let left = if width > 0.0 { bounds.left } else { bounds.left + width };
        let top = if height > 0.0 { bounds.top } else { bounds.top + height };
        let scale = zoom * self.supersample;
        let background = if self.format.is_opaque() {
            Color::WHITE
        } else {
            Color::TRANSPARENT
        };

        let (out_w, out_h) = raster_size(width * zoom, height * zoom)?;
        let raster = {
            let (w, h) = raster_size(width * scale, height * scale)?;
            let mut surface = self.surfaces.create(w, h, background)?;
            surface.set_transform(scale, -left * scale, -top * scale);
            drawable.paint(
                surface.as_mut(),
                PaintOptions {
                    draw_border: false,
                    ..paint
                },
            )?;
            stats.add_skipped_text(surface.skipped_text());
            surface.snapshot()?
        };

        let raster = if raster.width() != out_w || raster.height() != out_h {
            image::imageops::resize(&raster, out_w, out_h, FilterType::CatmullRom)
        } else {
            raster
        };

        let encoded = encode(raster, self.format)?;
        let hash = key_hash.unwrap_or_else(|| {
            let mut hasher = Md5::new();
            hasher.update(&encoded);
            format!("{:x}", hasher.finalize())
        });

        if let Some(token) = self.cache.get(&hash) {
            stats.add_cache_hit();
            return Ok(RasterPicture {
                token: token.clone(),
                hash,
                width,
                height,
            });
        }

        let token = if self.embed {
            format!(
                "data:{};base64,{}",
                self.format.mime(),
                base64::engine::general_purpose::STANDARD.encode(&encoded)
            )
        } else {
            let name = format!("{}{}.{}", self.prefix, hash, self.format.extension());
            self.stored.push(StoredPicture {
                name: name.clone(),
                data: encoded,
            });
            name
        };

        log::debug!("Rasterized picture {} ({}x{})", hash, out_w, out_h);
        stats.add_picture();
        self.cache.insert(hash.clone(), token.clone());

        Ok(RasterPicture {
            token,
            hash,
            width,
            height,
        })
    }

    /// Number of distinct pictures encoded so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Pictures written by reference.
    pub fn stored(&self) -> &[StoredPicture] {
        &self.stored
    }

    /// Take the pictures stored since the last call.
    pub fn take_stored(&mut self) -> Vec<StoredPicture> {
        std::mem::take(&mut self.stored)
    }
}

fn encode(raster: RgbaImage, format: ImageFormat) -> Result<Vec<u8>> {
    let (image, output) = match format {
        ImageFormat::Png => (DynamicImage::ImageRgba8(raster), ImageOutputFormat::Png),
        ImageFormat::Gif => (DynamicImage::ImageRgba8(raster), ImageOutputFormat::Gif),
        ImageFormat::Bmp => (
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(raster).to_rgb8()),
            ImageOutputFormat::Bmp,
        ),
        ImageFormat::Jpeg => (
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(raster).to_rgb8()),
            ImageOutputFormat::Jpeg(JPEG_QUALITY),
        ),
    };

    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, output)
        .map_err(|e| Error::Image(format!("{:?} encoding failed: {}", format, e)))?;
    Ok(out.into_inner())
}
