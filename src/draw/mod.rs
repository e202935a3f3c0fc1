//! Drawing surfaces and object painting used by the picture rasterizer.

mod paint;
mod skia;
mod surface;

pub use paint::{fit_picture, CellPaint, Drawable, FillPatch, PaintOptions, WatermarkImage};
pub use skia::{SkiaSurface, SkiaSurfaceFactory};
pub use surface::{decode_image, raster_size, Path, PathVerb, Surface, SurfaceFactory, MAX_RASTER_PIXELS, MAX_RASTER_SIDE};
