//! SVG to JPEG rasterization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::domain::error::BandplotError;

/// Family name of the font compiled into the binary.
pub const BUNDLED_FONT_FAMILY: &str = "DejaVu Sans";

const BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Parsing options whose font database holds only the bundled font, so chart
/// text renders the same on every host.
pub fn bundled_font_options() -> usvg::Options<'static> {
    let mut options = usvg::Options::default();
    options.font_family = BUNDLED_FONT_FAMILY.to_string();
    let fontdb = options.fontdb_mut();
    fontdb.load_font_data(BUNDLED_FONT.to_vec());
    fontdb.set_sans_serif_family(BUNDLED_FONT_FAMILY);
    options
}

/// Bundled font first, then whatever the system provides.
pub fn svg_options() -> usvg::Options<'static> {
    let mut options = bundled_font_options();
    options.fontdb_mut().load_system_fonts();
    options
}

fn render_error(path: &Path, reason: impl ToString) -> BandplotError {
    BandplotError::Render {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Rasterizes `svg` onto a fresh white canvas and writes it to `path` as JPEG.
pub fn write_jpeg(
    svg: &str,
    options: &usvg::Options<'_>,
    quality: u8,
    path: &Path,
) -> Result<(), BandplotError> {
    let tree = usvg::Tree::from_str(svg, options).map_err(|e| render_error(path, e))?;
    let size = tree.size().to_int_size();

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| render_error(path, "invalid canvas size"))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(size.width(), size.height(), pixmap.take())
        .ok_or_else(|| render_error(path, "pixel buffer does not match canvas size"))?;
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&rgb)
        .map_err(|e| render_error(path, e))?;
    writer.flush()?;
    Ok(())
}
