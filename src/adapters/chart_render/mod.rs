//! Chart writers: SVG markup written directly, or rasterized to JPEG.

pub mod raster;
pub mod svg;

use std::fs;
use std::path::Path;

use resvg::usvg;
use tracing::debug;

use crate::domain::chart::ChartSpec;
use crate::domain::config::{ImageFormat, OutputConfig};
use crate::domain::error::BandplotError;
use crate::ports::chart_port::ChartPort;

fn ensure_parent(path: &Path) -> Result<(), BandplotError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

pub struct SvgChartAdapter {
    width: u32,
    height: u32,
}

impl SvgChartAdapter {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ChartPort for SvgChartAdapter {
    fn extension(&self) -> &'static str {
        ImageFormat::Svg.extension()
    }

    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), BandplotError> {
        ensure_parent(path)?;
        fs::write(path, svg::render_svg(chart, self.width, self.height))?;
        debug!(path = %path.display(), "wrote svg chart");
        Ok(())
    }
}

pub struct JpegChartAdapter {
    width: u32,
    height: u32,
    quality: u8,
    options: usvg::Options<'static>,
}

impl JpegChartAdapter {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            quality,
            options: raster::svg_options(),
        }
    }
}

impl ChartPort for JpegChartAdapter {
    fn extension(&self) -> &'static str {
        ImageFormat::Jpeg.extension()
    }

    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), BandplotError> {
        ensure_parent(path)?;
        let markup = svg::render_svg(chart, self.width, self.height);
        raster::write_jpeg(&markup, &self.options, self.quality, path)?;
        debug!(path = %path.display(), quality = self.quality, "wrote jpeg chart");
        Ok(())
    }
}

/// The writer for the configured output format.
pub fn chart_port_for(output: &OutputConfig) -> Box<dyn ChartPort> {
    match output.format {
        ImageFormat::Svg => Box::new(SvgChartAdapter::new(output.width, output.height)),
        ImageFormat::Jpeg => Box::new(JpegChartAdapter::new(
            output.width,
            output.height,
            output.quality,
        )),
    }
}
