//! Chart rendering port trait.

use std::path::Path;

use crate::domain::chart::ChartSpec;
use crate::domain::error::BandplotError;

/// Port for writing one figure to disk.
pub trait ChartPort {
    /// File extension (without the dot) of the files this port writes.
    fn extension(&self) -> &'static str;

    /// Write `chart` to `path`, creating missing parent directories.
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), BandplotError>;
}
