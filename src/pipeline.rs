// src/pipeline.rs
use tracing::info;

use crate::align::align_columns;
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::format::{format_table, FormattedTable};
use crate::load::TableSource;
use crate::normalize::normalize_table;
use crate::render::Surface;
use crate::table::RawTable;

/// Align → Normalize → Format for one loaded table.
pub fn build_table(config: &DatasetConfig, raw: RawTable) -> Result<FormattedTable> {
    let aligned = align_columns(raw, &config.schema, config.header)?;
    let normalized = normalize_table(aligned)?;
    format_table(&normalized)
}

/// One full render pass: Load → Align → Normalize → Format → Render.
/// Nothing is kept between calls.
#[tracing::instrument(level = "info", skip_all, fields(dataset = %config.title))]
pub fn render_dataset(
    config: &DatasetConfig,
    source: &dyn TableSource,
    surface: &mut dyn Surface,
) -> Result<()> {
    let raw = source.load(&config.load_request())?;
    let table = build_table(config, raw)?;
    info!(rows = table.num_rows(), cols = table.headers.len(), "formatted");

    let subtitle = config.display_subtitle();
    surface.render(&table, Some(config.title.as_str()), subtitle.as_deref())
}
