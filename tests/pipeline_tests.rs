use anyhow::Result;
use momentum_board::{
    render::{HtmlSurface, MarkdownSurface},
    render_dataset, CachedSource, DatasetConfig, Error, FileSource,
};
use rust_xlsxwriter::Workbook;
use std::{fs, path::Path};
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,momentum_board=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Write `data.csv` and a config pointing at it; return the config path.
fn fixture(dir: &TempDir, preset: &str, csv: &str, header: &str) -> Result<std::path::PathBuf> {
    fs::write(dir.path().join("data.csv"), csv)?;
    let yaml = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("config").join(preset))?;
    let yaml = yaml
        .lines()
        .map(|l| {
            if l.starts_with("source:") {
                "source: data.csv".to_string()
            } else if l.starts_with("header:") {
                format!("header: {}", header)
            } else {
                l.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    let path = dir.path().join(preset);
    fs::write(&path, yaml)?;
    Ok(path)
}

fn render_markdown(config: &DatasetConfig) -> momentum_board::Result<String> {
    let mut surface = MarkdownSurface::new(Vec::new());
    render_dataset(config, &FileSource, &mut surface)?;
    Ok(String::from_utf8_lossy(&surface.into_inner()).into_owned())
}

#[test]
fn filter_dataset_renders_percentages() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(
        &dir,
        "filter.yaml",
        "Ticker,Country,Category,Mean,SD,2 Sigma\n\
         EWZ,Brazil,EM,9.3%,2.1%,\"4,2%\"\n\
         EWJ,Japan,DM,12,N/A,\n",
        "positional",
    )?;
    let config = DatasetConfig::load(&cfg)?;
    let out = render_markdown(&config)?;

    assert!(out.starts_with("# COUNTRY MOMENTUM FILTER\n\n#### Updated: 18/08/2025\n"));
    assert!(out.contains("| ETF     | COUNTRY | CATEGORY | CURRENT_MEAN | STD_DEV | 2_SIGMA |"));
    assert!(out.contains("| **EWZ** | Brazil  | EM       |         9.3% |    2.1% |   42.0% |"));
    // a bare number in a text-percentage column is scaled like its neighbours
    assert!(out.contains("| **EWJ** | Japan   | DM       |        12.0% |       - |       - |"));
    Ok(())
}

#[test]
fn strategy_dataset_renders_plain_columns() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(
        &dir,
        "strategy.yaml",
        "ETF,COUNTRY,CATEGORY,CURRENT_RETURNS,MEAN,STD_DEV,2_SIGMA,CURRENT_PRICE,200 DMA\n\
         EWZ,Brazil,EM,12.5%,9.3%,2.1%,4.2%,\"80,3\",27.456\n",
        "by_name",
    )?;
    let config = DatasetConfig::load(&cfg)?;
    let out = render_markdown(&config)?;

    // the decimal comma is treated as a thousands separator
    assert!(out.contains("803.0"));
    assert!(out.contains("27.5"));
    assert!(out.contains("12.5%"));
    Ok(())
}

#[test]
fn three_of_six_columns_renders_text_only() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(&dir, "filter.yaml", "a,b,c\nEWZ,Brazil,EM\n", "positional")?;
    let config = DatasetConfig::load(&cfg)?;
    let out = render_markdown(&config)?;

    assert!(out.contains("| ETF     | COUNTRY | CATEGORY |"));
    assert!(!out.contains("CURRENT_MEAN"));
    assert!(out.contains("| **EWZ** | Brazil  | EM       |"));
    Ok(())
}

#[test]
fn no_overlapping_columns_is_a_schema_mismatch() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(&dir, "filter.yaml", "FOO,BAR\n1,2\n", "by_name")?;
    let config = DatasetConfig::load(&cfg)?;

    let err = render_markdown(&config).unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(_)), "{err}");
    Ok(())
}

#[test]
fn filter_preset_renders_from_workbook() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("COUNTRY_MOMENTUM_FILTER.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("FILTER")?;
    for (col, label) in ["Ticker", "Country", "Category", "Mean", "SD", "2 Sigma", "Notes"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *label)?;
    }
    sheet.write_string(1, 0, "EWZ")?;
    sheet.write_string(1, 1, "Brazil")?;
    sheet.write_string(1, 2, "EM")?;
    sheet.write_number(1, 3, 0.093)?;
    sheet.write_string(1, 4, "2.1%")?;
    sheet.write_string(1, 5, "#N/A")?;
    sheet.write_string(1, 6, "ignored")?;
    workbook.save(&path)?;

    let mut config = DatasetConfig::from_yaml_str(include_str!("../config/filter.yaml"))?;
    config.source = path;
    let out = render_markdown(&config)?;

    assert!(out.contains("| ETF     | COUNTRY | CATEGORY | CURRENT_MEAN | STD_DEV | 2_SIGMA |"));
    assert!(out.contains("| **EWZ** | Brazil  | EM       |         9.3% |    2.1% |       - |"));
    assert!(!out.contains("ignored"));
    Ok(())
}

#[test]
fn missing_workbook_is_source_unavailable() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(&dir, "filter.yaml", "", "positional")?;
    let mut config = DatasetConfig::load(&cfg)?;
    config.source = dir.path().join("COUNTRY_MOMENTUM_FILTER.xlsx");

    let err = render_markdown(&config).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }), "{err}");
    Ok(())
}

#[test]
fn cached_source_serves_row_limited_html() -> Result<()> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let cfg = fixture(
        &dir,
        "filter.yaml",
        "ETF,COUNTRY,CATEGORY,CURRENT_MEAN,STD_DEV,2_SIGMA\n\
         EWZ,Brazil,EM,1%,1%,1%\n\
         EWJ,Japan,DM,2%,2%,2%\n",
        "positional",
    )?;
    let mut config = DatasetConfig::load(&cfg)?;
    let source = CachedSource::new(FileSource);

    let mut full = HtmlSurface::new(Vec::new());
    render_dataset(&config, &source, &mut full)?;
    let full = String::from_utf8(full.into_inner())?;
    assert!(full.contains(">EWJ</td>"));

    // the file is gone; the second render is served from the cache
    fs::remove_file(dir.path().join("data.csv"))?;
    config.max_rows = Some(1);
    let mut limited = HtmlSurface::new(Vec::new());
    render_dataset(&config, &source, &mut limited)?;
    let limited = String::from_utf8(limited.into_inner())?;
    assert!(limited.contains(">EWZ</td>"));
    assert!(!limited.contains(">EWJ</td>"));
    assert_eq!(source.len(), 1);
    Ok(())
}
