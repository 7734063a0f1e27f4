pub mod calendar;
pub mod config;
pub mod error;
pub mod labels;
pub mod output;
pub mod render;

use calendar::MonthSpec;
use config::Config;
use error::Result;
use labels::LabelProvider;
use output::Destination;
use render::HtmlRenderer;

/// Renders the configured month as a complete HTML document.
pub fn render_month(config: &Config) -> Result<String> {
    let spec: MonthSpec = config.month_spec()?;
    let provider = LabelProvider::new(&config.locale, &config.timezone)?;

    let grid = calendar::build_grid(&spec);
    let labels = provider.labels(&spec)?;

    Ok(HtmlRenderer::default()
        .stylesheet(&config.stylesheet)
        .render_document(&spec, &grid, &labels))
}

/// Renders the configured month and writes it to the configured output.
/// Nothing is written if rendering fails.
pub fn run(config: &Config) -> Result<()> {
    let document = render_month(config)?;

    Destination::from(config.output.as_path()).write(&document)
}
