//! Presentation surfaces: sinks that turn a `FormattedTable` into a page.

pub mod html;
pub mod markdown;

pub use html::HtmlSurface;
pub use markdown::MarkdownSurface;

use crate::error::Result;
use crate::format::FormattedTable;

pub trait Surface {
    fn render(
        &mut self,
        table: &FormattedTable,
        title: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<()>;

    /// Close the page after the last table.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
