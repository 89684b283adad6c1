use crate::types::quote::Quote;

/// Where the rotation gets fresh quotes from.
pub trait QuoteSource {
    /// Produces the next quote, steering away from `avoid` when more than
    /// one distinct text is available. `None` only for an empty source.
    fn draw(&mut self, avoid: Option<&str>) -> Option<Quote>;

    /// Number of distinct selectable texts.
    fn distinct_count(&self) -> usize;
}
