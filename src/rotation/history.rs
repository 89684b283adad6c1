use tracing::debug;

use crate::rotation::quote_source::QuoteSource;
use crate::types::quote::Quote;

/// Shown when there is nothing else to show. Every public operation
/// degrades to this rather than erroring.
pub const FALLBACK_TEXT: &str = "You are enough.";

pub fn fallback_quote() -> Quote {
    Quote::builtin(FALLBACK_TEXT)
}

/// Append-only navigation log over the quote stream, with a cursor and a
/// one-slot look-ahead cache.
#[derive(Debug)]
pub struct RotationHistory {
    log: Vec<Quote>,
    cursor: usize,
    cached_next: Option<Quote>,
}

impl RotationHistory {
    pub fn new(initial: Quote) -> Self {
        Self {
            log: vec![initial],
            cursor: 0,
            cached_next: None,
        }
    }

    /// The quote under the cursor.
    pub fn current(&self) -> Quote {
        self.log
            .get(self.cursor)
            .cloned()
            .unwrap_or_else(fallback_quote)
    }

    /// Peeks one step around the cursor without moving it.
    ///
    /// Offsets other than -1, 0 and +1 fall back to the current quote.
    pub fn preview(&mut self, offset: i32, source: &mut dyn QuoteSource) -> Quote {
        match offset {
            0 => self.current(),
            -1 => {
                if self.cursor > 0 {
                    self.log[self.cursor - 1].clone()
                } else {
                    self.current()
                }
            }
            1 => {
                if let Some(next) = self.log.get(self.cursor + 1) {
                    return next.clone();
                }
                if let Some(cached) = &self.cached_next {
                    return cached.clone();
                }

                let generated = self.generate(source);
                self.cached_next = Some(generated.clone());
                generated
            }
            _ => self.current(),
        }
    }

    /// Advances the cursor, reusing forward history or the cached
    /// look-ahead before generating anything new.
    pub fn move_next(&mut self, source: &mut dyn QuoteSource) -> Quote {
        if self.cursor + 1 < self.log.len() {
            self.cursor += 1;
            self.cached_next = None;
            return self.current();
        }

        let next = self
            .cached_next
            .take()
            .unwrap_or_else(|| self.generate(source));
        debug!(quote = %next, "appending to rotation log");

        self.log.push(next);
        self.cursor = self.log.len() - 1;
        self.cached_next = None;

        self.current()
    }

    /// Steps back one entry. `None` means the cursor was already at the
    /// start and nothing moved.
    pub fn move_previous(&mut self) -> Option<Quote> {
        if self.cursor == 0 {
            return None;
        }

        self.cursor -= 1;
        self.cached_next = None;

        Some(self.current())
    }

    /// A generated quote differs from the current one whenever the source
    /// has alternatives; an empty source yields the fallback.
    fn generate(&self, source: &mut dyn QuoteSource) -> Quote {
        let current = self.log.get(self.cursor);
        let avoid = current
            .filter(|_| source.distinct_count() > 1)
            .map(|quote| quote.text.as_str());

        source.draw(avoid).unwrap_or_else(fallback_quote)
    }
}
