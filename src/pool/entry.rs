use uuid::Uuid;

use crate::types::quote::{Quote, QuoteOrigin};

/// Default weight for entries without an explicit one.
pub const DEFAULT_BASE_WEIGHT: f64 = 1.0;

/// One item in the weighted pool.
#[derive(Debug, Clone)]
pub struct WeightedEntry {
    pub text: String,
    pub origin: QuoteOrigin,

    /// Immutable weight assigned at admission.
    base_weight: f64,

    /// Effective weight after the frequency multiplier.
    current_weight: f64,

    /// Backing record id for user-authored entries.
    pub source_id: Option<Uuid>,

    pub is_active: bool,
}

impl WeightedEntry {
    pub fn builtin(text: impl Into<String>) -> Self {
        Self::new(text, QuoteOrigin::Builtin, DEFAULT_BASE_WEIGHT, None)
    }

    pub fn user_authored(text: impl Into<String>, source_id: Uuid) -> Self {
        Self::new(
            text,
            QuoteOrigin::UserAuthored,
            DEFAULT_BASE_WEIGHT,
            Some(source_id),
        )
    }

    pub fn new(
        text: impl Into<String>,
        origin: QuoteOrigin,
        base_weight: f64,
        source_id: Option<Uuid>,
    ) -> Self {
        let base_weight = if base_weight.is_finite() && base_weight > 0.0 {
            base_weight
        } else {
            DEFAULT_BASE_WEIGHT
        };

        Self {
            text: text.into(),
            origin,
            base_weight,
            current_weight: base_weight,
            source_id,
            is_active: true,
        }
    }

    pub fn base_weight(&self) -> f64 {
        self.base_weight
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    /// Recomputes the effective weight from the immutable base.
    pub fn apply_multiplier(&mut self, multiplier: f64) {
        self.current_weight = self.base_weight * multiplier;
    }

    pub fn quote(&self) -> Quote {
        Quote {
            text: self.text.clone(),
            origin: self.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_scales_from_base_not_current() {
        let mut entry = WeightedEntry::user_authored("I am present", Uuid::new_v4());

        entry.apply_multiplier(3.0);
        entry.apply_multiplier(2.0);

        assert_eq!(entry.base_weight(), 1.0);
        assert_eq!(entry.current_weight(), 2.0);
    }

    #[test]
    fn quote_carries_the_entry_origin() {
        use crate::types::quote::Quote;

        let id = Uuid::new_v4();
        let entry = WeightedEntry::user_authored("I am present", id);

        assert_eq!(entry.quote(), Quote::user_authored("I am present"));
        assert_eq!(
            WeightedEntry::builtin("steady").quote(),
            Quote::builtin("steady")
        );
    }

    #[test]
    fn invalid_base_weight_falls_back_to_default() {
        let entry = WeightedEntry::new("steady", QuoteOrigin::Builtin, f64::NAN, None);
        assert_eq!(entry.base_weight(), DEFAULT_BASE_WEIGHT);

        let entry = WeightedEntry::new("steady", QuoteOrigin::Builtin, -2.0, None);
        assert_eq!(entry.base_weight(), DEFAULT_BASE_WEIGHT);
    }
}
