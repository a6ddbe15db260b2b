//! Book search criteria

use serde::{Deserialize, Serialize};

/// Book search filter set
///
/// Only one dimension is applied per search, in this order of precedence:
/// titles, then authors, then genres, then price range. Dimensions are
/// never combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Exact titles
    #[serde(default)]
    pub titles: Vec<String>,
    /// Author first or last names
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchCriteria {
    /// True when a price bound was given
    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// True when no filter dimension is present
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
            && self.authors.is_empty()
            && self.genres.is_empty()
            && !self.has_price_range()
    }

    /// Inclusive price bounds, open ends filled with `0` and `+inf`
    pub fn price_bounds(&self) -> (f64, f64) {
        (
            self.min_price.unwrap_or(0.0),
            self.max_price.unwrap_or(f64::INFINITY),
        )
    }
}
