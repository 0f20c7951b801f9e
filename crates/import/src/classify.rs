use serde::Serialize;
use spendlens_core::{KeywordCatalog, OTHER_CATEGORY};

use crate::util::partial_ratio;

/// A keyword must score strictly above this to qualify.
pub const MATCH_THRESHOLD: f64 = 70.0;

/// The winning category for a description and the keyword that earned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatch<'a> {
    pub category: &'a str,
    pub keyword: &'a str,
    pub score: f64,
}

/// Assigns descriptions to catalog categories by fuzzy keyword matching.
///
/// Every keyword of every category other than [`OTHER_CATEGORY`] is scored
/// against the case-folded description. The highest qualifying score wins and
/// ties go to the category listed first.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: KeywordCatalog,
    threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(KeywordCatalog::default())
    }
}

impl Classifier {
    pub fn new(catalog: KeywordCatalog) -> Self {
        Self {
            catalog,
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn best_match(&self, description: &str) -> Option<CategoryMatch<'_>> {
        let text = description.trim().to_lowercase();
        let mut best: Option<CategoryMatch<'_>> = None;

        for category in self.catalog.categories() {
            if category.name == OTHER_CATEGORY {
                continue;
            }
            for keyword in &category.keywords {
                let score = partial_ratio(keyword, &text);
                if score <= self.threshold {
                    continue;
                }
                // Strictly greater: earlier categories keep ties.
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(CategoryMatch {
                        category: &category.name,
                        keyword,
                        score,
                    });
                }
            }
        }
        best
    }

    pub fn categorize(&self, description: &str) -> &str {
        self.best_match(description)
            .map(|m| m.category)
            .unwrap_or(OTHER_CATEGORY)
    }
}

/// Categorizes with the default catalog.
pub fn categorize(description: &str) -> String {
    Classifier::default().categorize(description).to_string()
}
