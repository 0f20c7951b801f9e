use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Category assigned when no keyword qualifies.
pub const OTHER_CATEGORY: &str = "Other";

/// Category holding inflows such as salary; excluded from spending breakdowns.
pub const INCOME_CATEGORY: &str = "Income";

/// Default catalog, in evaluation order. Earlier categories win ties.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Food & Dining",
        &[
            "restaurant",
            "shawarma",
            "kfc",
            "mcdonald",
            "eat",
            "shoprite",
            "ubereats",
            "food",
            "cafe",
            "pizza",
            "chicken",
            "burger",
        ],
    ),
    (
        "Transport",
        &["uber", "bolt", "taxi", "fuel", "gas", "bus", "transport", "fare"],
    ),
    (
        "Utilities",
        &[
            "electricity",
            "water",
            "internet",
            "dstv",
            "mtn",
            "data",
            "airtime",
            "nepa",
            "phcn",
            "ikedc",
            "ekedc",
        ],
    ),
    (
        "Shopping",
        &["amazon", "jumia", "mall", "shop", "konga", "store", "market"],
    ),
    (
        INCOME_CATEGORY,
        &[
            "salary",
            "payroll",
            "interest earned",
            "bonus",
            "credit",
            "deposit",
            "transfer in",
            "earned",
        ],
    ),
    (
        "Savings",
        &[
            "owealth",
            "auto-save",
            "auto save",
            "withdrawal(transaction payment)",
            "save",
            "investment",
            "balance",
        ],
    ),
    (
        "Entertainment",
        &["netflix", "dstv", "cinema", "movie", "game", "spotify"],
    ),
    (
        "Healthcare",
        &["hospital", "pharmacy", "doctor", "clinic", "medical", "health"],
    ),
    (OTHER_CATEGORY, &[]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryKeywords {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        CategoryKeywords {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Category name must not be empty")]
    EmptyName,
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),
}

/// Ordered mapping from category name to its representative keywords.
///
/// Keywords are stored case-folded and trimmed. The catalog always contains
/// [`OTHER_CATEGORY`], so the fallback category is a member of every catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCatalog {
    categories: Vec<CategoryKeywords>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    category: Vec<CategoryKeywords>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, keywords)| CategoryKeywords::new(name, keywords))
            .collect();
        KeywordCatalog { categories }
    }
}

impl KeywordCatalog {
    pub fn new(categories: Vec<CategoryKeywords>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(categories.len() + 1);

        for category in categories {
            let name = category.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(name.clone()) {
                return Err(CatalogError::DuplicateCategory(name));
            }
            let keywords = category
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            normalized.push(CategoryKeywords { name, keywords });
        }

        if !seen.contains(OTHER_CATEGORY) {
            normalized.push(CategoryKeywords::new(OTHER_CATEGORY, &[]));
        }

        Ok(KeywordCatalog {
            categories: normalized,
        })
    }

    /// Parses `[[category]]` tables with `name` and `keywords`.
    pub fn from_toml(toml_content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(toml_content)?;
        Self::new(file.category)
    }

    pub fn categories(&self) -> &[CategoryKeywords] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
