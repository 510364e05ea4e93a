//! Static category taxonomy
//!
//! The category-to-trigger-term table is embedded YAML, parsed once at
//! startup into a process-wide immutable table. Runtime mutation is not
//! supported.

use once_cell::sync::Lazy;
use serde::Deserialize;

use civicase_core::Category;

const TAXONOMY_YAML: &str = include_str!("../taxonomy.yaml");

/// A trigger term with its match weight.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub terms: Vec<TriggerTerm>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Taxonomy {
    pub version: String,
    pub categories: Vec<CategoryEntry>,
}

impl Taxonomy {
    fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn entry(&self, category: Category) -> Option<&CategoryEntry> {
        self.categories.iter().find(|e| e.category == category)
    }

    /// Trigger terms for a category, used as topical scope keywords by the
    /// policy retrieval query. Empty for `General`.
    pub fn topical_terms(&self, category: Category) -> Vec<String> {
        self.entry(category)
            .map(|e| e.terms.iter().map(|t| t.term.clone()).collect())
            .unwrap_or_default()
    }

    pub fn category_count(&self) -> usize {
        // General carries no trigger terms but is still a category.
        self.categories.len() + 1
    }
}

/// The process-wide taxonomy. The embedded table is validated by the
/// `taxonomy_parses` test, so failing to parse here is a build defect.
pub static TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    Taxonomy::from_yaml(TAXONOMY_YAML).expect("embedded taxonomy.yaml is malformed")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_parses() {
        let taxonomy = Taxonomy::from_yaml(TAXONOMY_YAML).unwrap();
        assert_eq!(taxonomy.version, "1.0");
        // Every non-General category has an entry with at least one term.
        for category in Category::ALL {
            if category == Category::General {
                continue;
            }
            let entry = taxonomy.entry(category).unwrap();
            assert!(!entry.terms.is_empty(), "{category} has no trigger terms");
        }
    }

    #[test]
    fn weights_are_positive() {
        for entry in &TAXONOMY.categories {
            for term in &entry.terms {
                assert!(term.weight > 0.0, "{} has weight {}", term.term, term.weight);
            }
        }
    }

    #[test]
    fn general_has_no_topical_terms() {
        assert!(TAXONOMY.topical_terms(Category::General).is_empty());
        assert!(!TAXONOMY.topical_terms(Category::ElderCare).is_empty());
    }
}
