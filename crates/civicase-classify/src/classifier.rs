//! Keyword-weighted problem classification
//!
//! Pure function over the input text and the static taxonomy: identical
//! input always yields the identical category. CJK terms match as
//! substrings, ASCII terms match on token boundaries, both
//! case-insensitively. Ties break by the fixed category priority order.

use civicase_core::{Category, Problem, SolveError};

use crate::taxonomy::{CategoryEntry, TAXONOMY};

/// Minimum winning score; below this the problem is filed as `General`.
pub const MIN_CATEGORY_SCORE: f64 = 1.0;

/// Classify a problem by its description.
pub fn classify(problem: &Problem) -> Result<Category, SolveError> {
    problem.validate()?;
    Ok(classify_text(&problem.description))
}

/// Classify free text that is already known to be non-empty.
pub fn classify_text(description: &str) -> Category {
    let text = description.to_lowercase();

    let mut best: Option<(Category, f64)> = None;
    for entry in &TAXONOMY.categories {
        let score = score_entry(&text, entry);
        // Strictly-greater keeps the earliest (highest-priority) category
        // on ties; TAXONOMY.categories is in priority order.
        if score > best.map(|(_, s)| s).unwrap_or(0.0) {
            best = Some((entry.category, score));
        }
    }

    match best {
        Some((category, score)) if score >= MIN_CATEGORY_SCORE => {
            tracing::debug!(%category, score, "classified problem");
            category
        }
        _ => {
            tracing::debug!("no category cleared threshold, falling back to general");
            Category::General
        }
    }
}

fn score_entry(text: &str, entry: &CategoryEntry) -> f64 {
    entry
        .terms
        .iter()
        .map(|t| t.weight * count_occurrences(text, &t.term.to_lowercase()) as f64)
        .sum()
}

/// Count occurrences of `term` in `text` (both lowercased). ASCII terms
/// must sit on token boundaries so "app" does not fire inside "apply".
fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }

    let bounded = term.is_ascii();
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = text[from..].find(term) {
        let start = from + pos;
        let end = start + term.len();
        if !bounded || (boundary_before(text, start) && boundary_after(text, end)) {
            count += 1;
        }
        from = end;
    }
    count
}

fn boundary_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_ascii_alphanumeric())
}

fn boundary_after(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_divide_scenario() {
        assert_eq!(
            classify_text("社区老年人数字鸿沟问题"),
            Category::DigitalDivide
        );
    }

    #[test]
    fn elder_care_without_digital_terms() {
        assert_eq!(classify_text("小区敬老活动和养老设施不足"), Category::ElderCare);
    }

    #[test]
    fn english_descriptions_classify() {
        assert_eq!(
            classify_text("Residents report a parking shortage near the market"),
            Category::ParkingManagement
        );
        assert_eq!(
            classify_text("Garbage collection points overflow every weekend"),
            Category::EnvironmentGovernance
        );
    }

    #[test]
    fn unmatched_text_falls_back_to_general() {
        assert_eq!(classify_text("完全无关的文本内容"), Category::General);
    }

    #[test]
    fn weak_single_term_is_not_enough() {
        // "服务" alone carries weight 0.6, below the 1.0 threshold.
        assert_eq!(classify_text("提升服务"), Category::General);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "小区垃圾分类和邻里纠纷并存";
        let first = classify_text(text);
        for _ in 0..10 {
            assert_eq!(classify_text(text), first);
        }
    }

    #[test]
    fn ascii_terms_respect_token_boundaries() {
        // "app" must not fire inside "apply".
        assert_eq!(classify_text("residents apply for permits"), Category::General);
        assert_eq!(
            classify_text("the health app and smartphone steps confuse residents"),
            Category::DigitalDivide
        );
    }

    #[test]
    fn empty_description_is_invalid() {
        let problem = Problem::new("", "某社区");
        assert!(matches!(
            classify(&problem),
            Err(SolveError::InvalidProblem(_))
        ));
    }
}
