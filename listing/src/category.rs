//! Mapping from product category names to marketplace category ids.

#[cfg(test)]
#[path = "category_test.rs"]
mod category_test;

/// Known category name → marketplace category id pairs, matched in order.
const CATEGORY_IDS: &[(&str, &str)] = &[
    ("Funko Pop", "149372"),
    ("Action Figures", "246"),
    ("Collectibles", "1"),
    ("Electronics", "293"),
    ("Clothing", "11450"),
    ("Toys", "220"),
    ("Books", "267"),
];

/// Id used when nothing matches: general Collectibles.
pub const DEFAULT_CATEGORY_ID: &str = "1";

/// Resolve a category name to a marketplace category id.
///
/// Tries an exact match, then a case-insensitive match, then a substring
/// match in either direction. A name that matches nothing falls back to
/// [`DEFAULT_CATEGORY_ID`]; a blank name has no id and yields `""`.
#[must_use]
pub fn marketplace_category_id(category: &str) -> &'static str {
    let category = category.trim();
    if category.is_empty() {
        return "";
    }

    if let Some((_, id)) = CATEGORY_IDS.iter().find(|(name, _)| *name == category) {
        return id;
    }

    let lower = category.to_lowercase();
    if let Some((_, id)) = CATEGORY_IDS.iter().find(|(name, _)| name.to_lowercase() == lower) {
        return id;
    }

    let partial = CATEGORY_IDS.iter().find(|(name, _)| {
        let name = name.to_lowercase();
        lower.contains(&name) || name.contains(&lower)
    });
    if let Some((_, id)) = partial {
        return id;
    }

    tracing::warn!(category, "no marketplace category mapping; defaulting to Collectibles");
    DEFAULT_CATEGORY_ID
}
