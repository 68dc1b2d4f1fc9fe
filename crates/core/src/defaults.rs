//! Categories seeded for every new identity.

use crate::models::NewCategory;

/// Name, icon, and color of each default category.
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food & Drinks", "🍽️", "#EF4444"),
    ("Transport", "🚗", "#3B82F6"),
    ("Shopping", "🛍️", "#F59E0B"),
    ("Entertainment", "🎬", "#8B5CF6"),
    ("Utilities", "💡", "#10B981"),
    ("Health", "🏥", "#EC4899"),
    ("Education", "📚", "#6366F1"),
    ("Home & Garden", "🏠", "#059669"),
    ("Clothing", "👕", "#DC2626"),
    ("Technology", "📱", "#7C3AED"),
];

/// Create inputs for the default category set.
#[must_use]
pub fn default_categories() -> Vec<NewCategory> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|&(name, icon, color)| NewCategory {
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            budget_limit: None,
            is_default: true,
        })
        .collect()
}
