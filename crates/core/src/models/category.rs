//! Spending categories.

use chrono::{DateTime, Utc};
use clarity_shared::types::{CategoryId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_positive, require_text};

/// Icon shown for categories without one.
pub const FALLBACK_ICON: &str = "📦";

/// Color used for categories without one.
pub const FALLBACK_COLOR: &str = "#6B7280";

/// A spending category.
///
/// Default categories are seeded per identity; protecting them from deletion
/// is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning identity.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Emoji glyph.
    #[serde(default = "fallback_icon")]
    pub icon: String,
    /// Hex color.
    #[serde(default = "fallback_color")]
    pub color: String,
    /// Monthly spending limit.
    #[serde(default)]
    pub budget_limit: Option<Decimal>,
    /// Whether this category was seeded.
    #[serde(default)]
    pub is_default: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn fallback_icon() -> String {
    FALLBACK_ICON.to_string()
}

fn fallback_color() -> String {
    FALLBACK_COLOR.to_string()
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Emoji glyph.
    pub icon: String,
    /// Hex color.
    pub color: String,
    /// Monthly spending limit.
    pub budget_limit: Option<Decimal>,
    /// Whether this category was seeded.
    pub is_default: bool,
}

impl NewCategory {
    /// Creates a user-defined category with the fallback icon and color.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: fallback_icon(),
            color: fallback_color(),
            budget_limit: None,
            is_default: false,
        }
    }

    /// Validates the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the limit is not positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if let Some(limit) = self.budget_limit {
            require_positive("budget_limit", limit)?;
        }
        Ok(())
    }
}

/// Sparse update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// New color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New limit; `Some(None)` removes it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub budget_limit: Option<Option<Decimal>>,
}

impl CategoryPatch {
    /// Validates the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns an error if a present name is empty or a present limit is not positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(Some(limit)) = self.budget_limit {
            require_positive("budget_limit", limit)?;
        }
        Ok(())
    }
}
