//! Store categories and their mapping to map-provider place types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown store category: {0}")]
pub struct CategoryError(pub String);

/// Store category.
///
/// `General` is assigned to live results fetched without a category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Grocery,
    Pharmacy,
    Electronics,
    Clothing,
    Bakery,
    Restaurant,
    General,
}

impl Category {
    /// Categories a user can filter by.
    pub const SEARCHABLE: [Self; 6] = [
        Self::Grocery,
        Self::Pharmacy,
        Self::Electronics,
        Self::Clothing,
        Self::Bakery,
        Self::Restaurant,
    ];

    /// Lowercase name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grocery => "grocery",
            Self::Pharmacy => "pharmacy",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Bakery => "bakery",
            Self::Restaurant => "restaurant",
            Self::General => "general",
        }
    }

    /// Places API type for a nearby search, or `None` for a broad search.
    #[must_use]
    pub const fn place_type(&self) -> Option<&'static str> {
        match self {
            Self::Grocery => Some("grocery_or_supermarket"),
            Self::Pharmacy => Some("pharmacy"),
            Self::Electronics => Some("electronics_store"),
            Self::Clothing => Some("clothing_store"),
            Self::Bakery => Some("bakery"),
            Self::Restaurant => Some("restaurant"),
            Self::General => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grocery" => Ok(Self::Grocery),
            "pharmacy" => Ok(Self::Pharmacy),
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "bakery" => Ok(Self::Bakery),
            "restaurant" => Ok(Self::Restaurant),
            "general" => Ok(Self::General),
            _ => Err(CategoryError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("Grocery".parse::<Category>(), Ok(Category::Grocery));
        assert_eq!(" PHARMACY ".parse::<Category>(), Ok(Category::Pharmacy));
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        let err = "hardware".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown store category: hardware");
    }

    #[test]
    fn test_place_type_mapping() {
        assert_eq!(Category::Grocery.place_type(), Some("grocery_or_supermarket"));
        assert_eq!(Category::Electronics.place_type(), Some("electronics_store"));
        assert_eq!(Category::General.place_type(), None);
    }

    #[test]
    fn test_searchable_excludes_general() {
        assert!(!Category::SEARCHABLE.contains(&Category::General));
    }
}
