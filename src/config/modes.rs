//! Catalog scope definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog resources a run walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogScope {
    /// Products and categories (default).
    #[default]
    All,
    /// Only products (categories skipped).
    Products,
    /// Only categories (products skipped).
    Categories,
    /// Both skipped. Rejected by validation.
    Nothing,
}

impl CatalogScope {
    /// Build a scope from the two skip flags.
    pub fn from_skip_flags(skip_products: bool, skip_categories: bool) -> Self {
        match (skip_products, skip_categories) {
            (false, false) => CatalogScope::All,
            (false, true) => CatalogScope::Products,
            (true, false) => CatalogScope::Categories,
            (true, true) => CatalogScope::Nothing,
        }
    }

    pub fn includes_products(&self) -> bool {
        matches!(self, CatalogScope::All | CatalogScope::Products)
    }

    pub fn includes_categories(&self) -> bool {
        matches!(self, CatalogScope::All | CatalogScope::Categories)
    }
}

impl fmt::Display for CatalogScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogScope::All => write!(f, "products and categories"),
            CatalogScope::Products => write!(f, "products"),
            CatalogScope::Categories => write!(f, "categories"),
            CatalogScope::Nothing => write!(f, "nothing"),
        }
    }
}
