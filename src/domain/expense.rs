use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, as_units};

pub type ExpenseId = Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ExpenseCategory {
    #[default]
    Food,
    Transport,
    Entertainment,
    Shopping,
    /// User-specified category name
    Other(String),
}

impl ExpenseCategory {
    /// The predefined categories, in display order.
    pub const PRESETS: [ExpenseCategory; 4] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Other(name) => name,
        }
    }

    /// Preset names match case-insensitively; any other non-empty name becomes
    /// a custom category. Returns None for blank input.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let category = match s.to_lowercase().as_str() {
            "food" => ExpenseCategory::Food,
            "transport" => ExpenseCategory::Transport,
            "entertainment" => ExpenseCategory::Entertainment,
            "shopping" => ExpenseCategory::Shopping,
            _ => ExpenseCategory::Other(s.to_string()),
        };
        Some(category)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ExpenseCategory::Other(_))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ExpenseCategory> for String {
    fn from(category: ExpenseCategory) -> Self {
        match category {
            ExpenseCategory::Other(name) => name,
            preset => preset.as_str().to_string(),
        }
    }
}

impl From<String> for ExpenseCategory {
    fn from(s: String) -> Self {
        // Stored names are never blank, but keep the raw value if one is
        ExpenseCategory::from_str(&s).unwrap_or(ExpenseCategory::Other(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(with = "as_units")]
    pub amount: Cents,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn new(amount: Cents, category: ExpenseCategory, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            date,
        }
    }
}
