//! Monetary records: expenses and incomes.
//!
//! Both kinds share one shape and live in two tables with identical columns
//! (`expenses` and `incomes`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, expenses, incomes, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Expense,
    Income,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Table holding records of this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Expense => "expenses",
            Self::Income => "incomes",
        }
    }
}

impl TryFrom<&str> for RecordKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::InvalidField(format!(
                "invalid record kind: {other}"
            ))),
        }
    }
}

/// Fixed category set. Expenses and incomes each accept a subset; `Other`
/// belongs to both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Education,
    Utilities,
    Salary,
    Bonus,
    Business,
    Investment,
    Other,
}

impl Category {
    pub const EXPENSE: [Category; 6] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Education,
        Self::Utilities,
        Self::Other,
    ];

    pub const INCOME: [Category; 5] = [
        Self::Salary,
        Self::Bonus,
        Self::Business,
        Self::Investment,
        Self::Other,
    ];

    /// Canonical code stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Utilities => "utilities",
            Self::Salary => "salary",
            Self::Bonus => "bonus",
            Self::Business => "business",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Ăn uống",
            Self::Transport => "Di chuyển",
            Self::Shopping => "Mua sắm",
            Self::Education => "Giáo dục",
            Self::Utilities => "Tiện ích",
            Self::Salary => "Lương",
            Self::Bonus => "Thưởng",
            Self::Business => "Kinh doanh",
            Self::Investment => "Đầu tư",
            Self::Other => "Khác",
        }
    }

    pub fn allowed_for(self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Expense => Self::EXPENSE.contains(&self),
            RecordKind::Income => Self::INCOME.contains(&self),
        }
    }

    fn all() -> impl Iterator<Item = Category> {
        Self::EXPENSE.into_iter().chain(Self::INCOME)
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    /// Accepts the code or the display label.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Self::all()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed) || c.label() == trimmed)
            .ok_or_else(|| EngineError::InvalidCategory(format!("unknown category: {trimmed}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryRecord {
    pub id: Uuid,
    pub kind: RecordKind,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating a record; the store assigns `id`
/// and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: Category,
}

impl NewRecord {
    /// Checks the record invariants for `kind` and trims the description.
    pub fn validate(self, kind: RecordKind) -> ResultEngine<Self> {
        Ok(Self {
            date: self.date,
            description: normalize_description(&self.description)?,
            amount: validate_amount(self.amount)?,
            category: validate_category(self.category, kind)?,
        })
    }
}

/// Partial update. `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<Category>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
    }

    pub fn validate(self, kind: RecordKind) -> ResultEngine<Self> {
        Ok(Self {
            date: self.date,
            description: self
                .description
                .as_deref()
                .map(normalize_description)
                .transpose()?,
            amount: self.amount.map(validate_amount).transpose()?,
            category: self
                .category
                .map(|category| validate_category(category, kind))
                .transpose()?,
        })
    }
}

fn normalize_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(
            "description must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_amount(amount: Money) -> ResultEngine<Money> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be >= 0, got {amount}"
        )));
    }
    if amount > Money::MAX {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be <= {}, got {amount}",
            Money::MAX
        )));
    }
    Ok(amount)
}

fn validate_category(category: Category, kind: RecordKind) -> ResultEngine<Category> {
    if !category.allowed_for(kind) {
        return Err(EngineError::InvalidCategory(format!(
            "{} is not an {} category",
            category.as_str(),
            kind.as_str()
        )));
    }
    Ok(category)
}

fn record_from_row(
    kind: RecordKind,
    id: &str,
    date: NaiveDate,
    description: String,
    amount: i64,
    category: &str,
    created_at: DateTime<Utc>,
) -> ResultEngine<MonetaryRecord> {
    Ok(MonetaryRecord {
        id: parse_uuid(id, kind.as_str())?,
        kind,
        date,
        description,
        category: Category::try_from(category)?,
        amount: Money::new(amount),
        created_at,
    })
}

impl TryFrom<expenses::Model> for MonetaryRecord {
    type Error = EngineError;

    fn try_from(model: expenses::Model) -> Result<Self, Self::Error> {
        record_from_row(
            RecordKind::Expense,
            &model.id,
            model.date,
            model.description,
            model.amount,
            &model.category,
            model.created_at,
        )
    }
}

impl TryFrom<incomes::Model> for MonetaryRecord {
    type Error = EngineError;

    fn try_from(model: incomes::Model) -> Result<Self, Self::Error> {
        record_from_row(
            RecordKind::Income,
            &model.id,
            model.date,
            model.description,
            model.amount,
            &model.category,
            model.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(category: Category, amount: i64, description: &str) -> NewRecord {
        NewRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            description: description.to_string(),
            amount: Money::new(amount),
            category,
        }
    }

    #[test]
    fn category_sets_are_distinct_per_kind() {
        assert!(Category::Food.allowed_for(RecordKind::Expense));
        assert!(!Category::Food.allowed_for(RecordKind::Income));
        assert!(Category::Salary.allowed_for(RecordKind::Income));
        assert!(!Category::Salary.allowed_for(RecordKind::Expense));
        assert!(Category::Other.allowed_for(RecordKind::Expense));
        assert!(Category::Other.allowed_for(RecordKind::Income));
    }

    #[test]
    fn category_parses_code_or_label() {
        assert_eq!(Category::try_from("food").unwrap(), Category::Food);
        assert_eq!(Category::try_from("Ăn uống").unwrap(), Category::Food);
        assert_eq!(Category::try_from("Lương").unwrap(), Category::Salary);
        assert!(Category::try_from("groceries").is_err());
    }

    #[test]
    fn validate_trims_description() {
        let record = new_record(Category::Food, 30_000, "  phở bò ")
            .validate(RecordKind::Expense)
            .unwrap();
        assert_eq!(record.description, "phở bò");
    }

    #[test]
    fn validate_rejects_broken_invariants() {
        assert!(matches!(
            new_record(Category::Food, -1, "x").validate(RecordKind::Expense),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            new_record(Category::Food, 1, "   ").validate(RecordKind::Expense),
            Err(EngineError::InvalidField(_))
        ));
        assert!(matches!(
            new_record(Category::Food, 1, "x").validate(RecordKind::Income),
            Err(EngineError::InvalidCategory(_))
        ));
    }

    #[test]
    fn amounts_above_the_limit_are_rejected() {
        let at_limit = new_record(Category::Food, Money::MAX.amount(), "x");
        assert!(at_limit.validate(RecordKind::Expense).is_ok());

        let above = new_record(Category::Food, Money::MAX.amount() + 1, "x");
        assert!(matches!(
            above.validate(RecordKind::Expense),
            Err(EngineError::InvalidAmount(_))
        ));

        let patch = RecordPatch {
            amount: Some(Money::new(i64::MAX)),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(RecordKind::Expense),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn zero_amount_is_allowed() {
        assert!(
            new_record(Category::Other, 0, "free sample")
                .validate(RecordKind::Expense)
                .is_ok()
        );
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = RecordPatch {
            amount: Some(Money::new(5)),
            ..Default::default()
        };
        assert!(patch.validate(RecordKind::Income).is_ok());

        let patch = RecordPatch {
            category: Some(Category::Transport),
            ..Default::default()
        };
        assert!(patch.validate(RecordKind::Income).is_err());
    }
}
