use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{is_uninformed_label, Sphere};

/// One bank-statement entry. Fields that failed to coerce on load are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub sphere: Sphere,
    pub category: String,
    pub party: String,
    pub counterparty: Option<String>,
    pub amount: Option<Decimal>,
}

impl Transaction {
    /// Amount as it contributes to a sum: a missing amount adds nothing.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub fn is_uninformed(&self) -> bool {
        self.sphere.is_uninformed()
            || is_uninformed_label(&self.category)
            || is_uninformed_label(&self.party)
    }

    pub fn is_in_category(&self, category: &str) -> bool {
        self.category == category
    }
}
