mod account;
mod budget;
mod card;
mod category;
mod purchase;
mod recurrence;
mod rule;
mod transaction;
mod vendor;

pub use account::{Account, AccountType};
pub use budget::Budget;
pub use card::{Card, CardInvoice, InvoiceStatus};
pub use category::{Category, CategoryType};
pub use purchase::{Purchase, PurchaseItem, PurchaseStatus};
pub use recurrence::{Frequency, Recurrence};
pub use rule::{Rule, DEFAULT_PRIORITY, MIN_PATTERN_LEN, PRIORITY_RANGE};
pub use transaction::{PaymentMethod, Transaction, TxType};
pub use vendor::Vendor;

#[cfg(test)]
mod tests;
