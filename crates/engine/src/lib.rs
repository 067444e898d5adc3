//! Family finance engine.
//!
//! The engine owns every business rule of the service: the user directory,
//! the per-user ledger (wallets, categories, transactions, budgets), the bank
//! simulator and the family sharing workflow. Each public operation runs in
//! its own database transaction and is scoped by the acting user's id.

pub use bank_accounts::BankAccount;
pub use bank_transactions::BankTransaction;
pub use budgets::{Budget, BudgetPeriod, BudgetScope};
pub use categories::Category;
pub use error::{EngineError, GatewayError};
pub use family_links::{DEFAULT_GROUP_NAME, FamilyLink, LinkDecision, LinkStatus};
pub use mailer::{DisabledMailer, Mailer, OutgoingMail};
pub use notifier::{DisabledNotifier, Notifier, PushMessage};
pub use ops::{
    BalanceSummary, BankAccountNew, BankTransactionNew, BudgetInput, CategoryInput, Engine,
    EngineBuilder, FamilyInvite, FamilyMember, Invitation, JoinedFamily, NewUser, Totals,
    TransactionInput, WalletInput,
};
pub use password::{BcryptHasher, PasswordHasher};
pub use transactions::{Transaction, TransactionKind};
pub use users::{User, display_name};
pub use wallets::Wallet;

mod bank_accounts;
mod bank_transactions;
mod budgets;
mod categories;
mod error;
mod family_links;
mod mailer;
mod notifier;
mod ops;
mod password;
mod transactions;
mod users;
mod util;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
