use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{
    DisabledMailer, DisabledNotifier, Mailer, Notifier, PasswordHasher, ResultEngine,
    password::BcryptHasher,
};

mod access;
mod balances;
mod bank;
mod budgets;
mod categories;
mod family;
mod transactions;
mod users;
mod wallets;

pub use balances::{BalanceSummary, Totals};
pub use bank::{BankAccountNew, BankTransactionNew};
pub use budgets::BudgetInput;
pub use categories::CategoryInput;
pub use family::{FamilyInvite, FamilyMember, Invitation, JoinedFamily};
pub use transactions::TransactionInput;
pub use users::NewUser;
pub use wallets::WalletInput;

/// Run a block inside a DB transaction, committing on success.
///
/// An early return (`?`) drops the uncommitted transaction, which rolls it
/// back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
    hasher: Arc<dyn PasswordHasher>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    notifier: Option<Arc<dyn Notifier>>,
    mailer: Option<Arc<dyn Mailer>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Push gateway. Defaults to [`DisabledNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> EngineBuilder {
        self.notifier = Some(notifier);
        self
    }

    /// Mail gateway. Defaults to [`DisabledMailer`].
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> EngineBuilder {
        self.mailer = Some(mailer);
        self
    }

    /// Password hasher. Defaults to bcrypt with the default cost.
    pub fn hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> EngineBuilder {
        self.hasher = Some(hasher);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(DisabledNotifier)),
            mailer: self.mailer.unwrap_or_else(|| Arc::new(DisabledMailer)),
            hasher: self
                .hasher
                .unwrap_or_else(|| Arc::new(BcryptHasher::default())),
        })
    }
}
