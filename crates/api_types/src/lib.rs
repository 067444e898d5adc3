//! JSON request and response bodies of the HTTP API.
//!
//! Amounts travel as integer minor units (`*_minor`); ids as UUID strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income or expense; the sign of a movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub email: String,
        pub password: String,
        pub full_name: Option<String>,
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Token {
        pub access_token: String,
        pub token_type: String,
        /// Seconds until the token expires.
        pub expires_in: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotPassword {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PushToken {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChangePassword {
        pub old_password: String,
        pub new_password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub full_name: Option<String>,
        pub name: Option<String>,
        pub display_name: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletUpsert {
        pub name: Option<String>,
        #[serde(default)]
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: Option<String>,
        pub balance_minor: i64,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Balance {
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub wallet_balance_minor: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpsert {
        pub name: String,
        pub icon: String,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub icon: String,
        pub color: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpsert {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub category_id: Option<Uuid>,
        /// Defaults to now on create; kept as is on update when omitted.
        pub date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub category_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub date: DateTime<Utc>,
        pub updated_at: Option<DateTime<Utc>>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Period {
        Day,
        Month,
        Year,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Scope {
        Overall,
        Category,
    }

    fn default_active() -> bool {
        true
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        pub amount_minor: i64,
        pub period: Period,
        pub scope: Scope,
        pub category_id: Option<Uuid>,
        #[serde(default = "default_active")]
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub period: Period,
        pub scope: Scope,
        pub category_id: Option<Uuid>,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod bank {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountNew {
        pub bank_name: String,
        pub account_number: String,
        #[serde(default)]
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountView {
        pub id: Uuid,
        pub bank_name: String,
        pub account_number: String,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SimulateTx {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankTransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub date: DateTime<Utc>,
        pub balance_after_minor: i64,
    }
}

pub mod family {
    use super::*;

    /// Status of a family link.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LinkStatus {
        Pending,
        Accepted,
        Rejected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Invite {
        pub email: String,
        pub display_name: Option<String>,
        pub group_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Link {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub member_id: Uuid,
        pub display_name: Option<String>,
        pub group_name: String,
        pub status: LinkStatus,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Member {
        pub id: Uuid,
        pub member_id: Uuid,
        pub email: String,
        pub display_name: String,
        pub group_name: String,
        pub status: LinkStatus,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub total_wallet_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Invitation {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub owner_email: String,
        pub owner_display_name: String,
        pub group_name: String,
        pub status: LinkStatus,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Joined {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub owner_email: String,
        pub owner_display_name: String,
        pub group_name: String,
    }
}

/// Body of `{"deleted": true}` style acknowledgements.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}
