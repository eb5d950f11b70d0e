//! Student bank accounts and their ledger.

use serde::{Deserialize, Serialize};

use super::individual::SimpleList;
use super::wire::{number, present};

string_enum! {
    pub enum BankAccountType {
        Student = "Student",
        Other = "Other",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(serialize_with = "number")]
    pub account_balance: f64,
    pub account_name: String,
    #[serde(serialize_with = "number")]
    pub amount: f64,
    #[serde(serialize_with = "number")]
    pub bank_balance: f64,
    pub timestamp: String,
}

impl BankTransaction {
    pub fn is_withdrawal(&self) -> bool {
        self.amount < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(rename = "ID")]
    pub id: String,
    pub archived: bool,
    #[serde(serialize_with = "number")]
    pub balance: f64,
    pub created: String,
    #[serde(serialize_with = "number")]
    pub deposits: f64,
    pub email: String,
    #[serde(serialize_with = "number")]
    pub limit: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: BankAccountType,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub authorized_users: Option<SimpleList>,
    #[serde(serialize_with = "number")]
    pub withdrawls: f64,
}

impl BankAccount {
    /// Whether `user_id` appears among the account's authorized users.
    pub fn is_authorized(&self, user_id: &str) -> bool {
        self.authorized_users
            .as_ref()
            .is_some_and(|users| users.contains_key(user_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bank_account_authorized_users() {
        let account: BankAccount = serde_json::from_value(json!({
            "ID": "acct-1", "archived": false, "balance": 42.5, "created": "2024-08-26",
            "deposits": 100.0, "email": "jdoe@example.org", "limit": 20.0, "name": "Jane Doe",
            "type": "Student", "withdrawls": 57.5,
            "authorizedUsers": {"t1": {"ID": "t1", "name": "Ruth Penn"}}
        }))
        .unwrap();
        assert!(account.is_authorized("t1"));
        assert!(!account.is_authorized("t2"));
    }

    #[test]
    fn test_bank_account_type_is_closed() {
        let result = serde_json::from_value::<BankAccountType>(json!("student"));
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_direction() {
        let tx: BankTransaction = serde_json::from_value(json!({
            "ID": "tx-1", "accountBalance": 30.0, "accountName": "Jane Doe",
            "amount": -12.5, "bankBalance": 1020.0, "timestamp": "2024-09-04T14:00:00Z"
        }))
        .unwrap();
        assert!(tx.is_withdrawal());
    }
}
