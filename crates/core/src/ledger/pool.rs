//! Money pools: the physical cash box or one bank account.

use caja_shared::types::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Where money sits.
///
/// A bank pool always names its account; "bank without account" cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "account_id", rename_all = "lowercase")]
pub enum Pool {
    /// The user's cash pool. There is exactly one per user and currency.
    Cash,
    /// A bank account.
    Bank(AccountId),
}

/// Kind of a pool, without its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// Cash.
    Cash,
    /// Bank account.
    Bank,
}

impl Pool {
    /// Rebuilds a pool from its stored `kind` and `account_id` columns.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidPool` for a bank row without an account
    /// or a cash row with one.
    pub fn from_parts(kind: PoolKind, account_id: Option<Uuid>) -> Result<Self, LedgerError> {
        match (kind, account_id) {
            (PoolKind::Cash, None) => Ok(Self::Cash),
            (PoolKind::Bank, Some(id)) => Ok(Self::Bank(AccountId::from_uuid(id))),
            (PoolKind::Cash, Some(id)) => Err(LedgerError::InvalidPool(format!(
                "cash pool must not reference account {id}"
            ))),
            (PoolKind::Bank, None) => Err(LedgerError::InvalidPool(
                "bank pool without account".to_string(),
            )),
        }
    }

    /// The pool's kind.
    #[must_use]
    pub const fn kind(&self) -> PoolKind {
        match self {
            Self::Cash => PoolKind::Cash,
            Self::Bank(_) => PoolKind::Bank,
        }
    }

    /// The bank account behind the pool, if any.
    #[must_use]
    pub const fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Cash => None,
            Self::Bank(id) => Some(*id),
        }
    }

    /// The account id as a raw UUID, the shape stored in the `account_id` column.
    #[must_use]
    pub fn account_uuid(&self) -> Option<Uuid> {
        self.account_id().map(AccountId::into_inner)
    }
}

impl PoolKind {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => f.write_str("cash"),
            Self::Bank(id) => write!(f, "bank:{id}"),
        }
    }
}

impl std::str::FromStr for PoolKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            other => Err(LedgerError::InvalidPool(format!("unknown pool kind '{other}'"))),
        }
    }
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_valid() {
        assert_eq!(Pool::from_parts(PoolKind::Cash, None).unwrap(), Pool::Cash);

        let id = Uuid::now_v7();
        assert_eq!(
            Pool::from_parts(PoolKind::Bank, Some(id)).unwrap(),
            Pool::Bank(AccountId::from_uuid(id))
        );
    }

    #[test]
    fn test_from_parts_rejects_inconsistent_rows() {
        assert!(matches!(
            Pool::from_parts(PoolKind::Bank, None),
            Err(LedgerError::InvalidPool(_))
        ));
        assert!(matches!(
            Pool::from_parts(PoolKind::Cash, Some(Uuid::now_v7())),
            Err(LedgerError::InvalidPool(_))
        ));
    }

    #[test]
    fn test_kind_and_account() {
        let id = AccountId::new();
        assert_eq!(Pool::Cash.kind(), PoolKind::Cash);
        assert_eq!(Pool::Bank(id).kind(), PoolKind::Bank);
        assert_eq!(Pool::Cash.account_id(), None);
        assert_eq!(Pool::Bank(id).account_uuid(), Some(id.into_inner()));
    }

    #[test]
    fn test_kind_round_trips_through_storage() {
        assert_eq!("cash".parse::<PoolKind>(), Ok(PoolKind::Cash));
        assert_eq!(PoolKind::Bank.as_str().parse::<PoolKind>(), Ok(PoolKind::Bank));
        assert!(matches!(
            "wallet".parse::<PoolKind>(),
            Err(LedgerError::InvalidPool(_))
        ));
    }

    #[test]
    fn test_cash_orders_before_bank() {
        assert!(Pool::Cash < Pool::Bank(AccountId::new()));
    }
}
