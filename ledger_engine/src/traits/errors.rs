use ledger_common::RevenueShareError;
use thiserror::Error;

/// The caller supplied data that cannot be accepted. Nothing has been written when this error is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is a required field")]
    MissingField(&'static str),
    #[error("{field} cannot be negative, but was {value}")]
    NegativeAmount { field: &'static str, value: String },
    #[error("The referenced {entity} #{id} does not exist")]
    UnknownReference { entity: &'static str, id: i64 },
    #[error("A record with the same {0} already exists")]
    Duplicate(String),
    #[error("{0}")]
    InvalidRevenueShare(#[from] RevenueShareError),
    #[error("The requested change is empty")]
    EmptyMutation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("Invalid request. {0}")]
    Validation(#[from] ValidationError),
    #[error("Data integrity violation. {0}")]
    DataIntegrity(String),
    #[error("The order is being modified concurrently. Try again. {0}")]
    Concurrency(String),
    #[error("The requested order #{0} does not exist")]
    OrderNotFound(i64),
    #[error("The requested {0} does not exist")]
    NotFound(String),
    #[error("Transition dispatch did not settle after {0} rounds")]
    DispatchLoop(usize),
}

impl LedgerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Concurrency(_))
    }
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ValidationError::Duplicate(unique_field(db.message())).into()
            },
            sqlx::Error::Database(db) if is_busy(db.code().as_deref()) => LedgerError::Concurrency(e.to_string()),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() || db.is_check_violation() => {
                LedgerError::DataIntegrity(e.to_string())
            },
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
                LedgerError::DataIntegrity(e.to_string())
            },
            sqlx::Error::PoolTimedOut => LedgerError::Concurrency(e.to_string()),
            _ => LedgerError::DatabaseError(e.to_string()),
        }
    }
}

/// SQLite reports extended result codes. The primary code lives in the low byte.
fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok()).map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED)).unwrap_or(false)
}

/// Extracts `email` from messages like "UNIQUE constraint failed: partners.email".
fn unique_field(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, cols)| cols)
        .unwrap_or(message)
        .split(", ")
        .map(|col| col.rsplit_once('.').map(|(_, c)| c).unwrap_or(col))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn busy_codes() {
        assert!(is_busy(Some("5")));
        assert!(is_busy(Some("517")));
        assert!(is_busy(Some("6")));
        assert!(!is_busy(Some("19")));
        assert!(!is_busy(Some("2067")));
        assert!(!is_busy(None));
    }

    #[test]
    fn unique_field_names() {
        assert_eq!(unique_field("UNIQUE constraint failed: partners.email"), "email");
        assert_eq!(unique_field("UNIQUE constraint failed: a.x, a.y"), "x, y");
        assert_eq!(unique_field("something odd"), "something odd");
    }

    #[test]
    fn pool_timeouts_are_retryable() {
        let err = LedgerError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
        assert!(!LedgerError::OrderNotFound(1).is_retryable());
    }
}
