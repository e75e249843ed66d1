use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Login credentials.
/// Note: Credentials are never serialized to maintain security.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Configuration for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend API (e.g. https://api.ledgerpay.app)
    pub base_url: String,
    /// Minimum username length before a check-username request is issued
    #[serde(default = "default_min_username_len")]
    pub min_username_len: usize,
}

fn default_min_username_len() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            min_username_len: default_min_username_len(),
        }
    }
}

impl Config {
    /// Join an endpoint path onto the base URL, tolerating a trailing slash
    /// on either side.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Registration form submitted to `auth/register`.
/// Field names follow the backend's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub profile_type: String,
    pub role: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            password: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            profile_type: "CUSTOMER".to_string(),
            role: "CUSTOMER".to_string(),
        }
    }
}

/// Immutable profile snapshot, fetched fresh on each dashboard load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub address: String,
}

/// Account summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: String,
    /// Registration timestamp as reported by the server
    pub registered: String,
    pub balance: Decimal,
    pub account_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Payment,
    Withdrawal,
    Transfer,
}

/// A single money movement, server-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    #[serde(default)]
    pub from_account: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub external_source: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub timestamp: String,
}

impl Transaction {
    /// Convert the server timestamp string into a comparable instant.
    /// Accepts RFC 3339, a naive datetime, or a bare date. Returns `None`
    /// for anything else so the caller can order unparseable entries last.
    pub fn timestamp_instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
        None
    }
}

/// Combined profile/account/transactions response from `account/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub profile: Profile,
    pub transactions: Vec<Transaction>,
    pub account: Account,
}

/// Actions to be performed by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Make an HTTP request
    HttpRequest {
        url: String,
        method: String,
        headers: HashMap<String, String>,
        body: Option<String>,
    },
}

/// Outcome of starting a protected operation. The caller owns the
/// navigation decision when no session is present.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Request is ready; execute it and feed the response back
    Send(Action),
    /// No stored session; navigate to the login flow. No request was built.
    RedirectToLogin,
}

/// Events emitted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // Login
    LoginSucceeded {
        username: String,
    },
    LoginFailed {
        reason: String,
    },

    // Registration
    RegistrationComplete,
    RegistrationFailed {
        reason: String,
    },

    // Availability checks
    UsernameChecked {
        message: String,
    },
    EmailChecked {
        message: String,
    },

    // Dashboard
    DashboardLoaded {
        payload: DashboardPayload,
    },
    DashboardFailed {
        reason: String,
    },

    // Deposit
    DepositAccepted,
    DepositFailed {
        reason: String,
    },

    // Session state
    AuthenticationRequired,
    SessionPersistFailed {
        reason: String,
    },
}

/// Internal operation tracking
#[derive(Debug, Clone)]
pub(crate) enum Operation {
    Login,
    Register,
    CheckUsername,
    CheckEmail,
    Dashboard { generation: u64 },
    Deposit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.min_username_len, 5);
    }

    #[test]
    fn test_endpoint_join_tolerates_slashes() {
        let config = Config {
            base_url: "https://api.test.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.endpoint("auth/login"), "https://api.test.com/auth/login");

        let config = Config {
            base_url: "https://api.test.com".to_string(),
            ..Config::default()
        };
        assert_eq!(config.endpoint("/auth/login"), "https://api.test.com/auth/login");
    }

    #[test]
    fn test_credentials_not_serializable() {
        // Credentials should not implement Serialize
        // This test ensures we don't accidentally add it
        fn assert_not_serialize<T>() {}
        assert_not_serialize::<Credentials>();
    }

    #[test]
    fn test_registration_form_defaults_to_customer() {
        let form = RegistrationForm::default();
        assert_eq!(form.profile_type, "CUSTOMER");
        assert_eq!(form.role, "CUSTOMER");

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["profileType"], "CUSTOMER");
        assert_eq!(json["firstName"], "");
    }

    #[test]
    fn test_transaction_wire_format() {
        let json = r#"{
            "id": 7,
            "fromAccount": "ACC-1",
            "amount": "25.50",
            "type": "TRANSFER",
            "timestamp": "2024-03-01T10:00:00Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.kind, TransactionKind::Transfer);
        assert_eq!(tx.from_account.as_deref(), Some("ACC-1"));
        assert!(tx.to_account.is_none());
        assert!(tx.external_source.is_none());
    }

    #[test]
    fn test_transaction_kind_screaming_case() {
        let kind: TransactionKind = serde_json::from_str(r#""WITHDRAWAL""#).unwrap();
        assert_eq!(kind, TransactionKind::Withdrawal);
        assert_eq!(
            serde_json::to_string(&TransactionKind::Deposit).unwrap(),
            r#""DEPOSIT""#
        );
    }

    #[test]
    fn test_timestamp_instant_formats() {
        let mut tx = Transaction {
            id: 1,
            from_account: None,
            to_account: None,
            amount: "1.00".to_string(),
            external_source: None,
            kind: TransactionKind::Deposit,
            timestamp: "2024-01-02T03:04:05Z".to_string(),
        };
        assert!(tx.timestamp_instant().is_some());

        tx.timestamp = "2024-01-02T03:04:05".to_string();
        assert!(tx.timestamp_instant().is_some());

        tx.timestamp = "2024-01-02".to_string();
        assert!(tx.timestamp_instant().is_some());

        tx.timestamp = "not a date".to_string();
        assert!(tx.timestamp_instant().is_none());
    }

    #[test]
    fn test_timestamp_instant_ordering_across_formats() {
        let make = |ts: &str| Transaction {
            id: 0,
            from_account: None,
            to_account: None,
            amount: "0".to_string(),
            external_source: None,
            kind: TransactionKind::Payment,
            timestamp: ts.to_string(),
        };

        let earlier = make("2024-01-01").timestamp_instant().unwrap();
        let later = make("2024-01-01T12:00:00Z").timestamp_instant().unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_action_equality() {
        let action1 = Action::HttpRequest {
            url: "https://test.com".to_string(),
            method: "POST".to_string(),
            headers: HashMap::new(),
            body: Some("test".to_string()),
        };

        let action2 = Action::HttpRequest {
            url: "https://test.com".to_string(),
            method: "POST".to_string(),
            headers: HashMap::new(),
            body: Some("test".to_string()),
        };

        assert_eq!(action1, action2);
    }
}
