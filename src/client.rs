use crate::dashboard::{sort_transactions, DashboardFlow, DashboardPhase};
use crate::error::{ClientError, StoreError};
use crate::gateway::{authorize, protected_request, public_request, AuthResult};
use crate::session::{save_session, SessionSnapshot, SessionStore};
use crate::types::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::warn;

// Response types for deserialization
#[derive(Deserialize, Serialize)]
struct LoginResponse {
    token: String,
    username: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct DepositRequest {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

/// Client state machine for the LedgerPay backend.
///
/// The client never performs IO itself: operations return `Action` (or
/// `Dispatch`) values describing the HTTP request to make, and the host
/// feeds the raw response back through `handle_response`, which returns
/// the resulting events. Responses are matched to operations in FIFO
/// order, mirroring one in-flight request per screen.
pub struct Client<S: SessionStore> {
    config: Config,
    store: S,
    dashboard: DashboardFlow,
    pending_operations: VecDeque<Operation>,
}

impl<S: SessionStore> Client<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            dashboard: DashboardFlow::new(),
            pending_operations: VecDeque::new(),
        }
    }

    /// Current contents of the session store.
    pub fn session(&self) -> Result<SessionSnapshot, StoreError> {
        SessionSnapshot::load(&self.store)
    }

    /// Where the current dashboard load stands.
    pub fn dashboard(&self) -> &DashboardPhase {
        self.dashboard.phase()
    }

    /// Direct access to the session store, for hosts that build flows the
    /// client does not own (e.g. logout).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ========== Public operations ==========

    /// Build the login request. On a 200 response the session is persisted
    /// under the fixed storage keys, overwriting any previous session.
    pub fn login(&mut self, credentials: &Credentials) -> Action {
        self.pending_operations.push_back(Operation::Login);
        public_request(
            self.config.endpoint("auth/login"),
            "POST",
            Some(
                serde_json::json!({
                    "email": credentials.email,
                    "password": credentials.password,
                })
                .to_string(),
            ),
        )
    }

    /// Build the registration request. The backend answers 201 on success.
    pub fn register(&mut self, form: &RegistrationForm) -> Action {
        self.pending_operations.push_back(Operation::Register);
        public_request(
            self.config.endpoint("auth/register"),
            "POST",
            Some(serde_json::to_string(form).unwrap_or_else(|_| "{}".to_string())),
        )
    }

    /// Build a username availability check. Candidates shorter than the
    /// configured minimum are rejected before any request is issued.
    pub fn check_username(&mut self, username: &str) -> Result<Action, ClientError> {
        if username.len() < self.config.min_username_len {
            return Err(ClientError::UsernameTooShort {
                minimum: self.config.min_username_len,
            });
        }
        self.pending_operations.push_back(Operation::CheckUsername);
        Ok(public_request(
            self.config
                .endpoint(&format!("users/check-username?username={}", username)),
            "GET",
            None,
        ))
    }

    /// Build an email availability check.
    pub fn check_email(&mut self, email: &str) -> Action {
        self.pending_operations.push_back(Operation::CheckEmail);
        public_request(
            self.config
                .endpoint(&format!("users/check-email?email={}", email)),
            "GET",
            None,
        )
    }

    /// Start a dashboard load cycle.
    ///
    /// With no stored token the flow ends `Unauthenticated` and no request
    /// is built; the caller navigates to login. With a token the request
    /// carries it as a Bearer header and the flow enters `Loading`.
    pub fn fetch_dashboard(&mut self) -> Result<Dispatch, StoreError> {
        let generation = self.dashboard.begin();
        match authorize(&self.store)? {
            AuthResult::Unauthenticated => {
                self.dashboard.finish_unauthenticated(generation);
                Ok(Dispatch::RedirectToLogin)
            }
            AuthResult::Authenticated { token } => {
                self.pending_operations
                    .push_back(Operation::Dashboard { generation });
                Ok(Dispatch::Send(protected_request(
                    self.config.endpoint("account/dashboard"),
                    "GET",
                    None,
                    &token,
                )))
            }
        }
    }

    /// Validate and build a deposit request. Malformed input is caught
    /// client-side before anything goes on the wire.
    pub fn deposit(&mut self, amount: &str) -> Result<Dispatch, ClientError> {
        let trimmed = amount.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidAmount("amount is required".to_string()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| ClientError::InvalidAmount(format!("not a number: {}", trimmed)))?;
        if amount <= Decimal::ZERO {
            return Err(ClientError::InvalidAmount(
                "amount must be positive".to_string(),
            ));
        }

        match authorize(&self.store)? {
            AuthResult::Unauthenticated => Ok(Dispatch::RedirectToLogin),
            AuthResult::Authenticated { token } => {
                self.pending_operations.push_back(Operation::Deposit);
                let body = serde_json::to_string(&DepositRequest { amount })
                    .unwrap_or_else(|_| "{}".to_string());
                Ok(Dispatch::Send(protected_request(
                    self.config.endpoint("transactions/deposit"),
                    "POST",
                    Some(body),
                    &token,
                )))
            }
        }
    }

    // ========== Response handling ==========

    /// Handle an HTTP response from the caller.
    /// Returns events based on the response.
    pub fn handle_response(&mut self, status: u16, body: &str) -> Vec<Event> {
        // Dequeue the next pending operation
        let operation = match self.pending_operations.pop_front() {
            Some(op) => op,
            None => return vec![],
        };

        match operation {
            Operation::Login => self.handle_login_response(status, body),
            Operation::Register => self.handle_register_response(status, body),
            Operation::CheckUsername => {
                vec![Event::UsernameChecked {
                    message: extract_message(body, "Error checking username"),
                }]
            }
            Operation::CheckEmail => {
                vec![Event::EmailChecked {
                    message: extract_message(body, "Error checking email"),
                }]
            }
            Operation::Dashboard { generation } => {
                self.handle_dashboard_response(generation, status, body)
            }
            Operation::Deposit => self.handle_deposit_response(status, body),
        }
    }

    /// Handle an outgoing request that never produced an HTTP response
    /// (connection refused, DNS failure, and the like).
    pub fn handle_transport_failure(&mut self, reason: &str) -> Vec<Event> {
        let operation = match self.pending_operations.pop_front() {
            Some(op) => op,
            None => return vec![],
        };

        warn!(reason, "request failed before reaching the server");
        match operation {
            Operation::Login => vec![Event::LoginFailed {
                reason: reason.to_string(),
            }],
            Operation::Register => vec![Event::RegistrationFailed {
                reason: reason.to_string(),
            }],
            Operation::CheckUsername => vec![Event::UsernameChecked {
                message: "Error checking username".to_string(),
            }],
            Operation::CheckEmail => vec![Event::EmailChecked {
                message: "Error checking email".to_string(),
            }],
            Operation::Dashboard { generation } => {
                if !self.dashboard.finish_failed(generation) {
                    return vec![];
                }
                vec![Event::DashboardFailed {
                    reason: reason.to_string(),
                }]
            }
            Operation::Deposit => vec![Event::DepositFailed {
                reason: reason.to_string(),
            }],
        }
    }

    // ========== Response handlers ==========

    fn handle_login_response(&mut self, status: u16, body: &str) -> Vec<Event> {
        if status != 200 {
            let reason = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Login failed. Please check credentials.".to_string());
            warn!(status, "login rejected");
            return vec![Event::LoginFailed { reason }];
        }

        match serde_json::from_str::<LoginResponse>(body) {
            Ok(response) => {
                // Overwrites any previous session under the fixed keys
                if let Err(e) = save_session(&mut self.store, &response.token, &response.username) {
                    warn!(error = %e, "session could not be persisted");
                    return vec![Event::SessionPersistFailed {
                        reason: e.to_string(),
                    }];
                }
                vec![Event::LoginSucceeded {
                    username: response.username,
                }]
            }
            Err(e) => vec![Event::LoginFailed {
                reason: format!("Invalid response: {}", e),
            }],
        }
    }

    fn handle_register_response(&mut self, status: u16, body: &str) -> Vec<Event> {
        if status == 201 {
            return vec![Event::RegistrationComplete];
        }
        let reason = serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| "Registration failed".to_string());
        warn!(status, "registration rejected");
        vec![Event::RegistrationFailed { reason }]
    }

    fn handle_dashboard_response(
        &mut self,
        generation: u64,
        status: u16,
        body: &str,
    ) -> Vec<Event> {
        if status == 401 {
            // Token rejected server-side. The stored session is left intact;
            // the caller owns what happens next.
            warn!("dashboard request rejected as unauthenticated");
            if !self.dashboard.finish_unauthenticated(generation) {
                return vec![];
            }
            return vec![Event::AuthenticationRequired];
        }

        if status != 200 {
            warn!(status, "dashboard fetch failed");
            if !self.dashboard.finish_failed(generation) {
                return vec![];
            }
            return vec![Event::DashboardFailed {
                reason: format!("HTTP {}", status),
            }];
        }

        match serde_json::from_str::<DashboardPayload>(body) {
            Ok(mut payload) => {
                sort_transactions(&mut payload.transactions);
                if !self.dashboard.finish_success(generation, payload.clone()) {
                    return vec![];
                }
                vec![Event::DashboardLoaded { payload }]
            }
            Err(e) => {
                warn!(error = %e, "dashboard payload did not deserialize");
                if !self.dashboard.finish_failed(generation) {
                    return vec![];
                }
                vec![Event::DashboardFailed {
                    reason: format!("Invalid response: {}", e),
                }]
            }
        }
    }

    fn handle_deposit_response(&mut self, status: u16, body: &str) -> Vec<Event> {
        if (200..300).contains(&status) {
            return vec![Event::DepositAccepted];
        }
        let reason = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| "Deposit failed. Please try again.".to_string());
        warn!(status, "deposit rejected");
        vec![Event::DepositFailed { reason }]
    }
}

fn extract_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| fallback.to_string())
}
