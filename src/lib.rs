mod client;
mod dashboard;
mod error;
mod gateway;
mod session;
mod types;

pub mod transport;

pub use client::Client;
pub use dashboard::{sort_transactions, DashboardFlow, DashboardPhase};
pub use error::{ClientError, StoreError, TransportError};
pub use gateway::{authorize, AuthResult};
pub use session::{
    clear_session, save_session, FallbackStore, MemoryStore, SessionSnapshot, SessionStore,
    ACCESS_TOKEN_KEY, USERNAME_KEY,
};
pub use types::*;
