//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! sign in  → /auth/login → accessToken → token_store.rs (set)
//! dispatch → ApiClient reads token_store.rs (get) → Authorization header
//! 401      → ApiClient clears token_store.rs
//! sign out → /auth/logout (best effort) → token_store.rs (clear)
//! ```

pub mod session;
pub mod token_store;

pub use session::AuthApi;
pub use token_store::{Credential, FileTokenStore, MemoryTokenStore, TokenStore};
