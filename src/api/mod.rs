//! Typed admin resources.
//!
//! Thin wrappers that pair an [`Endpoint`](crate::endpoints::Endpoint) with
//! a wire type. Every call goes through `ApiClient::send`, so errors are
//! already normalized.

pub mod roles;
pub mod sync;
pub mod types;
pub mod users;

pub use roles::RolesApi;
pub use types::{
    CreateUserRequest, Page, RegisterRequest, RegisterResponse, Role, RoleRequest, SessionUser,
    SignInRequest, SignInResponse, UpdateUserRequest, User, UserStatus,
};
pub use users::UsersApi;
