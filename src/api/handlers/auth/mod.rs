//! Auth endpoints: registration, SRP login, token rotation, logout, and
//! session introspection.

pub mod login;
pub mod register;
pub mod session;
pub mod tokens;
pub mod types;
mod utils;
