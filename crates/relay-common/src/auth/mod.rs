//! Authentication module

mod jwt;

pub use jwt::{AuthError, Claims, JwtService};
