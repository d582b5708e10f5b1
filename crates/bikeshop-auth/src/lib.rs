//! # bikeshop-auth
//!
//! Stateless authentication and authorization for the bike shop.
//!
//! ## Modules
//!
//! - `jwt`: signed session tokens carrying identity and role
//! - `password`: Argon2id hashing and the registration password policy
//! - `rbac`: the role gate applied to route groups

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordPolicy};
pub use rbac::RoleGate;
