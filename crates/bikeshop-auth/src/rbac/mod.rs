//! Role-based access control for route groups.

pub mod gate;

pub use gate::RoleGate;
