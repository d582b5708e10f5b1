//! The role gate.

use bikeshop_core::error::AppError;
use bikeshop_entity::user::Role;

/// Decides whether a role may enter a route group.
///
/// A role passes if it is in the allowed set or is admin.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    allowed: &'static [Role],
}

impl RoleGate {
    /// Workshop area.
    pub const STAFF: RoleGate = RoleGate::new(&[Role::Technician]);
    /// Back office. Admin passes every gate, so the set is empty.
    pub const ADMIN: RoleGate = RoleGate::new(&[]);

    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn permits(&self, role: Role) -> bool {
        role.is_admin() || self.allowed.contains(&role)
    }

    /// Like [`permits`](Self::permits), as an authorization error.
    pub fn authorize(&self, role: Role) -> Result<(), AppError> {
        if self.permits(role) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' may not access this area"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_passes_every_gate() {
        for gate in [RoleGate::STAFF, RoleGate::ADMIN, RoleGate::new(&[Role::Customer])] {
            assert!(gate.permits(Role::Admin));
        }
    }

    #[test]
    fn test_staff_gate() {
        assert!(RoleGate::STAFF.permits(Role::Technician));
        assert!(RoleGate::STAFF.authorize(Role::Customer).is_err());
    }

    #[test]
    fn test_admin_gate_rejects_technicians() {
        assert!(!RoleGate::ADMIN.permits(Role::Technician));
        assert!(!RoleGate::ADMIN.permits(Role::Customer));
    }
}
