//! # Authorization Core
//!
//! Team-scoped authorization for Sirius:
//! - Permission resolution (`has_perm` and friends)
//! - Team hierarchy walking with cycle detection
//! - Role bundles and member role assignment

pub mod hierarchy;
pub mod permissions;
pub mod roles;

// Re-export commonly used types
pub use hierarchy::{ancestors, children, ensure_can_reparent, MAX_TEAM_DEPTH};
pub use permissions::{
    check_any_permission,
    check_permission,
    current_membership,
    has_perm,
    require_any_permission,
    require_permission,
    team_permissions,
    Action,
    Permission,
    PermissionCheckResult,
    PermissionService,
    ResourceType,
};
pub use roles::{assign_role, create_default_roles, create_role, grant_direct_permissions, ADMIN_ROLE, MEMBER_ROLE};
