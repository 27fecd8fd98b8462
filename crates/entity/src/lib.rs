//! Entity definitions for Sirius
//!
//! This crate contains Sea-ORM entity definitions for the database models.
//! The schema itself is managed outside this workspace.

pub mod sea_orm_active_enums;
pub mod classes;
pub use classes::Entity as Classes;
pub mod events;
pub use events::Entity as Events;
pub mod invites;
pub use invites::Entity as Invites;
pub mod join_requests;
pub use join_requests::Entity as JoinRequests;
pub mod memberships;
pub use memberships::Entity as Memberships;
pub mod notices;
pub use notices::Entity as Notices;
pub mod role_permissions;
pub use role_permissions::Entity as RolePermissions;
pub mod roles;
pub use roles::Entity as Roles;
pub mod teams;
pub use teams::Entity as Teams;
pub mod users;
pub use users::Entity as Users;

#[cfg(feature = "testing")]
pub mod testing;
