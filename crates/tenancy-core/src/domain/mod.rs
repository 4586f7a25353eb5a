//! # Tenancy Core - Domain Module
//! 
//! Entities of the tenancy model and the ownership traits the store relies on.

pub mod entity;
pub mod features;
pub mod tenant;
pub mod subscription;
pub mod role;
pub mod user_group;
pub mod user;
pub mod api_key;

pub use entity::{Entity, Owned, Unowned};
pub use features::FeatureSet;
pub use tenant::{Address, Tenant};
pub use subscription::Subscription;
pub use role::Role;
pub use user_group::UserGroup;
pub use user::User;
pub use api_key::ApiKey;
