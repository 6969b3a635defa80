pub mod auth;
pub mod cors;
pub mod rbac;
pub mod tenancy;
