pub mod admin;
pub mod auth;
pub mod complaints;
pub mod guest;
pub mod payment;
pub mod settings;
pub mod superadmin;
