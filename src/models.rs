pub mod auth;
pub mod complaint;
pub mod guest;
pub mod property;
pub mod room;
pub mod settings;
pub mod supervisor;
pub mod transaction;
