// src/db.rs

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod supervisor_repo;
pub use supervisor_repo::SupervisorRepository;
pub mod room_repo;
pub use room_repo::RoomRepository;
pub mod guest_repo;
pub use guest_repo::{GuestRepository, NewStay};
pub mod complaint_repo;
pub use complaint_repo::ComplaintRepository;
pub mod transaction_repo;

pub use transaction_repo::TransactionRepository;
