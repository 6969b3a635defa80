pub mod auth;
pub mod billing;
pub mod complaint_service;
pub mod guest_service;
pub mod notice_service;
pub mod payment_service;
pub mod property_service;
pub mod room_service;
pub mod staff_service;

#[cfg(test)]
pub(crate) mod test_support;
