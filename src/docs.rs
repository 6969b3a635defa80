// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::check_status,
        handlers::auth::set_password,
        handlers::auth::get_me,

        // --- Admin ---
        handlers::admin::list_supervisors,
        handlers::admin::add_supervisor,
        handlers::admin::toggle_supervisor,
        handlers::admin::reset_password,
        handlers::admin::list_guests,
        handlers::admin::add_guest,
        handlers::admin::toggle_guest,
        handlers::admin::checkout_guest,
        handlers::admin::approve_notice,
        handlers::admin::reject_notice,
        handlers::admin::revert_notice,

        // --- Rooms ---
        handlers::admin::list_rooms,
        handlers::admin::available_rooms,
        handlers::admin::add_room,

        // --- Guest ---
        handlers::guest::get_profile,
        handlers::guest::initiate_notice,

        // --- Payments ---
        handlers::payment::upi_link,
        handlers::payment::upi_qr,
        handlers::payment::submit_payment,
        handlers::payment::my_history,
        handlers::payment::property_history,
        handlers::payment::approve_transaction,
        handlers::payment::reject_transaction,

        // --- Complaints ---
        handlers::complaints::list_complaints,
        handlers::complaints::get_complaint,
        handlers::complaints::update_status,
        handlers::complaints::my_complaints,
        handlers::complaints::raise_complaint,
        handlers::complaints::cancel_complaint,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_upi,

        // --- Super admin ---
        handlers::superadmin::add_property,
        handlers::superadmin::list_properties,
        handlers::superadmin::toggle_property,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::SetPasswordPayload,
            models::auth::PasswordStatus,
            models::auth::LoginResponse,
            models::auth::MessageResponse,

            // --- Property ---
            models::property::Property,
            models::property::PropertySummary,
            models::property::AddPropertyPayload,
            models::property::PropertyCreated,
            models::property::ActiveStatus,

            // --- Settings ---
            models::settings::PropertySetting,
            models::settings::UpdateUpiPayload,

            // --- Staff ---
            models::supervisor::Supervisor,
            models::supervisor::SupervisorView,
            models::supervisor::AddSupervisorPayload,

            // --- Rooms ---
            models::room::RoomType,
            models::room::Room,
            models::room::AddRoomPayload,

            // --- Guests ---
            models::guest::RentType,
            models::guest::PaymentStatus,
            models::guest::NoticeStatus,
            models::guest::Guest,
            models::guest::GuestStay,
            models::guest::GuestListEntry,
            models::guest::AddGuestPayload,
            models::guest::GuestUserSummary,
            models::guest::GuestProfile,

            // --- Complaints ---
            models::complaint::ComplaintStatus,
            models::complaint::Complaint,
            models::complaint::ComplaintView,
            models::complaint::RaiseComplaintPayload,
            models::complaint::UpdateComplaintStatusPayload,

            // --- Payments ---
            models::transaction::TransactionStatus,
            models::transaction::TransactionKind,
            models::transaction::Transaction,
            models::transaction::TransactionView,
            models::transaction::SubmitPaymentPayload,
            models::transaction::UpiLink,
            models::transaction::TransactionDecision,
        )
    ),
    tags(
        (name = "Auth", description = "Login and first-login password setup"),
        (name = "Admin", description = "Supervisors, guests and notice periods of a property"),
        (name = "Rooms", description = "Room inventory and bed availability"),
        (name = "Guest", description = "Guest self-service"),
        (name = "Payments", description = "UPI payments and their reconciliation"),
        (name = "Complaints", description = "Complaint tickets"),
        (name = "Settings", description = "Property settings"),
        (name = "Super Admin", description = "Property provisioning")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/admin/add-guest",
            "/api/payment/approve/{txId}",
            "/api/complaints/{id}/status",
            "/api/superadmin/add-property",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
