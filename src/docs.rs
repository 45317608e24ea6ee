use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use scholaris_core::{ErrorResponse, MessageResponse, PageInfo, PaginationParams};
use scholaris_models::admins::{
    AdminPayload, ChangePasswordDto, LoginRequest, LoginResponse, RegisterAdminDto,
};
use scholaris_models::admissions::{
    Admission, AdmissionList, AdmissionPayload, AdmissionRemarksDto, ApprovalOutcome,
    ApproveAdmissionDto,
};
use scholaris_models::contacts::{
    Contact, ContactList, ContactPayload, CreateContactDto, UpdateContactStatusDto,
};
use scholaris_models::content::{
    ContentBlock, ContentList, ContentPayload, CreateContentDto, UpdateContentDto,
};
use scholaris_models::fees::{
    CreateFeeDto, CreateOrderDto, Fee, FeeDetail, FeeList, FeePayload, ManualPaymentDto,
    Payment, PaymentOrder, PaymentReceipt, StudentFees, StudentSummary, VerifyPaymentDto,
};
use scholaris_models::gallery::{GalleryItem, GalleryItemPayload, GalleryList, UpdateGalleryItemDto};
use scholaris_models::notices::{Notice, NoticeList, NoticePayload};
use scholaris_models::notifications::{
    MarkedRead, Notification, NotificationList, NotificationPayload, UnreadCount,
};
use scholaris_models::students::{
    CreateStudentDto, Student, StudentList, StudentPayload, UpdateStudentDto,
};
use scholaris_models::teachers::{Teacher, TeacherList, TeacherPayload};
use scholaris_models::{
    Address, AdminRole, AdmissionPaymentStatus, AdmissionStatus, ContactStatus, FeeStatus,
    GalleryCategory, Gender, NoticeCategory, NotificationType, PaymentMode, Priority,
};

use crate::modules::health::controller::HealthStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::change_password,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::list_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::admissions::controller::submit_admission,
        crate::modules::admissions::controller::list_admissions,
        crate::modules::admissions::controller::get_admission,
        crate::modules::admissions::controller::approve_admission,
        crate::modules::admissions::controller::reject_admission,
        crate::modules::admissions::controller::hold_admission,
        crate::modules::admissions::controller::delete_admission,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::list_fees,
        crate::modules::fees::controller::get_fee,
        crate::modules::fees::controller::get_student_fees,
        crate::modules::fees::controller::verify_payment,
        crate::modules::fees::controller::manual_payment,
        crate::modules::fees::controller::create_payment_order,
        crate::modules::notices::controller::list_notices,
        crate::modules::notices::controller::list_all_notices,
        crate::modules::notices::controller::get_notice,
        crate::modules::notices::controller::create_notice,
        crate::modules::notices::controller::update_notice,
        crate::modules::notices::controller::delete_notice,
        crate::modules::gallery::controller::list_gallery,
        crate::modules::gallery::controller::get_gallery_item,
        crate::modules::gallery::controller::create_gallery_item,
        crate::modules::gallery::controller::update_gallery_item,
        crate::modules::gallery::controller::delete_gallery_item,
        crate::modules::contacts::controller::create_contact,
        crate::modules::contacts::controller::list_contacts,
        crate::modules::contacts::controller::get_contact,
        crate::modules::contacts::controller::update_contact_status,
        crate::modules::contacts::controller::delete_contact,
        crate::modules::content::controller::list_content,
        crate::modules::content::controller::get_content,
        crate::modules::content::controller::create_content,
        crate::modules::content::controller::update_content,
        crate::modules::content::controller::delete_content,
        crate::modules::notifications::controller::list_notifications,
        crate::modules::notifications::controller::unread_count,
        crate::modules::notifications::controller::mark_read,
        crate::modules::notifications::controller::mark_all_read,
        crate::modules::notifications::controller::delete_notification,
    ),
    components(
        schemas(
            HealthStatus,
            ErrorResponse,
            MessageResponse,
            PageInfo,
            PaginationParams,
            Address,
            AdminRole,
            Gender,
            AdmissionStatus,
            AdmissionPaymentStatus,
            FeeStatus,
            PaymentMode,
            NotificationType,
            Priority,
            NoticeCategory,
            GalleryCategory,
            ContactStatus,
            LoginRequest,
            LoginResponse,
            AdminPayload,
            RegisterAdminDto,
            ChangePasswordDto,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            StudentPayload,
            StudentList,
            Teacher,
            TeacherPayload,
            TeacherList,
            Admission,
            ApproveAdmissionDto,
            AdmissionRemarksDto,
            AdmissionPayload,
            AdmissionList,
            ApprovalOutcome,
            Fee,
            Payment,
            StudentSummary,
            FeeDetail,
            CreateFeeDto,
            VerifyPaymentDto,
            ManualPaymentDto,
            CreateOrderDto,
            PaymentOrder,
            PaymentReceipt,
            FeePayload,
            FeeList,
            StudentFees,
            Notice,
            NoticePayload,
            NoticeList,
            GalleryItem,
            UpdateGalleryItemDto,
            GalleryItemPayload,
            GalleryList,
            Contact,
            CreateContactDto,
            UpdateContactStatusDto,
            ContactPayload,
            ContactList,
            ContentBlock,
            CreateContentDto,
            UpdateContentDto,
            ContentPayload,
            ContentList,
            Notification,
            NotificationPayload,
            NotificationList,
            UnreadCount,
            MarkedRead,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Admin login, session and account endpoints"),
        (name = "Students", description = "Student records"),
        (name = "Teachers", description = "Teacher directory"),
        (name = "Admissions", description = "Admission applications and their approval"),
        (name = "Fees", description = "Fee ledgers, payments and the payment gateway"),
        (name = "Notices", description = "Notice board"),
        (name = "Gallery", description = "Image gallery"),
        (name = "Contacts", description = "Contact form submissions"),
        (name = "Content", description = "Editable site content blocks"),
        (name = "Notifications", description = "Internal notifications for the admin panel")
    ),
    info(
        title = "Scholaris API",
        version = "0.1.0",
        description = "School administration backend: admissions, students, fees and the public site content.",
        contact(
            name = "API Support",
            email = "support@scholaris.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for prefix in [
            "/api/health",
            "/api/auth/login",
            "/api/students",
            "/api/teachers",
            "/api/admissions",
            "/api/fees",
            "/api/notices",
            "/api/gallery",
            "/api/contacts",
            "/api/content",
            "/api/notifications",
        ] {
            assert!(
                paths.iter().any(|path| path.starts_with(prefix)),
                "no documented path under {prefix}"
            );
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
