use utoipa::OpenApi;

use crate::api::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::login::login,
        handlers::login::sms_login,
        handlers::dnevnik::person_data,
        handlers::dnevnik::summary_marks,
        handlers::dnevnik::diary,
        handlers::dnevnik::week_schedule,
        handlers::dnevnik::school_info,
        handlers::dnevnik::homework_from_range,
        handlers::dnevnik::missed_lessons,
        handlers::admin::list,
        handlers::admin::grant,
        handlers::admin::revoke,
    ),
    components(schemas(
        handlers::health::Health,
        handlers::login::LoginRequest,
        handlers::login::SmsLoginRequest,
    )),
    tags(
        (name = "login", description = "Credential and SMS login flows"),
        (name = "dnevnik", description = "Diary data, session gated"),
        (name = "admin", description = "Privilege administration"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
