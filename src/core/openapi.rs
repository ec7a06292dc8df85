use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::repair::{
    dtos as repair_dtos, handlers as repair_handlers, models as repair_models,
};
use crate::shared::types::{ErrorResponse, SaveResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Repair
        repair_handlers::repair_handler::save_report,
        // Auth
        auth_handlers::auth_handler::auth_url,
        auth_handlers::auth_handler::auth_callback,
        auth_handlers::auth_handler::auth_status,
        auth_handlers::auth_handler::logout,
    ),
    components(schemas(
        SaveResponse,
        ErrorResponse,
        repair_dtos::SaveRepairReportDto,
        repair_models::RepairReport,
        repair_models::ReportStatus,
        auth_dtos::AuthUrlResponse,
        auth_dtos::AuthCallbackResponse,
        auth_dtos::AuthStatusResponse,
        auth_dtos::LogoutResponse,
    )),
    tags(
        (name = "repair", description = "Equipment-repair report recording"),
        (name = "auth", description = "Google authorization (session variant)"),
    ),
    info(
        title = "Substation Repair API",
        version = "0.1.0",
        description = "Equipment-repair report recording for electrical substations",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
