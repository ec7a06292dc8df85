use utoipa::ToSchema;

/// Save request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SaveRepairReportDto {
    /// JSON-encoded RepairReport
    #[schema(example = r#"{"substation":"สถานีไฟฟ้าสมุทรสาคร 10","docNumber":"123/2567"}"#)]
    pub data: String,
    /// The scanned document or photo (optional)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}
