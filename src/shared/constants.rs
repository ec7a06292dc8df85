/// Locale prefix meaning "electrical substation". Report authors write
/// the substation name with or without it; both must land in the same
/// Drive folder.
pub const STATION_PREFIX: &str = "สถานีไฟฟ้า";

/// Marker written to the file-reference column when the attachment
/// could not be stored. The row is still the authoritative record.
pub const UPLOAD_FAILED_MARKER: &str = "อัปโหลดไฟล์ไม่สำเร็จ";

/// Characters that are never allowed in a computed file name.
pub const FILENAME_RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Session token header for the session-scoped auth variant.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";
