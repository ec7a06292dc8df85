//! Filename and folder-name normalization
//!
//! Pure functions shared by the folder resolver and the uploader.

use crate::features::repair::models::RepairReport;
use crate::shared::constants::{FILENAME_RESERVED_CHARS, STATION_PREFIX};

/// Normalize a substation name for folder grouping: trim and strip the
/// "สถานีไฟฟ้า" prefix so authors who do or don't write it land in the
/// same folder.
pub fn normalize_substation(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_prefix(STATION_PREFIX)
        .map(|rest| rest.trim())
        .unwrap_or(trimmed)
        .to_string()
}

/// Strip characters that are unsafe in file names.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !FILENAME_RESERVED_CHARS.contains(c))
        .collect()
}

/// Sanitize a document number. Report numbers commonly contain slashes
/// ("123/2567"); stripping those to nothing would merge distinct
/// numbers, so `/` becomes `-` before the rest is stripped.
pub fn sanitize_doc_number(doc_number: &str) -> String {
    sanitize(&doc_number.replace('/', "-"))
}

/// Canonical file name for an uploaded report document.
///
/// With a document number: `{docNumber}_{substation}.pdf` (sanitized,
/// prefix-stripped; documents carrying a number are assumed to be
/// PDFs). Without one: the original uploaded name, after repairing any
/// legacy-encoding corruption.
pub fn compute_filename(report: &RepairReport, original_name: &str) -> String {
    let doc_number = report.doc_number.trim();
    if doc_number.is_empty() {
        return fix_legacy_encoding(original_name);
    }

    format!(
        "{}_{}.pdf",
        sanitize_doc_number(doc_number),
        sanitize(&normalize_substation(&report.substation))
    )
}

/// Repair a filename whose UTF-8 bytes were mis-decoded as a legacy
/// single-byte encoding by upload middleware (every corrupted char
/// lands in U+0000..U+00FF). Reinterprets those code points as bytes
/// and re-decodes as UTF-8; on any doubt the name is left untouched.
pub fn fix_legacy_encoding(name: &str) -> String {
    if name.is_ascii() || name.chars().any(|c| c as u32 > 0xFF) {
        return name.to_string();
    }

    let bytes: Vec<u8> = name.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(substation: &str, doc_number: &str) -> RepairReport {
        RepairReport {
            substation: substation.to_string(),
            doc_number: doc_number.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_substation_strips_prefix() {
        assert_eq!(
            normalize_substation("สถานีไฟฟ้าสมุทรสาคร 10"),
            "สมุทรสาคร 10"
        );
        assert_eq!(normalize_substation("  สถานีไฟฟ้า ระยอง 2 "), "ระยอง 2");
        // Without the prefix the name passes through trimmed
        assert_eq!(normalize_substation(" สมุทรสาคร 10 "), "สมุทรสาคร 10");
        assert_eq!(normalize_substation(""), "");
    }

    #[test]
    fn test_sanitize_strips_reserved_characters() {
        assert_eq!(sanitize(r#"a\b/c:d*e?f"g<h>i|j"#), "abcdefghij");
        assert_eq!(sanitize("สมุทรสาคร 10"), "สมุทรสาคร 10");
    }

    #[test]
    fn test_sanitize_doc_number_keeps_slash_as_dash() {
        assert_eq!(sanitize_doc_number("123/2567"), "123-2567");
        assert_eq!(sanitize_doc_number("12?3/25:67"), "123-2567");
    }

    #[test]
    fn test_compute_filename_with_doc_number() {
        let filename = compute_filename(
            &report("สถานีไฟฟ้าสมุทรสาคร 10", "123/2567"),
            "scan.jpg",
        );
        assert_eq!(filename, "123-2567_สมุทรสาคร 10.pdf");
    }

    #[test]
    fn test_compute_filename_never_contains_reserved_characters() {
        let filename = compute_filename(&report(r#"A<B>:ไฟ|ฟ้า"#, r#"1/2*3?"#), "x.pdf");
        assert_eq!(filename, "1-23_ABไฟฟ้า.pdf");
        for c in crate::shared::constants::FILENAME_RESERVED_CHARS {
            assert!(!filename.contains(*c), "reserved char {:?} in {}", c, filename);
        }
    }

    #[test]
    fn test_compute_filename_falls_back_to_original_name() {
        let filename = compute_filename(&report("สมุทรสาคร 10", "   "), "รายงาน.pdf");
        assert_eq!(filename, "รายงาน.pdf");
    }

    #[test]
    fn test_fix_legacy_encoding_recovers_thai_name() {
        // UTF-8 bytes of a Thai name mis-decoded as a single-byte
        // encoding: each byte becomes one char below U+0100.
        let mojibake: String = "รายงาน.pdf".bytes().map(|b| b as char).collect();
        assert_ne!(mojibake, "รายงาน.pdf");
        assert_eq!(fix_legacy_encoding(&mojibake), "รายงาน.pdf");
    }

    #[test]
    fn test_fix_legacy_encoding_leaves_clean_names_alone() {
        assert_eq!(fix_legacy_encoding("report.pdf"), "report.pdf");
        // Already valid multi-byte text is not touched
        assert_eq!(fix_legacy_encoding("รายงาน.pdf"), "รายงาน.pdf");
    }

    #[test]
    fn test_fix_legacy_encoding_keeps_undecodable_input() {
        // Latin-1 text that is not valid UTF-8 when reinterpreted
        let name = "caf\u{e9}.pdf";
        assert_eq!(fix_legacy_encoding(name), name);
    }
}
