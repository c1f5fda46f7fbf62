use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The corpus stores language codes in ISO 639-2/T (3-letter) form.
/// Halunder itself has no code of its own; it is filed under North
/// Frisian. User-facing commands also accept ISO 639-1 (2-letter)
/// codes and the legacy ISO 639-2/B forms found in older catalogs.
/// Storage code for Halunder-side material (North Frisian)
pub const SOURCE_LANGUAGE_CODE: &str = "frr";

/// Storage code for German-side material
pub const TARGET_LANGUAGE_CODE: &str = "deu";

/// Map a legacy ISO 639-2/B code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"), // French
        "ger" => Some("deu"), // German
        "dut" => Some("nld"), // Dutch
        "gre" => Some("ell"), // Greek
        "chi" => Some("zho"), // Chinese
        "cze" => Some("ces"), // Czech
        "ice" => Some("isl"), // Icelandic
        "alb" => Some("sqi"), // Albanian
        "arm" => Some("hye"), // Armenian
        "baq" => Some("eus"), // Basque
        "bur" => Some("mya"), // Burmese
        "per" => Some("fas"), // Persian
        "geo" => Some("kat"), // Georgian
        "may" => Some("msa"), // Malay
        "mac" => Some("mkd"), // Macedonian
        "rum" => Some("ron"), // Romanian
        "slo" => Some("slk"), // Slovak
        "wel" => Some("cym"), // Welsh
        _ => None,
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    // 2-letter codes convert via their ISO 639-1 entry
    if normalized.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // 3-letter codes are either already 639-2/T or a legacy B form
    else if normalized.len() == 3 {
        if Language::from_639_3(&normalized).is_some() {
            return Ok(normalized);
        }
        if let Some(part2t) = part2b_to_part2t(&normalized) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_language_code(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_language_code(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the display name for a language code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_language_code(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
