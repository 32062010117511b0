//! License classification and link building

const LICENSE_BASE_URL: &str = "https://opensource.org/licenses";

/// Lowercased substrings of the well-known permissive license families
const PERMISSIVE: [&str; 8] = [
    "mit",
    "bsd",
    "apache",
    "isc",
    "unlicense",
    "cc0",
    "wtfpl",
    "zlib",
];

/// Check if a license is permissive.
///
/// Plain case-insensitive substring matching: compound SPDX expressions are
/// not interpreted, so `GPL-3.0 AND MIT` counts as permissive. Missing or
/// unknown licenses are non-permissive.
pub fn is_permissive(license: Option<&str>) -> bool {
    let Some(license) = license else {
        return false;
    };
    let license_lower = license.to_lowercase();

    PERMISSIVE.iter().any(|&p| license_lower.contains(p))
}

/// Build the link to a license's text, `None` for a missing or blank license
pub fn license_link(license: Option<&str>) -> Option<String> {
    let license = license.map(str::trim).filter(|l| !l.is_empty())?;
    Some(format!("{}/{}", LICENSE_BASE_URL, urlencoding::encode(license)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_families() {
        for license in ["MIT", "mit", "Apache-2.0", "BSD-3-Clause", "ISC", "Unlicense", "CC0-1.0", "WTFPL", "Zlib"] {
            assert!(is_permissive(Some(license)), "{} should be permissive", license);
        }
    }

    #[test]
    fn test_non_permissive() {
        assert!(!is_permissive(None));
        assert!(!is_permissive(Some("")));
        assert!(!is_permissive(Some("GPL-3.0")));
        assert!(!is_permissive(Some("SEE LICENSE IN LICENSE.txt")));
    }

    #[test]
    fn test_compound_expressions_use_substring_match() {
        assert!(is_permissive(Some("(MIT OR Apache-2.0)")));
        assert!(is_permissive(Some("GPL-3.0 AND MIT")));
        // npm's marker for proprietary packages still contains "unlicense"
        assert!(is_permissive(Some("UNLICENSED")));
    }

    #[test]
    fn test_license_link() {
        assert_eq!(
            license_link(Some("MIT")).as_deref(),
            Some("https://opensource.org/licenses/MIT")
        );
        assert_eq!(
            license_link(Some("(MIT OR Apache-2.0)")).as_deref(),
            Some("https://opensource.org/licenses/%28MIT%20OR%20Apache-2.0%29")
        );
        assert_eq!(license_link(Some("  ")), None);
        assert_eq!(license_link(None), None);
    }
}
