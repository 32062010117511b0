//! Markdown rendering of a license report.
//!
//! The layout is also the cache format for the next run: every dependency
//! block starts with [`ENTRY_MARKER`] and keeps its lines in a fixed order,
//! which [`crate::cache::parse_report`] reads back positionally. Change both
//! sides together.

use crate::timestamp::format_timestamp;
use crate::types::{LicenseReport, ReportRecord};

/// Starts every dependency block and appears nowhere else in the document
pub(crate) const ENTRY_MARKER: &str = "\n### ";
/// Prefix of the block title for non-permissive dependencies
pub(crate) const WARNING_GLYPH: &str = "⚠️ ";

pub(crate) const DESCRIPTION_LABEL: &str = "Description: ";
pub(crate) const REGISTRY_LABEL: &str = "NPM: ";
pub(crate) const LICENSE_LABEL: &str = "License: ";
pub(crate) const UPDATED_LABEL: &str = "Last Updated: ";

/// Shown when the registry reports no description
pub const NO_DESCRIPTION: &str = "No description available";
/// Shown in place of the license link when no license is known
pub const NO_LICENSE: &str = "No license information available";

const REVIEW_NOTE: &str = "> **Review required:** this license is not on the permissive allow-list. \
Check its terms before distributing the project.";

const INTRO: &str = "This report lists every runtime and development dependency declared in the \
project manifest together with its license. Dependencies marked with ⚠️ use a license outside the \
permissive allow-list (MIT, BSD, Apache, ISC, Unlicense, CC0, WTFPL, Zlib) or report no license at \
all.\n\nRegistry metadata is cached in this file. Entries are refreshed once their \"Last Updated\" \
time is older than the cache lifetime.";

const FOOTER: &str = "---\n\n_License classification matches license names against a fixed \
allow-list and is not legal advice. Consult the license texts for authoritative terms._\n";

/// Normalize a description for a single report line, falling back to the placeholder
pub fn display_description(description: Option<&str>) -> String {
    let flattened = description
        .unwrap_or_default()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if flattened.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        flattened
    }
}

/// Render the full markdown document
pub fn render_markdown(report: &LicenseReport) -> String {
    let mut md = String::new();

    md.push_str("# Dependency License Report\n\n");
    md.push_str(&format!(
        "Generated: {}\n\n",
        format_timestamp(report.generated_at)
    ));
    md.push_str(&format!(
        "Total Dependencies: {}\n",
        report.summary.total_dependencies
    ));
    md.push_str(&format!(
        "Non-Permissive Licenses: {}\n\n",
        report.summary.non_permissive
    ));
    md.push_str(INTRO);
    md.push_str("\n\n## Dependencies\n");

    for record in &report.records {
        md.push_str(&render_record(record));
    }

    md.push('\n');
    md.push_str(FOOTER);
    md
}

/// Render one dependency block, starting with the entry marker
fn render_record(record: &ReportRecord) -> String {
    let glyph = if record.is_permissive { "" } else { WARNING_GLYPH };
    let mut block = format!("{}{}{}\n", ENTRY_MARKER, glyph, record.name);

    block.push_str(&format!("{}{}\n", DESCRIPTION_LABEL, record.description));
    block.push_str(&format!("{}{}\n", REGISTRY_LABEL, record.registry_link));
    block.push_str(&format!(
        "{}{}\n",
        LICENSE_LABEL,
        record.license_link.as_deref().unwrap_or(NO_LICENSE)
    ));
    block.push_str(&format!("{}{}\n", UPDATED_LABEL, record.last_updated));

    if !record.is_permissive {
        block.push_str(REVIEW_NOTE);
        block.push('\n');
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, is_permissive: bool, license_link: Option<&str>) -> ReportRecord {
        ReportRecord {
            name: name.to_string(),
            is_permissive,
            description: "A package".to_string(),
            registry_link: format!("https://www.npmjs.com/package/{}", name),
            license_link: license_link.map(String::from),
            last_updated: "2026-10-16T10:00:00Z".to_string(),
            from_cache: false,
        }
    }

    #[test]
    fn test_display_description() {
        assert_eq!(display_description(None), NO_DESCRIPTION);
        assert_eq!(display_description(Some("  \n ")), NO_DESCRIPTION);
        assert_eq!(
            display_description(Some("First line\r\nsecond line")),
            "First line second line"
        );
    }

    #[test]
    fn test_render_header_and_blocks() {
        let report = LicenseReport::new(
            Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            vec![
                record("a-lib", true, Some("https://opensource.org/licenses/MIT")),
                record("b-lib", false, None),
            ],
        );

        let md = render_markdown(&report);

        assert!(md.starts_with("# Dependency License Report\n\nGenerated: 2026-10-16T12:00:00Z\n"));
        assert!(md.contains("Total Dependencies: 2\n"));
        assert!(md.contains("Non-Permissive Licenses: 1\n"));
        assert!(md.contains(
            "\n### a-lib\nDescription: A package\nNPM: https://www.npmjs.com/package/a-lib\n\
             License: https://opensource.org/licenses/MIT\nLast Updated: 2026-10-16T10:00:00Z\n"
        ));
        assert!(md.contains("\n### ⚠️ b-lib\nDescription: A package\n"));
        assert!(md.contains(&format!("License: {}\n", NO_LICENSE)));
        assert_eq!(md.matches("Review required").count(), 1);
        assert_eq!(md.matches(ENTRY_MARKER).count(), 2);
        assert!(md.ends_with(FOOTER));
    }
}
