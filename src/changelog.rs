//! Changelog structure checks and maintenance.
//!
//! A changelog is an `.rst` document: a `CHANGELOG` title over- and
//! underlined with `=`, an optional description, then version sections
//! newest first:
//!
//! ```text
//! 1.2.3 (2020-12-06)
//! ------------------
//!
//! **Added**
//!
//! **Fixed**
//!
//! **Dependencies**
//!
//! **Deprecated**
//! ```

use crate::domain::SemanticVersion;
use crate::error::ChangelogError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Subsection markers every section must contain, in this order
pub const SUBSECTIONS: [&str; 4] = ["**Added**", "**Fixed**", "**Dependencies**", "**Deprecated**"];

const TITLE: &str = "changelog";

fn section_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+\.\d+\.\d+(?:-SNAPSHOT)?) \((\d{4}-\d{2}-\d{2})\)$")
            .expect("section header regex is valid")
    })
}

/// A version section header found in a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// 0-based index of the header line
    pub index: usize,
    pub version: SemanticVersion,
    pub date: String,
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn width(line: &str) -> usize {
    strip_eol(line).chars().count()
}

fn is_underline(line: Option<&&str>, ch: char, expected: usize) -> bool {
    match line {
        Some(line) => {
            let line = strip_eol(line);
            expected > 0 && width(line) == expected && line.chars().all(|c| c == ch)
        }
        None => false,
    }
}

fn parse_section_header(index: usize, line: &str) -> Option<SectionHeader> {
    let captures = section_header().captures(strip_eol(line))?;
    let version = SemanticVersion::parse(&captures[1]).ok()?;
    Some(SectionHeader {
        index,
        version,
        date: captures[2].to_string(),
    })
}

fn find_title(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case(TITLE))
}

/// All section headers after `start`, top to bottom
fn section_headers(lines: &[&str], start: usize) -> Vec<SectionHeader> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(idx, line)| parse_section_header(idx, line))
        .collect()
}

fn check_subsections(
    version: &SemanticVersion,
    body: &[&str],
) -> Result<(), ChangelogError> {
    let positions: Vec<Option<usize>> = SUBSECTIONS
        .iter()
        .map(|marker| body.iter().position(|line| line.trim() == *marker))
        .collect();

    if let Some(missing) = positions.iter().position(Option::is_none) {
        return Err(ChangelogError::SubsectionMissing {
            version: version.to_string(),
            marker: SUBSECTIONS[missing].to_string(),
        });
    }

    for i in 1..positions.len() {
        if positions[i] < positions[i - 1] {
            return Err(ChangelogError::SubsectionOrderViolation {
                version: version.to_string(),
                marker: SUBSECTIONS[i].to_string(),
                previous: SUBSECTIONS[i - 1].to_string(),
            });
        }
    }

    Ok(())
}

/// Validate the structure of a changelog given as lines.
///
/// Single top-to-bottom pass that stops at the first problem found.
/// Section versions must strictly decrease (snapshot suffix ignored).
pub fn validate(lines: &[&str]) -> Result<(), ChangelogError> {
    let title = find_title(lines).ok_or(ChangelogError::MissingTitle)?;
    let expected = width(lines[title]);

    if title == 0 || !is_underline(lines.get(title - 1), '=', expected) {
        return Err(ChangelogError::HeaderUnderlineMismatch {
            line: title.max(1),
            expected,
        });
    }
    if !is_underline(lines.get(title + 1), '=', expected) {
        return Err(ChangelogError::HeaderUnderlineMismatch {
            line: title + 2,
            expected,
        });
    }

    let headers = section_headers(lines, title + 2);
    if headers.is_empty() {
        return Err(ChangelogError::NoSectionsFound);
    }

    let mut last_version: Option<SemanticVersion> = None;
    for (k, header) in headers.iter().enumerate() {
        let header_line = lines[header.index];
        let expected = width(header_line);
        if !is_underline(lines.get(header.index + 1), '-', expected) {
            return Err(ChangelogError::SectionUnderlineMismatch {
                line: header.index + 2,
                section: strip_eol(header_line).to_string(),
                expected,
            });
        }

        let body_end = headers
            .get(k + 1)
            .map(|next| next.index)
            .unwrap_or(lines.len());
        check_subsections(&header.version, &lines[header.index + 2..body_end])?;

        let version = header.version.release();
        if let Some(previous) = last_version {
            if version.core() >= previous.core() {
                return Err(ChangelogError::NonMonotonicVersionOrder {
                    line: header.index + 1,
                    version: header.version.to_string(),
                    previous: previous.to_string(),
                });
            }
        }
        last_version = Some(version);
    }

    Ok(())
}

/// Validate a whole changelog document
pub fn validate_str(text: &str) -> Result<(), ChangelogError> {
    let lines: Vec<&str> = text.lines().collect();
    validate(&lines)
}

/// The newest section of a changelog, if any
pub fn latest_section(text: &str) -> Option<SectionHeader> {
    let lines: Vec<&str> = text.lines().collect();
    let start = find_title(&lines).map(|t| t + 2).unwrap_or(0);
    section_headers(&lines, start).into_iter().next()
}

fn section_block(version: &SemanticVersion, date: NaiveDate) -> String {
    let header = format!("{} ({})", version, date.format("%Y-%m-%d"));
    let mut block = format!("{}\n{}\n\n", header, "-".repeat(header.chars().count()));
    for marker in SUBSECTIONS {
        block.push_str(marker);
        block.push_str("\n\n");
    }
    block.push('\n');
    block
}

/// Record a version bump in the changelog text.
///
/// If the newest section is the snapshot of `new_version`, that section is
/// renamed to the release dated `date`. Otherwise a fresh section with empty
/// subsections is inserted above the newest one (or appended when the
/// changelog has no sections yet).
///
/// Returns `None` when `new_version` is not newer than the newest section,
/// since inserting it would break the section order.
pub fn record_bump(text: &str, new_version: &SemanticVersion, date: NaiveDate) -> Option<String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();

    match latest_section(text) {
        Some(top) if top.version.is_snapshot && top.version.release() == *new_version => {
            let header = format!("{} ({})", new_version, date.format("%Y-%m-%d"));
            let underline = "-".repeat(header.chars().count());
            let eol = if lines[top.index].ends_with("\r\n") { "\r\n" } else { "\n" };

            let old_width = width(&lines[top.index]);
            lines[top.index] = format!("{}{}", header, eol);
            if let Some(next) = lines.get_mut(top.index + 1) {
                let current = strip_eol(next);
                if width(current) == old_width && current.chars().all(|c| c == '-') {
                    *next = format!("{}{}", underline, eol);
                }
            }
            Some(lines.concat())
        }
        Some(top) if new_version.core() > top.version.core() => {
            lines.insert(top.index, section_block(new_version, date));
            Some(lines.concat())
        }
        Some(_) => None,
        None => {
            let mut out = text.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            if !out.is_empty() && !out.ends_with("\n\n") {
                out.push('\n');
            }
            out.push_str(&section_block(new_version, date));
            Some(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "=========
CHANGELOG
=========

1.0.0 (2020-01-01)
------------------
**Added**
x
**Fixed**
y
**Dependencies**
z
**Deprecated**
w
";

    fn section(version: &str, date: &str) -> String {
        let header = format!("{} ({})", version, date);
        format!(
            "{}\n{}\n\n**Added**\n\n**Fixed**\n\n**Dependencies**\n\n**Deprecated**\n\n",
            header,
            "-".repeat(header.len())
        )
    }

    fn document(sections: &[String]) -> String {
        format!(".. _changelog:\n\n=========\nCHANGELOG\n=========\n\nAll notable changes.\n\n{}", sections.concat())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_minimal_changelog_is_valid() {
        assert_eq!(validate_str(VALID), Ok(()));
    }

    #[test]
    fn test_label_and_description_are_allowed() {
        let doc = document(&[section("0.2.0", "2021-02-01"), section("0.1.0", "2021-01-01")]);
        assert_eq!(validate_str(&doc), Ok(()));
    }

    #[test]
    fn test_versions_must_decrease() {
        let ok = document(&[section("2.0.0", "2021-01-01"), section("1.0.0", "2020-01-01")]);
        assert!(validate_str(&ok).is_ok());

        let reversed = document(&[section("1.0.0", "2020-01-01"), section("2.0.0", "2021-01-01")]);
        assert!(matches!(
            validate_str(&reversed),
            Err(ChangelogError::NonMonotonicVersionOrder { .. })
        ));
    }

    #[test]
    fn test_equal_versions_are_not_monotonic() {
        let doc = document(&[section("1.0.0-SNAPSHOT", "2021-01-01"), section("1.0.0", "2020-01-01")]);
        assert!(matches!(
            validate_str(&doc),
            Err(ChangelogError::NonMonotonicVersionOrder { .. })
        ));
    }

    #[test]
    fn test_missing_subsection() {
        let doc = VALID.replace("**Dependencies**\n", "");
        assert_eq!(
            validate_str(&doc),
            Err(ChangelogError::SubsectionMissing {
                version: "1.0.0".to_string(),
                marker: "**Dependencies**".to_string(),
            })
        );
    }

    #[test]
    fn test_subsection_order() {
        let doc = VALID
            .replace("**Added**", "**TMP**")
            .replace("**Fixed**", "**Added**")
            .replace("**TMP**", "**Fixed**");
        assert!(matches!(
            validate_str(&doc),
            Err(ChangelogError::SubsectionOrderViolation { .. })
        ));
    }

    #[test]
    fn test_section_underline_length() {
        let doc = VALID.replace("------------------", "-----------------");
        assert!(matches!(
            validate_str(&doc),
            Err(ChangelogError::SectionUnderlineMismatch { line: 6, expected: 18, .. })
        ));
    }

    #[test]
    fn test_header_underline_length() {
        let doc = VALID.replacen("=========", "========", 1);
        assert!(matches!(
            validate_str(&doc),
            Err(ChangelogError::HeaderUnderlineMismatch { line: 1, expected: 9 })
        ));

        let doc = "CHANGELOG\n=========\n";
        assert!(matches!(
            validate_str(doc),
            Err(ChangelogError::HeaderUnderlineMismatch { .. })
        ));
    }

    #[test]
    fn test_title_underline_length() {
        let doc = VALID.replacen("=========\nCHANGELOG\n=========", "=========\nCHANGELOG\n========", 1);
        assert!(matches!(
            validate_str(&doc),
            Err(ChangelogError::HeaderUnderlineMismatch { line: 3, expected: 9 })
        ));
    }

    #[test]
    fn test_missing_title() {
        assert_eq!(validate_str("1.0.0 (2020-01-01)\n"), Err(ChangelogError::MissingTitle));
    }

    #[test]
    fn test_no_sections() {
        let doc = "=========\nCHANGELOG\n=========\n\nNothing yet.\n";
        assert_eq!(validate_str(doc), Err(ChangelogError::NoSectionsFound));
    }

    #[test]
    fn test_title_is_case_insensitive() {
        let doc = VALID.replace("CHANGELOG", "Changelog");
        assert!(validate_str(&doc).is_ok());
    }

    #[test]
    fn test_record_bump_inserts_new_section() {
        let doc = document(&[section("0.1.0", "2021-01-01")]);
        let bumped = record_bump(&doc, &SemanticVersion::snapshot(0, 2, 0), date(2021, 3, 4)).unwrap();

        let top = latest_section(&bumped).unwrap();
        assert_eq!(top.version, SemanticVersion::snapshot(0, 2, 0));
        assert_eq!(top.date, "2021-03-04");
        assert!(validate_str(&bumped).is_ok());
        assert!(bumped.contains("All notable changes."));
    }

    #[test]
    fn test_record_bump_releases_snapshot() {
        let doc = document(&[section("0.2.0-SNAPSHOT", "2021-02-01"), section("0.1.0", "2021-01-01")]);
        let bumped = record_bump(&doc, &SemanticVersion::new(0, 2, 0), date(2021, 3, 4)).unwrap();

        assert!(bumped.contains("0.2.0 (2021-03-04)\n------------------\n"));
        assert!(!bumped.contains("SNAPSHOT"));
        assert!(validate_str(&bumped).is_ok());
    }

    #[test]
    fn test_record_bump_into_empty_changelog() {
        let doc = "=========\nCHANGELOG\n=========\n";
        let bumped = record_bump(doc, &SemanticVersion::new(1, 0, 0), date(2022, 1, 1)).unwrap();
        assert!(validate_str(&bumped).is_ok());
    }

    #[test]
    fn test_record_bump_skips_versions_not_newer() {
        let doc = document(&[section("0.2.0", "2021-02-01"), section("0.1.0", "2021-01-01")]);
        let day = date(2021, 3, 4);

        assert_eq!(record_bump(&doc, &SemanticVersion::new(0, 1, 5), day), None);
        assert_eq!(record_bump(&doc, &SemanticVersion::new(0, 2, 0), day), None);
        assert_eq!(record_bump(&doc, &SemanticVersion::snapshot(0, 2, 0), day), None);
        assert!(record_bump(&doc, &SemanticVersion::new(0, 2, 1), day).is_some());
    }
}
