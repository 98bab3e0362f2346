//! Version suggestion heuristic for pre-filling new reports.
//!
//! The suggestion is advisory: whatever the client submits wins. All
//! functions here are total over arbitrary report history, including
//! malformed release text.

use serde::Serialize;

/// Versioning fields of one historical report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFields {
    pub id: i32,
    pub sprint_number: i32,
    pub cycle_number: i32,
    pub release_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSuggestion {
    pub sprint_number: i32,
    pub cycle_number: i32,
    pub release_number: String,
}

pub const DEFAULT_RELEASE: &str = "1.0";

impl VersionSuggestion {
    /// Starting values for a project with no reports.
    pub fn defaults() -> Self {
        Self {
            sprint_number: 1,
            cycle_number: 1,
            release_number: DEFAULT_RELEASE.to_string(),
        }
    }
}

/// Parse "major.minor" release text for ordering. Anything malformed
/// compares as `(1, 0)`.
pub fn parse_release(release: &str) -> (i64, i64) {
    let mut parts = release.split('.');
    let major = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    let minor = match parts.next() {
        Some(p) => p.trim().parse::<i64>().ok(),
        None => Some(0),
    };
    match (major, minor) {
        (Some(major), Some(minor)) => (major, minor),
        _ => (1, 0),
    }
}

/// Bump the minor component of "major.minor" text. Malformed input
/// falls back to "1.1".
pub fn increment_release(release: &str) -> String {
    let (major, minor) = match parse_release_strict(release) {
        Some(parsed) => parsed,
        None => return "1.1".to_string(),
    };
    format!("{}.{}", major, minor + 1)
}

fn parse_release_strict(release: &str) -> Option<(i64, i64)> {
    let mut parts = release.split('.');
    let major = parts.next()?.trim().parse::<i64>().ok()?;
    let minor = match parts.next() {
        Some(p) => p.trim().parse::<i64>().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// The report the suggestion is measured against: among the max-sprint
/// reports, the one with the highest cycle; latest id wins ties.
pub fn reference_report(history: &[VersionFields]) -> Option<&VersionFields> {
    let max_sprint = history.iter().map(|r| r.sprint_number).max()?;
    history
        .iter()
        .filter(|r| r.sprint_number == max_sprint)
        .max_by_key(|r| (r.cycle_number, r.id))
}

/// Suggest sprint/cycle/release for the next report of a project, given
/// its full report history (any order; ids define creation order).
pub fn suggest_next_version(history: &[VersionFields]) -> VersionSuggestion {
    let Some(latest) = history.iter().max_by_key(|r| r.id) else {
        return VersionSuggestion::defaults();
    };

    let max_sprint = history.iter().map(|r| r.sprint_number).max().unwrap_or(1);

    let reference = reference_report(history).unwrap_or(latest);

    let previous = history
        .iter()
        .filter(|r| r.id != latest.id)
        .max_by_key(|r| r.id);

    let max_sprint_release = history
        .iter()
        .filter(|r| r.sprint_number == max_sprint)
        .min_by_key(|r| r.id)
        .and_then(|r| r.release_number.clone());

    suggest_from(reference, previous, max_sprint, max_sprint_release)
}

fn release_or_default(release: &Option<String>) -> String {
    release
        .clone()
        .unwrap_or_else(|| DEFAULT_RELEASE.to_string())
}

fn suggest_from(
    reference: &VersionFields,
    previous: Option<&VersionFields>,
    max_sprint: i32,
    max_sprint_release: Option<String>,
) -> VersionSuggestion {
    let current_release = release_or_default(&reference.release_number);

    let Some(previous) = previous else {
        // Single report: advance the sprint, reuse its release.
        return VersionSuggestion {
            sprint_number: reference.sprint_number + 1,
            cycle_number: 1,
            release_number: current_release,
        };
    };

    let previous_release = release_or_default(&previous.release_number);

    if reference.sprint_number == previous.sprint_number {
        // Same sprint: next cycle, keep the sprint's original release.
        VersionSuggestion {
            sprint_number: reference.sprint_number,
            cycle_number: reference.cycle_number + 1,
            release_number: previous_release,
        }
    } else if reference.sprint_number > previous.sprint_number {
        // Sprint advanced: bump the release minor only if the release
        // also moved between the two reports.
        let release_number = if parse_release(&current_release) > parse_release(&previous_release) {
            increment_release(&current_release)
        } else {
            previous_release
        };
        VersionSuggestion {
            sprint_number: reference.sprint_number + 1,
            cycle_number: 1,
            release_number,
        }
    } else {
        // Anomalous history (reference behind the previous report):
        // jump past the highest sprint seen.
        VersionSuggestion {
            sprint_number: max_sprint + 1,
            cycle_number: 1,
            release_number: max_sprint_release.unwrap_or(current_release),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: i32, sprint: i32, cycle: i32, release: &str) -> VersionFields {
        VersionFields {
            id,
            sprint_number: sprint,
            cycle_number: cycle,
            release_number: Some(release.to_string()),
        }
    }

    #[test]
    fn test_empty_history_returns_defaults() {
        assert_eq!(
            suggest_next_version(&[]),
            VersionSuggestion {
                sprint_number: 1,
                cycle_number: 1,
                release_number: "1.0".to_string(),
            }
        );
    }

    #[test]
    fn test_single_report_advances_sprint_and_reuses_release() {
        let history = [report(1, 3, 1, "1.0")];
        assert_eq!(
            suggest_next_version(&history),
            VersionSuggestion {
                sprint_number: 4,
                cycle_number: 1,
                release_number: "1.0".to_string(),
            }
        );
    }

    #[test]
    fn test_same_sprint_increments_cycle() {
        let history = [report(1, 2, 1, "1.0"), report(2, 2, 2, "1.0")];
        assert_eq!(
            suggest_next_version(&history),
            VersionSuggestion {
                sprint_number: 2,
                cycle_number: 3,
                release_number: "1.0".to_string(),
            }
        );
    }

    #[test]
    fn test_sprint_advance_without_release_change_keeps_release() {
        let history = [report(1, 2, 2, "1.4"), report(2, 3, 1, "1.4")];
        assert_eq!(
            suggest_next_version(&history),
            VersionSuggestion {
                sprint_number: 4,
                cycle_number: 1,
                release_number: "1.4".to_string(),
            }
        );
    }

    #[test]
    fn test_sprint_advance_with_release_change_bumps_minor() {
        let history = [report(1, 2, 2, "1.4"), report(2, 3, 1, "1.5")];
        assert_eq!(
            suggest_next_version(&history),
            VersionSuggestion {
                sprint_number: 4,
                cycle_number: 1,
                release_number: "1.6".to_string(),
            }
        );
    }

    #[test]
    fn test_reference_is_highest_cycle_in_highest_sprint() {
        // Latest-created report is a backfill of an older sprint; the
        // sprint 5 / cycle 2 report stays the reference.
        let history = [
            report(1, 5, 1, "2.0"),
            report(2, 5, 2, "2.0"),
            report(3, 5, 2, "2.0"),
            report(4, 4, 9, "1.9"),
        ];
        let suggestion = suggest_next_version(&history);
        assert_eq!(suggestion.sprint_number, 5);
        assert_eq!(suggestion.cycle_number, 3);
    }

    #[test]
    fn test_anomalous_history_jumps_past_max_sprint() {
        let reference = report(9, 3, 1, "1.2");
        let previous = report(8, 6, 1, "1.5");
        let suggestion = suggest_from(&reference, Some(&previous), 6, Some("1.5".to_string()));
        assert_eq!(
            suggestion,
            VersionSuggestion {
                sprint_number: 7,
                cycle_number: 1,
                release_number: "1.5".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_release_falls_back_to_default() {
        let history = [VersionFields {
            id: 1,
            sprint_number: 1,
            cycle_number: 1,
            release_number: None,
        }];
        assert_eq!(suggest_next_version(&history).release_number, "1.0");
    }

    #[test]
    fn test_parse_release_handles_malformed_text() {
        assert_eq!(parse_release("2.7"), (2, 7));
        assert_eq!(parse_release("3"), (3, 0));
        assert_eq!(parse_release("v2.beta"), (1, 0));
        assert_eq!(parse_release(""), (1, 0));
        assert_eq!(parse_release("1.2.3"), (1, 2));
    }

    #[test]
    fn test_increment_release_bumps_minor_or_falls_back() {
        assert_eq!(increment_release("1.4"), "1.5");
        assert_eq!(increment_release("3"), "3.1");
        assert_eq!(increment_release("garbage"), "1.1");
    }
}
