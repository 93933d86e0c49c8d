// crates/core/src/cohort.rs
//! Resolve a (mode, cohort spec) pair into concrete person ids.

use skillradar_types::{CohortSpec, Mode, Person};
use tracing::{debug, warn};

/// Parse the wire pair (`cohort_type`, `cohort_key`) into a [`CohortSpec`].
///
/// Unknown types fall back to `All`. That is a documented permissive
/// default, not an error: the UI sends free strings and an exec demo must
/// not blank out over a typo.
pub fn spec_from_parts(cohort_type: &str, cohort_key: &str) -> CohortSpec {
    match cohort_type {
        "All" => CohortSpec::All,
        "Region" => CohortSpec::Region(cohort_key.to_string()),
        "Person" => CohortSpec::Person(cohort_key.to_string()),
        other => {
            warn!("unknown cohort type {other:?}, defaulting to All");
            CohortSpec::All
        }
    }
}

/// Person ids in `mode`'s org unit matching `spec`.
///
/// `Person` with an empty key yields an empty cohort; downstream stages
/// handle empty cohorts with documented placeholders rather than erroring.
pub fn select_cohort(people: &[Person], mode: Mode, spec: &CohortSpec) -> Vec<String> {
    let unit = mode.org_unit_name();
    let in_mode = people.iter().filter(|p| p.org_unit == unit);

    let ids: Vec<String> = match spec {
        CohortSpec::All => in_mode.map(|p| p.person_id.clone()).collect(),
        CohortSpec::Region(region) => in_mode
            .filter(|p| &p.region == region)
            .map(|p| p.person_id.clone())
            .collect(),
        CohortSpec::Person(id) => {
            if id.is_empty() {
                Vec::new()
            } else {
                vec![id.clone()]
            }
        }
    };
    debug!(mode = %mode, cohort = ids.len(), "cohort selected");
    ids
}

/// Distinct, sorted regions present in `mode`'s org unit. Feeds the
/// region picker.
pub fn regions_for_mode(people: &[Person], mode: Mode) -> Vec<String> {
    let unit = mode.org_unit_name();
    let mut regions: Vec<String> = people
        .iter()
        .filter(|p| p.org_unit == unit && !p.region.is_empty())
        .map(|p| p.region.clone())
        .collect();
    regions.sort();
    regions.dedup();
    regions
}
