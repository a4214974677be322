use super::types::RequirementBlock;
use super::util;
use crate::model::{CoverageRule, RecurringCoveragePattern};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Déplie règles fixes et motifs récurrents en blocs d'exigence concrets par date.
///
/// Les blocs ne sont ni fusionnés ni dédupliqués : deux fenêtres qui se
/// chevauchent sur la même date exigent chacune leur effectif.
pub fn compile_requirements(
    rules: &[CoverageRule],
    patterns: &[RecurringCoveragePattern],
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<RequirementBlock>> {
    let mut out: BTreeMap<NaiveDate, Vec<RequirementBlock>> = BTreeMap::new();

    for date in util::days_inclusive(start, end) {
        let index = util::day_index(date);
        let mut blocks = Vec::new();

        for rule in rules.iter().filter(|r| r.day_index == index) {
            blocks.push(RequirementBlock {
                start_time: rule.start_time,
                end_time: rule.end_time,
                min_employees: rule.min_employees,
                max_employees: rule.max_employees,
                requires_keyholder: rule.requires_keyholder,
            });
        }

        for pattern in patterns.iter().filter(|p| p.is_active) {
            if !pattern_covers(pattern, date) {
                continue;
            }
            if !pattern.days.contains(&index) {
                continue;
            }
            blocks.push(RequirementBlock {
                start_time: pattern.start_time,
                end_time: pattern.end_time,
                min_employees: pattern.min_employees,
                max_employees: pattern.max_employees,
                requires_keyholder: pattern.requires_keyholder,
            });
        }

        if !blocks.is_empty() {
            out.insert(date, blocks);
        }
    }

    out
}

fn pattern_covers(pattern: &RecurringCoveragePattern, date: NaiveDate) -> bool {
    if let Some(from) = pattern.valid_from {
        if date < from {
            return false;
        }
    }
    if let Some(until) = pattern.valid_until {
        if date > until {
            return false;
        }
    }
    true
}
