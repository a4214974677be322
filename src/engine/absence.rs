use super::util;
use crate::model::{Absence, EmployeeId};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Index d'absences : employé → ensemble de dates absentes.
/// Chaque intervalle `[start_date, end_date]` inclusif est déplié jour par jour,
/// borné à la période demandée.
#[derive(Debug, Default)]
pub struct AbsenceIndex {
    days: HashMap<EmployeeId, BTreeSet<NaiveDate>>,
}

impl AbsenceIndex {
    pub fn build(absences: &[Absence], start: NaiveDate, end: NaiveDate) -> Self {
        let mut index = Self::default();
        for absence in absences {
            let from = absence.start_date.max(start);
            let until = absence.end_date.min(end);
            if until < from {
                continue;
            }
            let set = index.days.entry(absence.employee_id.clone()).or_default();
            for date in util::days_inclusive(from, until) {
                set.insert(date);
            }
        }
        index
    }

    pub fn is_absent(&self, employee: &EmployeeId, date: NaiveDate) -> bool {
        self.days
            .get(employee)
            .map(|set| set.contains(&date))
            .unwrap_or(false)
    }

    pub fn absent_dates(&self, employee: &EmployeeId) -> Option<&BTreeSet<NaiveDate>> {
        self.days.get(employee)
    }
}
