use super::absence::AbsenceIndex;
use super::availability::AvailabilityMap;
use super::types::RequirementBlock;
use crate::model::{Employee, EmployeeId, ScheduleEntry, ShiftTemplate};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Affecte les employés aux blocs d'une date. Aucun état ne traverse les dates,
/// hormis le numéro de version en cours d'écriture.
///
/// Politique volontairement gloutonne et non optimisante : blocs triés par
/// (start, end), premiers `min_employees` éligibles retenus (jamais plus,
/// même si `max_employees` le permettrait), sous-effectif silencieux.
/// La disponibilité horaire n'est pas consultée lors de la sélection.
pub(super) fn assign_day(
    date: NaiveDate,
    mut blocks: Vec<RequirementBlock>,
    employees: &[Employee],
    templates: &[ShiftTemplate],
    absences: &AbsenceIndex,
    _availability: &AvailabilityMap,
    version: u32,
) -> Vec<ScheduleEntry> {
    blocks.sort_by(|a, b| (a.start_time, a.end_time).cmp(&(b.start_time, b.end_time)));

    let mut assigned: HashSet<EmployeeId> = HashSet::new();
    let mut entries = Vec::new();

    for block in &blocks {
        let mut eligible: Vec<&Employee> = employees
            .iter()
            .filter(|e| {
                e.is_active
                    && !assigned.contains(&e.id)
                    && !absences.is_absent(&e.id, date)
                    && (!block.requires_keyholder || e.is_keyholder)
            })
            .collect();

        if block.requires_keyholder {
            // tri stable : keyholders d'abord, ordre d'origine sinon
            eligible.sort_by_key(|e| !e.is_keyholder);
        }

        let template = templates
            .iter()
            .find(|t| t.start_time == block.start_time && t.end_time == block.end_time);

        for employee in eligible.into_iter().take(usize::from(block.min_employees)) {
            entries.push(ScheduleEntry::new(
                employee.id.clone(),
                template.map(|t| t.id.clone()),
                date,
                version,
            ));
            assigned.insert(employee.id.clone());
        }
        // moins de min_employees éligibles → bloc en sous-effectif, sans erreur ni marqueur
    }

    entries
}
