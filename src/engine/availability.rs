use super::util;
use crate::model::{AvailabilityEntry, AvailabilityKind, EmployeeId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Table de disponibilité résolue : employé → date → heure → type.
///
/// Les entrées récurrentes s'appliquent à chaque date de la période dont le
/// jour de semaine correspond ; les entrées datées s'appliquent à
/// l'intersection de leur propre fenêtre et de la période demandée.
/// Une entrée datée écrase une entrée récurrente pour le même créneau.
#[derive(Debug, Default)]
pub struct AvailabilityMap {
    slots: HashMap<EmployeeId, BTreeMap<NaiveDate, BTreeMap<u8, AvailabilityKind>>>,
}

impl AvailabilityMap {
    pub fn resolve(entries: &[AvailabilityEntry], start: NaiveDate, end: NaiveDate) -> Self {
        let mut map = Self::default();
        let dates = util::days_inclusive(start, end);

        // Passe 1 : récurrentes. Passe 2 : datées, qui écrasent le créneau.
        for entry in entries.iter().filter(|e| e.is_recurring) {
            for date in &dates {
                if util::day_index(*date) == entry.day_of_week {
                    map.set(entry, *date);
                }
            }
        }
        for entry in entries.iter().filter(|e| !e.is_recurring) {
            for date in &dates {
                if util::day_index(*date) != entry.day_of_week {
                    continue;
                }
                if !window_contains(entry, *date) {
                    continue;
                }
                map.set(entry, *date);
            }
        }
        map
    }

    fn set(&mut self, entry: &AvailabilityEntry, date: NaiveDate) {
        self.slots
            .entry(entry.employee_id.clone())
            .or_default()
            .entry(date)
            .or_default()
            .insert(entry.hour, entry.kind);
    }

    pub fn lookup(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
        hour: u8,
    ) -> Option<AvailabilityKind> {
        self.slots
            .get(employee)
            .and_then(|days| days.get(&date))
            .and_then(|hours| hours.get(&hour))
            .copied()
    }

    /// Nombre total de créneaux résolus.
    pub fn slot_count(&self) -> usize {
        self.slots
            .values()
            .flat_map(|days| days.values())
            .map(|hours| hours.len())
            .sum()
    }
}

fn window_contains(entry: &AvailabilityEntry, date: NaiveDate) -> bool {
    if let Some(from) = entry.valid_from {
        if date < from {
            return false;
        }
    }
    if let Some(until) = entry.valid_until {
        if date > until {
            return false;
        }
    }
    true
}
