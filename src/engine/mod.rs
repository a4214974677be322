mod absence;
mod assignment;
mod availability;
mod coverage;
mod types;
mod util;

pub use absence::AbsenceIndex;
pub use availability::AvailabilityMap;
pub use coverage::compile_requirements;
pub use types::{GenerationOutcome, PlanError, RequirementBlock};
pub use util::day_index;

use crate::inputs::PlanningInputs;
use crate::model::ScheduleEntry;
use chrono::NaiveDate;

/// Pipeline de génération : agrégation → résolution → compilation → affectation.
/// L'attribution du numéro de version et la persistance relèvent du
/// gestionnaire de versions (`versioning`).
#[derive(Debug)]
pub struct ScheduleGenerator<'a> {
    inputs: &'a PlanningInputs,
}

impl<'a> ScheduleGenerator<'a> {
    pub fn new(inputs: &'a PlanningInputs) -> Self {
        Self { inputs }
    }

    /// Produit les entrées de planning pour `[start, end]` sous le numéro `version`.
    pub fn run(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        version: u32,
    ) -> Result<Vec<ScheduleEntry>, PlanError> {
        if end < start {
            return Err(PlanError::InvalidDateRange("end must not precede start"));
        }

        let availability = AvailabilityMap::resolve(&self.inputs.availability, start, end);
        let absences = AbsenceIndex::build(&self.inputs.absences, start, end);
        let requirements = compile_requirements(
            &self.inputs.coverage_rules,
            &self.inputs.coverage_patterns,
            start,
            end,
        );

        let mut entries = Vec::new();
        for (date, blocks) in requirements {
            entries.extend(assignment::assign_day(
                date,
                blocks,
                &self.inputs.employees,
                &self.inputs.shift_templates,
                &absences,
                &availability,
                version,
            ));
        }
        Ok(entries)
    }
}
