use crate::model::{
    Absence, AvailabilityEntry, CoverageRule, Employee, RecurringCoveragePattern, ShiftTemplate,
};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Collaborateurs externes consultés en lecture instantanée.
/// Aucun abonnement : chaque appel renvoie l'état au moment de l'appel.
pub trait InputProvider {
    /// Effectif actif au moment de l'appel.
    fn active_employees(&self) -> Result<Vec<Employee>>;
    fn shift_templates(&self) -> Result<Vec<ShiftTemplate>>;
    fn coverage_rules(&self) -> Result<Vec<CoverageRule>>;
    fn coverage_patterns(&self) -> Result<Vec<RecurringCoveragePattern>>;
    /// Disponibilités chevauchant `[start, end]`.
    fn availability_in(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityEntry>>;
    /// Absences chevauchant `[start, end]`.
    fn absences_in(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Absence>>;
}

/// Instantané agrégé des entrées d'une génération.
#[derive(Debug, Clone, Default)]
pub struct PlanningInputs {
    pub employees: Vec<Employee>,
    pub shift_templates: Vec<ShiftTemplate>,
    pub coverage_rules: Vec<CoverageRule>,
    pub coverage_patterns: Vec<RecurringCoveragePattern>,
    pub availability: Vec<AvailabilityEntry>,
    pub absences: Vec<Absence>,
}

impl PlanningInputs {
    /// Agrège toutes les sources pour la période demandée.
    pub fn gather(provider: &dyn InputProvider, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Ok(Self {
            employees: provider.active_employees()?,
            shift_templates: provider.shift_templates()?,
            coverage_rules: provider.coverage_rules()?,
            coverage_patterns: provider.coverage_patterns()?,
            availability: provider.availability_in(start, end)?,
            absences: provider.absences_in(start, end)?,
        })
    }
}

/// Jeu de données complet tel que stocké sur disque (JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBundle {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub shift_templates: Vec<ShiftTemplate>,
    #[serde(default)]
    pub coverage_rules: Vec<CoverageRule>,
    #[serde(default)]
    pub coverage_patterns: Vec<RecurringCoveragePattern>,
    #[serde(default)]
    pub availability: Vec<AvailabilityEntry>,
    #[serde(default)]
    pub absences: Vec<Absence>,
}

impl InputBundle {
    pub fn validate(&self) -> Result<()> {
        for rule in &self.coverage_rules {
            if rule.day_index > 6 {
                bail!("coverage rule day_index out of range: {}", rule.day_index);
            }
            if rule.end_time <= rule.start_time {
                bail!("coverage rule end_time must be after start_time");
            }
            if rule.max_employees < rule.min_employees {
                bail!("coverage rule max_employees below min_employees");
            }
        }
        for pattern in &self.coverage_patterns {
            if pattern.name.trim().is_empty() {
                bail!("coverage pattern name cannot be empty");
            }
            if let Some(day) = pattern.days.iter().find(|d| **d > 6) {
                bail!("coverage pattern {} day out of range: {day}", pattern.name);
            }
            if pattern.end_time <= pattern.start_time {
                bail!(
                    "coverage pattern {} end_time must be after start_time",
                    pattern.name
                );
            }
            if pattern.max_employees < pattern.min_employees {
                bail!(
                    "coverage pattern {} max_employees below min_employees",
                    pattern.name
                );
            }
            if let (Some(from), Some(until)) = (pattern.valid_from, pattern.valid_until) {
                if until < from {
                    bail!("coverage pattern {} validity window inverted", pattern.name);
                }
            }
        }
        for entry in &self.availability {
            if entry.day_of_week > 6 {
                bail!("availability day_of_week out of range: {}", entry.day_of_week);
            }
            if entry.hour > 23 {
                bail!("availability hour out of range: {}", entry.hour);
            }
        }
        for absence in &self.absences {
            if absence.end_date < absence.start_date {
                bail!("absence end_date must not precede start_date");
            }
        }
        Ok(())
    }
}

pub fn load_bundle_from_file<P: AsRef<Path>>(path: P) -> Result<InputBundle> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bundle: InputBundle = serde_json::from_slice(&data)
        .with_context(|| format!("parsing input bundle {}", path.display()))?;
    bundle.validate()?;
    Ok(bundle)
}

pub fn save_bundle_to_file<P: AsRef<Path>>(path: P, bundle: &InputBundle) -> Result<()> {
    bundle.validate()?;
    let json = serde_json::to_string_pretty(bundle)?;
    fs::write(&path, json)?;
    Ok(())
}

/// Fournisseur adossé à un fichier JSON unique, chargé et validé à l'ouverture.
#[derive(Debug, Clone)]
pub struct JsonInputProvider {
    bundle: InputBundle,
}

impl JsonInputProvider {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            bundle: load_bundle_from_file(path)?,
        })
    }

    pub fn from_bundle(bundle: InputBundle) -> Result<Self> {
        bundle.validate()?;
        Ok(Self { bundle })
    }
}

impl InputProvider for JsonInputProvider {
    fn active_employees(&self) -> Result<Vec<Employee>> {
        Ok(self
            .bundle
            .employees
            .iter()
            .filter(|e| e.is_active)
            .cloned()
            .collect())
    }

    fn shift_templates(&self) -> Result<Vec<ShiftTemplate>> {
        Ok(self.bundle.shift_templates.clone())
    }

    fn coverage_rules(&self) -> Result<Vec<CoverageRule>> {
        Ok(self.bundle.coverage_rules.clone())
    }

    fn coverage_patterns(&self) -> Result<Vec<RecurringCoveragePattern>> {
        Ok(self.bundle.coverage_patterns.clone())
    }

    fn availability_in(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityEntry>> {
        Ok(self
            .bundle
            .availability
            .iter()
            .filter(|a| a.is_recurring || window_overlaps(a.valid_from, a.valid_until, start, end))
            .cloned()
            .collect())
    }

    fn absences_in(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Absence>> {
        Ok(self
            .bundle
            .absences
            .iter()
            .filter(|a| a.start_date <= end && a.end_date >= start)
            .cloned()
            .collect())
    }
}

fn window_overlaps(
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
    start: NaiveDate,
    end: NaiveDate,
) -> bool {
    from.map_or(true, |f| f <= end) && until.map_or(true, |u| u >= start)
}
