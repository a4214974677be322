use crate::model::PlanStatus;
use chrono::NaiveTime;
use thiserror::Error;

/// Bloc d'exigence de couverture concret pour une date donnée.
/// `max_employees` est transporté mais la sélection s'arrête à `min_employees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementBlock {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_employees: u16,
    pub max_employees: u16,
    pub requires_keyholder: bool,
}

/// Résultat d'une génération de planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub new_version: u32,
    pub status: PlanStatus,
    pub entry_count: usize,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid date range: {0}")]
    InvalidDateRange(&'static str),
    #[error("unknown version: {0}")]
    UnknownVersion(u32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
