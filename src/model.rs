use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour ShiftTemplate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour ScheduleEntry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Catégorie contractuelle d'un employé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeGroup {
    FullTime,
    PartTime,
    MiniJob,
    TeamLead,
}

/// Employé du magasin (instantané en lecture seule pendant une génération)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub group: EmployeeGroup,
    pub contracted_hours: f32,
    #[serde(default)]
    pub is_keyholder: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Employee {
    pub fn new<N: Into<String>>(name: N, group: EmployeeGroup, contracted_hours: f32) -> Self {
        Self {
            id: EmployeeId::random(),
            name: name.into(),
            group,
            contracted_hours,
            is_keyholder: false,
            is_active: true,
        }
    }
}

/// Type de créneau (ouverture, milieu, fermeture)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftType {
    Early,
    Middle,
    Late,
}

/// Gabarit de créneau horaire (entrée en lecture seule pour la génération)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: TemplateId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub requires_break: bool,
    pub shift_type: ShiftType,
    #[serde(default)]
    pub active_days: Vec<u8>,
}

impl ShiftTemplate {
    /// Durée en heures (gère le passage minuit).
    pub fn duration_hours(&self) -> f32 {
        let mut secs = self
            .end_time
            .signed_duration_since(self.start_time)
            .num_seconds();
        if secs <= 0 {
            secs += 24 * 60 * 60;
        }
        secs as f32 / 3600.0
    }
}

/// Règle de couverture hebdomadaire fixe (day_index : 0=lundi..6=dimanche)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRule {
    pub day_index: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_employees: u16,
    pub max_employees: u16,
    #[serde(default)]
    pub requires_keyholder: bool,
}

/// Motif de couverture récurrent sur un ensemble de jours, avec fenêtre de validité optionnelle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCoveragePattern {
    pub name: String,
    pub days: Vec<u8>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub min_employees: u16,
    pub max_employees: u16,
    #[serde(default)]
    pub requires_keyholder: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

/// Type de disponibilité déclarée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityKind {
    Available,
    Fixed,
    Preferred,
    Unavailable,
}

/// Disponibilité d'un employé pour une heure d'un jour de semaine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub employee_id: EmployeeId,
    pub day_of_week: u8,
    pub hour: u8,
    pub kind: AvailabilityKind,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

/// Motif d'absence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceKind {
    Vacation,
    Sick,
    Custom(String),
}

/// Absence d'un employé sur un intervalle de dates inclusif
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: AbsenceKind,
}

impl Absence {
    /// Crée une absence en validant que `end_date >= start_date`.
    pub fn new(
        employee_id: EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: AbsenceKind,
    ) -> Result<Self, String> {
        if end_date < start_date {
            return Err("absence end_date must not precede start_date".to_string());
        }
        Ok(Self {
            employee_id,
            start_date,
            end_date,
            kind,
        })
    }
}

/// Statut partagé par les versions et leurs entrées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Draft,
    Published,
    Archived,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Published => "published",
            PlanStatus::Archived => "archived",
        }
    }
}

/// Intervalle de dates inclusif
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Entrée de planning produite par le moteur d'affectation (ou copiée d'une version de base).
/// Jamais modifiée champ par champ après création, hormis `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub employee_id: EmployeeId,
    pub shift_id: Option<TemplateId>,
    pub date: NaiveDate,
    pub version: u32,
    pub status: PlanStatus,
    #[serde(default)]
    pub break_start: Option<NaiveTime>,
    #[serde(default)]
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleEntry {
    pub fn new(
        employee_id: EmployeeId,
        shift_id: Option<TemplateId>,
        date: NaiveDate,
        version: u32,
    ) -> Self {
        Self {
            id: EntryId::random(),
            employee_id,
            shift_id,
            date,
            version,
            status: PlanStatus::Draft,
            break_start: None,
            break_end: None,
            notes: None,
        }
    }
}

/// Métadonnées d'une version de planning (instantané immuable numéroté)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMeta {
    pub version: u32,
    pub status: PlanStatus,
    pub date_range: DateRange,
    #[serde(default)]
    pub base_version: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl VersionMeta {
    pub fn new(
        version: u32,
        date_range: DateRange,
        base_version: Option<u32>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            version,
            status: PlanStatus::Draft,
            date_range,
            base_version,
            notes,
            created_at: now,
            created_by: None,
            updated_at: now,
            updated_by: None,
        }
    }
}
