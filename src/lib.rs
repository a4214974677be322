#![forbid(unsafe_code)]
//! Rotaplan — génération et versionnement de plannings de magasin, en local (sans BD).
//!
//! - Entrées (effectif, gabarits, couverture, disponibilités, absences) en JSON.
//! - Affectation gloutonne par blocs de couverture, keyholders en tête.
//! - Versions numérotées immuables, copie-décalage depuis une version de base.
//! - Stockage fichier atomique ; toutes les dates en calendrier naïf.

pub mod engine;
pub mod inputs;
pub mod io;
pub mod model;
pub mod storage;
pub mod versioning;

pub use engine::{
    compile_requirements, day_index, AbsenceIndex, AvailabilityMap, GenerationOutcome, PlanError,
    RequirementBlock, ScheduleGenerator,
};
pub use inputs::{
    load_bundle_from_file, save_bundle_to_file, InputBundle, InputProvider, JsonInputProvider,
    PlanningInputs,
};
pub use model::{
    Absence, AbsenceKind, AvailabilityEntry, AvailabilityKind, CoverageRule, DateRange, Employee,
    EmployeeGroup, EmployeeId, EntryId, PlanStatus, RecurringCoveragePattern, ScheduleEntry,
    ShiftTemplate, ShiftType, TemplateId, VersionMeta,
};
pub use storage::{JsonStorage, PlanDocument, Storage};
pub use versioning::{EntryView, VersionStore, ENTRY_BATCH_SIZE};
