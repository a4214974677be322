use crate::engine::{GenerationOutcome, PlanError, ScheduleGenerator};
use crate::inputs::PlanningInputs;
use crate::model::{
    DateRange, Employee, EntryId, PlanStatus, ScheduleEntry, ShiftTemplate, VersionMeta,
};
use crate::storage::{PlanDocument, Storage};
use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Utc};

/// Taille des lots d'insertion d'entrées. Chaque lot est une écriture à part
/// entière : un lot qui échoue laisse les lots précédents (et la meta) commis.
pub const ENTRY_BATCH_SIZE: usize = 200;

/// Entrée enrichie pour la consultation (nom d'employé, horaires du gabarit).
#[derive(Debug, Clone)]
pub struct EntryView {
    pub entry: ScheduleEntry,
    pub employee_name: String,
    pub shift_start: Option<NaiveTime>,
    pub shift_end: Option<NaiveTime>,
}

/// Gestionnaire de versions : alloue les numéros, commet meta + entrées,
/// copie-décale depuis une version de base. Le support de stockage est
/// injecté, jamais global.
pub struct VersionStore<S: Storage> {
    storage: S,
    doc: PlanDocument,
}

impl<S: Storage> VersionStore<S> {
    pub fn open(storage: S) -> Result<Self, PlanError> {
        let doc = storage.load()?;
        Ok(Self { storage, doc })
    }

    /// Toutes les versions, numéro décroissant.
    pub fn versions(&self) -> Vec<VersionMeta> {
        let mut out = self.doc.versions.clone();
        out.sort_by(|a, b| b.version.cmp(&a.version));
        out
    }

    pub fn meta(&self, version: u32) -> Result<&VersionMeta, PlanError> {
        self.doc
            .versions
            .iter()
            .find(|m| m.version == version)
            .ok_or(PlanError::UnknownVersion(version))
    }

    /// max(existants) + 1, ou 1. Calculé et consommé dans la même mutation du
    /// document : l'allocation et l'insertion partent dans une seule écriture
    /// atomique, jamais en deux lectures séparées.
    fn next_version(&self) -> u32 {
        self.doc
            .versions
            .iter()
            .map(|m| m.version)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Exécute le pipeline complet et commet la nouvelle version (statut Draft).
    pub fn generate(
        &mut self,
        inputs: &PlanningInputs,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<GenerationOutcome, PlanError> {
        if end < start {
            return Err(PlanError::InvalidDateRange("end must not precede start"));
        }
        let version = self.next_version();
        let entries = ScheduleGenerator::new(inputs).run(start, end, version)?;
        let meta = VersionMeta::new(version, DateRange { start, end }, None, None);
        let status = meta.status;
        let entry_count = self.commit_version(meta, entries)?;
        Ok(GenerationOutcome {
            new_version: version,
            status,
            entry_count,
        })
    }

    /// Crée une version, vide ou copiée d'une version de base avec décalage de
    /// dates de `start − base.date_range.start`. Les champs employé/gabarit/
    /// pause/notes sont conservés, le statut revient à Draft.
    pub fn create_version(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        base_version: Option<u32>,
        notes: Option<String>,
    ) -> Result<VersionMeta, PlanError> {
        if end <= start {
            return Err(PlanError::InvalidDateRange("end must be after start"));
        }
        let base_meta = match base_version {
            Some(base) => Some(self.meta(base)?.clone()),
            None => None,
        };
        let version = self.next_version();

        let entries = match &base_meta {
            Some(base) => {
                let offset = start.signed_duration_since(base.date_range.start);
                let mut copies = Vec::new();
                for entry in self.doc.entries.iter().filter(|e| e.version == base.version) {
                    let date = entry
                        .date
                        .checked_add_signed(offset)
                        .context("date overflow while shifting copied entries")?;
                    copies.push(ScheduleEntry {
                        id: EntryId::random(),
                        employee_id: entry.employee_id.clone(),
                        shift_id: entry.shift_id.clone(),
                        date,
                        version,
                        status: PlanStatus::Draft,
                        break_start: entry.break_start,
                        break_end: entry.break_end,
                        notes: entry.notes.clone(),
                    });
                }
                copies
            }
            None => Vec::new(),
        };

        let meta = VersionMeta::new(version, DateRange { start, end }, base_version, notes);
        self.commit_version(meta.clone(), entries)?;
        Ok(meta)
    }

    /// Écrase le statut sans précondition (publier une version vide est permis).
    pub fn set_status(&mut self, version: u32, status: PlanStatus) -> Result<(), PlanError> {
        let meta = self
            .doc
            .versions
            .iter_mut()
            .find(|m| m.version == version)
            .ok_or(PlanError::UnknownVersion(version))?;
        meta.status = status;
        meta.updated_at = Utc::now();
        self.storage.save(&self.doc)?;
        Ok(())
    }

    pub fn entry_count(&self, version: u32) -> usize {
        self.doc
            .entries
            .iter()
            .filter(|e| e.version == version)
            .count()
    }

    /// Entrées d'une version, triées par date.
    pub fn entries_for(&self, version: u32) -> Result<Vec<&ScheduleEntry>, PlanError> {
        self.meta(version)?;
        let mut out: Vec<&ScheduleEntry> = self
            .doc
            .entries
            .iter()
            .filter(|e| e.version == version)
            .collect();
        out.sort_by_key(|e| e.date);
        Ok(out)
    }

    /// Entrées enrichies du nom d'employé et des horaires du gabarit.
    pub fn entry_views(
        &self,
        version: u32,
        employees: &[Employee],
        templates: &[ShiftTemplate],
    ) -> Result<Vec<EntryView>, PlanError> {
        let entries = self.entries_for(version)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let employee_name = employees
                    .iter()
                    .find(|e| e.id == entry.employee_id)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| entry.employee_id.as_str().to_string());
                let template = entry
                    .shift_id
                    .as_ref()
                    .and_then(|id| templates.iter().find(|t| &t.id == id));
                EntryView {
                    entry: entry.clone(),
                    employee_name,
                    shift_start: template.map(|t| t.start_time),
                    shift_end: template.map(|t| t.end_time),
                }
            })
            .collect())
    }

    /// La meta part seule dans la première écriture, puis les entrées par lots.
    /// Après une écriture en échec, le document en mémoire reste le reflet du
    /// dernier état persisté : la meta ou le lot refusé est retiré avant de
    /// propager l'erreur.
    fn commit_version(
        &mut self,
        meta: VersionMeta,
        entries: Vec<ScheduleEntry>,
    ) -> Result<usize, PlanError> {
        self.doc.versions.push(meta);
        if let Err(err) = self.storage.save(&self.doc) {
            self.doc.versions.pop();
            return Err(err.into());
        }

        let total = entries.len();
        for chunk in entries.chunks(ENTRY_BATCH_SIZE) {
            let persisted_len = self.doc.entries.len();
            self.doc.entries.extend_from_slice(chunk);
            if let Err(err) = self.storage.save(&self.doc) {
                self.doc.entries.truncate(persisted_len);
                return Err(PlanError::Other(
                    err.context(format!("persisting batch of {} entries", chunk.len())),
                ));
            }
        }
        Ok(total)
    }
}
