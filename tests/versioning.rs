#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use rotaplan::{
    CoverageRule, Employee, EmployeeGroup, JsonStorage, PlanDocument, PlanError, PlanStatus,
    PlanningInputs, ShiftTemplate, ShiftType, Storage, TemplateId, VersionStore,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn employee(name: &str) -> Employee {
    Employee::new(name, EmployeeGroup::FullTime, 40.0)
}

fn tuesday_rule(min: u16) -> CoverageRule {
    CoverageRule {
        day_index: 1,
        start_time: t(9, 0),
        end_time: t(17, 0),
        min_employees: min,
        max_employees: min + 1,
        requires_keyholder: false,
    }
}

fn sample_inputs() -> PlanningInputs {
    PlanningInputs {
        employees: vec![employee("Alice"), employee("Bob")],
        shift_templates: vec![ShiftTemplate {
            id: TemplateId::new("day"),
            start_time: t(9, 0),
            end_time: t(17, 0),
            requires_break: true,
            shift_type: ShiftType::Middle,
            active_days: vec![0, 1, 2, 3, 4, 5],
        }],
        coverage_rules: vec![tuesday_rule(2)],
        ..PlanningInputs::default()
    }
}

#[test]
fn version_numbers_strictly_increase_and_list_descending() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let inputs = sample_inputs();
    let v1 = store.generate(&inputs, d(2025, 6, 2), d(2025, 6, 8)).unwrap();
    let v2 = store.create_version(d(2025, 6, 9), d(2025, 6, 15), None, None).unwrap();
    let v3 = store.generate(&inputs, d(2025, 6, 16), d(2025, 6, 22)).unwrap();

    assert_eq!(v1.new_version, 1);
    assert_eq!(v2.version, 2);
    assert_eq!(v3.new_version, 3);

    let listed: Vec<u32> = store.versions().iter().map(|m| m.version).collect();
    assert_eq!(listed, vec![3, 2, 1]);
}

#[test]
fn create_version_without_base_persists_empty_draft() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    {
        let storage = JsonStorage::open(&path).unwrap();
        let mut store = VersionStore::open(storage).unwrap();
        let meta = store
            .create_version(d(2025, 6, 2), d(2025, 6, 8), None, Some("semaine vide".into()))
            .unwrap();
        assert_eq!(meta.version, 1);
        assert_eq!(meta.status, PlanStatus::Draft);
    }

    // relecture depuis le fichier
    let store = VersionStore::open(JsonStorage::open(&path).unwrap()).unwrap();
    let meta = store.meta(1).unwrap();
    assert_eq!(meta.date_range.start, d(2025, 6, 2));
    assert_eq!(meta.date_range.end, d(2025, 6, 8));
    assert_eq!(meta.notes.as_deref(), Some("semaine vide"));
    assert_eq!(store.entry_count(1), 0);
}

#[test]
fn create_version_rejects_non_increasing_range() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let same_day = store.create_version(d(2025, 6, 2), d(2025, 6, 2), None, None);
    assert!(matches!(same_day, Err(PlanError::InvalidDateRange(_))));
    let inverted = store.create_version(d(2025, 6, 8), d(2025, 6, 2), None, None);
    assert!(matches!(inverted, Err(PlanError::InvalidDateRange(_))));
}

#[test]
fn create_version_with_unknown_base_fails() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let result = store.create_version(d(2025, 6, 2), d(2025, 6, 8), Some(9), None);
    assert!(matches!(result, Err(PlanError::UnknownVersion(9))));
}

#[test]
fn copied_entries_shift_by_range_offset() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let inputs = sample_inputs();
    store.generate(&inputs, d(2025, 6, 2), d(2025, 6, 8)).unwrap();
    let base_entries: Vec<_> = store
        .entries_for(1)
        .unwrap()
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(base_entries.len(), 2);
    assert_eq!(base_entries[0].date, d(2025, 6, 3));

    // décalage d'une semaine exactement
    let meta = store
        .create_version(d(2025, 6, 9), d(2025, 6, 15), Some(1), None)
        .unwrap();
    assert_eq!(meta.base_version, Some(1));

    let copied = store.entries_for(meta.version).unwrap();
    assert_eq!(copied.len(), base_entries.len());
    for (copy, source) in copied.iter().zip(base_entries.iter()) {
        assert_eq!(copy.date, d(2025, 6, 10));
        assert_eq!(copy.employee_id, source.employee_id);
        assert_eq!(copy.shift_id, source.shift_id);
        assert_eq!(copy.break_start, source.break_start);
        assert_eq!(copy.status, PlanStatus::Draft);
        assert_eq!(copy.version, meta.version);
        assert_ne!(copy.id, source.id);
    }
}

#[test]
fn status_overwrites_have_no_preconditions() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    store.create_version(d(2025, 6, 2), d(2025, 6, 8), None, None).unwrap();

    // publier une version vide est permis
    store.set_status(1, PlanStatus::Published).unwrap();
    assert_eq!(store.meta(1).unwrap().status, PlanStatus::Published);
    store.set_status(1, PlanStatus::Archived).unwrap();
    assert_eq!(store.meta(1).unwrap().status, PlanStatus::Archived);

    let missing = store.set_status(9, PlanStatus::Published);
    assert!(matches!(missing, Err(PlanError::UnknownVersion(9))));
}

#[test]
fn no_two_entries_share_employee_and_date_within_a_version() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let mut inputs = sample_inputs();
    inputs.coverage_rules = vec![
        CoverageRule { start_time: t(9, 0), end_time: t(13, 0), ..tuesday_rule(1) },
        CoverageRule { start_time: t(13, 0), end_time: t(17, 0), ..tuesday_rule(1) },
        CoverageRule { start_time: t(9, 0), end_time: t(17, 0), ..tuesday_rule(2) },
    ];
    let outcome = store.generate(&inputs, d(2025, 6, 2), d(2025, 6, 8)).unwrap();
    assert_eq!(store.entry_count(outcome.new_version), outcome.entry_count);

    let mut seen = HashSet::new();
    for entry in store.entries_for(outcome.new_version).unwrap() {
        assert!(seen.insert((entry.employee_id.clone(), entry.date)));
    }
}

#[test]
fn entry_views_join_employee_name_and_shift_times() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("plan.json")).unwrap();
    let mut store = VersionStore::open(storage).unwrap();

    let inputs = sample_inputs();
    store.generate(&inputs, d(2025, 6, 2), d(2025, 6, 8)).unwrap();

    let views = store
        .entry_views(1, &inputs.employees, &inputs.shift_templates)
        .unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].employee_name, "Alice");
    assert_eq!(views[0].shift_start, Some(t(9, 0)));
    assert_eq!(views[0].shift_end, Some(t(17, 0)));
}

/// Support partagé qui tombe en panne après un nombre donné d'écritures.
#[derive(Clone)]
struct FlakyStorage {
    doc: Rc<RefCell<PlanDocument>>,
    saves_left: Rc<Cell<usize>>,
}

impl FlakyStorage {
    fn new(saves_left: usize) -> Self {
        Self {
            doc: Rc::new(RefCell::new(PlanDocument::default())),
            saves_left: Rc::new(Cell::new(saves_left)),
        }
    }
}

impl Storage for FlakyStorage {
    fn load(&self) -> anyhow::Result<PlanDocument> {
        Ok(self.doc.borrow().clone())
    }
    fn save(&self, doc: &PlanDocument) -> anyhow::Result<()> {
        if self.saves_left.get() == 0 {
            anyhow::bail!("disk full");
        }
        self.saves_left.set(self.saves_left.get() - 1);
        *self.doc.borrow_mut() = doc.clone();
        Ok(())
    }
}

#[test]
fn failed_entry_batch_leaves_meta_committed() {
    // première écriture (meta) passe, le lot d'entrées échoue
    let flaky = FlakyStorage::new(1);
    let committed = flaky.clone();
    let mut store = VersionStore::open(flaky).unwrap();

    let result = store.generate(&sample_inputs(), d(2025, 6, 2), d(2025, 6, 8));
    assert!(result.is_err());

    let doc = committed.doc.borrow();
    assert_eq!(doc.versions.len(), 1);
    assert_eq!(doc.versions[0].version, 1);
    assert!(doc.entries.is_empty());
}

#[test]
fn failed_entry_batch_is_not_resurrected_by_later_saves() {
    // le lot échoue, puis une écriture réussie sur le même handle ne doit
    // pas repousser les entrées refusées
    let flaky = FlakyStorage::new(1);
    let committed = flaky.clone();
    let mut store = VersionStore::open(flaky).unwrap();

    let result = store.generate(&sample_inputs(), d(2025, 6, 2), d(2025, 6, 8));
    assert!(result.is_err());
    assert_eq!(store.entry_count(1), 0);

    committed.saves_left.set(10);
    store.set_status(1, PlanStatus::Published).unwrap();

    let doc = committed.doc.borrow();
    assert_eq!(doc.versions[0].status, PlanStatus::Published);
    assert!(doc.entries.is_empty());
}

#[test]
fn failed_meta_save_rolls_back_version_allocation() {
    let flaky = FlakyStorage::new(0);
    let committed = flaky.clone();
    let mut store = VersionStore::open(flaky).unwrap();

    let result = store.create_version(d(2025, 6, 2), d(2025, 6, 8), None, None);
    assert!(result.is_err());
    assert!(committed.doc.borrow().versions.is_empty());

    // une fois le support rétabli, le numéro abandonné est réattribué
    committed.saves_left.set(10);
    let meta = store
        .create_version(d(2025, 6, 2), d(2025, 6, 8), None, None)
        .unwrap();
    assert_eq!(meta.version, 1);
    assert_eq!(committed.doc.borrow().versions.len(), 1);
}
