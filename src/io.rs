use crate::model::{Employee, EmployeeGroup};
use crate::versioning::EntryView;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import d'employés depuis CSV : header `name,group,contracted_hours[,is_keyholder][,is_active]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let group = rec.get(1).context("missing group")?.trim();
        let hours = rec.get(2).context("missing contracted_hours")?.trim();
        if name.is_empty() || group.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let group = parse_group(group)?;
        let hours: f32 = hours
            .parse()
            .with_context(|| format!("invalid contracted_hours for {name}"))?;
        let mut employee = Employee::new(name.to_string(), group, hours);
        if let Some(flag) = rec.get(3) {
            let flag = flag.trim();
            if !flag.is_empty() {
                employee.is_keyholder = parse_bool(flag)
                    .with_context(|| format!("invalid is_keyholder value for {name}"))?;
            }
        }
        if let Some(flag) = rec.get(4) {
            let flag = flag.trim();
            if !flag.is_empty() {
                employee.is_active = parse_bool(flag)
                    .with_context(|| format!("invalid is_active value for {name}"))?;
            }
        }
        out.push(employee);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_group(s: &str) -> anyhow::Result<EmployeeGroup> {
    match s.to_ascii_lowercase().as_str() {
        "full_time" | "fulltime" | "ft" => Ok(EmployeeGroup::FullTime),
        "part_time" | "parttime" | "pt" => Ok(EmployeeGroup::PartTime),
        "mini_job" | "minijob" | "mj" => Ok(EmployeeGroup::MiniJob),
        "team_lead" | "teamlead" | "tl" => Ok(EmployeeGroup::TeamLead),
        other => bail!("unknown employee group: {other}"),
    }
}

/// Export CSV des entrées enrichies : header `date,employee,shift_start,shift_end,status`
pub fn export_entries_csv<P: AsRef<Path>>(path: P, views: &[EntryView]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "employee", "shift_start", "shift_end", "status"])?;
    for view in views {
        let date = view.entry.date.format("%Y-%m-%d").to_string();
        let start = view
            .shift_start
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        let end = view
            .shift_end
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        w.write_record([
            date.as_str(),
            view.employee_name.as_str(),
            start.as_str(),
            end.as_str(),
            view.entry.status.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
