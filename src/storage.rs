use crate::model::{ScheduleEntry, VersionMeta};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Document persisté : deux tables logiques, les métadonnées de versions et
/// les entrées, `version` étant la seule clé de partition d'un planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub versions: Vec<VersionMeta>,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

pub trait Storage {
    /// Charge le document depuis un support.
    fn load(&self) -> anyhow::Result<PlanDocument>;
    /// Sauvegarde de manière atomique.
    fn save(&self, doc: &PlanDocument) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<PlanDocument> {
        if !self.path.exists() {
            return Ok(PlanDocument::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let doc: PlanDocument =
            serde_json::from_slice(&data).with_context(|| "parsing plan document")?;
        Ok(doc)
    }

    fn save(&self, doc: &PlanDocument) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(doc)?;
        let mut tmp = NamedTempFile::new_in(
            self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
