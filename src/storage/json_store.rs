use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::config::{tmp_path, write_atomic};
use crate::flow::draft::Draft;
use crate::utils::{app_data_dir, drafts_dir_in, ensure_dir, state_file_in};

use super::{DraftStore, Result};

pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// Draft store backed by one JSON file per flow key.
///
/// Writes stage to a temporary file and rename into place, so a failed write
/// never corrupts the previous draft.
#[derive(Clone)]
pub struct JsonDraftStore {
    drafts_dir: PathBuf,
    state_file: PathBuf,
}

/// Persisted envelope wrapping the draft values for one attempt.
#[derive(Debug, Serialize, Deserialize)]
struct DraftFile {
    schema_version: u32,
    attempt_id: Uuid,
    updated_at: DateTime<Utc>,
    values: Draft,
}

impl DraftFile {
    fn new(values: Draft) -> Self {
        Self {
            schema_version: DRAFT_SCHEMA_VERSION,
            attempt_id: Uuid::new_v4(),
            updated_at: Utc::now(),
            values,
        }
    }
}

/// Resume cursors recorded per flow key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    resume: BTreeMap<String, String>,
}

impl JsonDraftStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let drafts_dir = drafts_dir_in(&base);
        ensure_dir(&drafts_dir)?;
        Ok(Self {
            drafts_dir,
            state_file: state_file_in(&base),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn draft_path(&self, flow_key: &str) -> PathBuf {
        self.drafts_dir.join(format!("{}.json", canonical_key(flow_key)))
    }

    fn read_file(&self, flow_key: &str) -> Option<DraftFile> {
        let path = self.draft_path(flow_key);
        if !path.exists() {
            return None;
        }
        // Unreadable or malformed storage degrades to starting fresh.
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("draft file for `{}` unreadable: {}", flow_key, err);
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!("draft file for `{}` malformed: {}", flow_key, err);
                None
            }
        }
    }

    fn write_file(&self, flow_key: &str, file: &DraftFile) -> Result<()> {
        let path = self.draft_path(flow_key);
        let json = serde_json::to_string_pretty(file)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read_state(&self) -> StoreState {
        if !self.state_file.exists() {
            return StoreState::default();
        }
        fs::read_to_string(&self.state_file)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    fn write_state(&self, state: &StoreState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let tmp = tmp_path(&self.state_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.state_file)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        self.drafts_dir.parent().unwrap_or(&self.drafts_dir)
    }
}

impl DraftStore for JsonDraftStore {
    fn load(&self, flow_key: &str) -> Result<Draft> {
        Ok(self
            .read_file(flow_key)
            .map(|file| file.values)
            .unwrap_or_default())
    }

    fn merge(&self, flow_key: &str, partial: &Draft) -> Result<Draft> {
        let mut file = self
            .read_file(flow_key)
            .unwrap_or_else(|| DraftFile::new(Draft::new()));
        file.values.merge_from(partial);
        file.updated_at = Utc::now();
        self.write_file(flow_key, &file)?;
        Ok(file.values)
    }

    fn clear(&self, flow_key: &str) -> Result<()> {
        let path = self.draft_path(flow_key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        let mut state = self.read_state();
        if state.resume.remove(flow_key).is_some() {
            self.write_state(&state)?;
        }
        Ok(())
    }

    fn record_resume(&self, flow_key: &str, query: &str) -> Result<()> {
        let mut state = self.read_state();
        state.resume.insert(flow_key.to_string(), query.to_string());
        self.write_state(&state)
    }

    fn load_resume(&self, flow_key: &str) -> Result<Option<String>> {
        Ok(self.read_state().resume.get(flow_key).cloned())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "flow".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::field::FieldValue;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonDraftStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonDraftStore::new(Some(temp.path().to_path_buf())).expect("draft store");
        (store, temp)
    }

    #[test]
    fn load_is_empty_when_nothing_persisted() {
        let (store, _guard) = store_with_temp_dir();
        let draft = store.load("individual_onboarding").expect("load");
        assert!(draft.is_empty());
    }

    #[test]
    fn merge_accumulates_and_persists() {
        let (store, _guard) = store_with_temp_dir();
        let mut first = Draft::new();
        first.insert("first_name", FieldValue::Text("Ada".into()));
        store.merge("individual_onboarding", &first).expect("merge");

        let mut second = Draft::new();
        second.insert("email", FieldValue::Text("ada@example.com".into()));
        store.merge("individual_onboarding", &second).expect("merge");

        let draft = store.load("individual_onboarding").expect("load");
        assert_eq!(draft.get("first_name"), Some(&FieldValue::Text("Ada".into())));
        assert_eq!(
            draft.get("email"),
            Some(&FieldValue::Text("ada@example.com".into()))
        );
    }

    #[test]
    fn corrupt_draft_degrades_to_empty() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.draft_path("ledger_creation");
        fs::write(&path, "{not json").expect("write corrupt file");
        let draft = store.load("ledger_creation").expect("load");
        assert!(draft.is_empty());
    }

    #[test]
    fn resume_state_roundtrips_and_clears() {
        let (store, _guard) = store_with_temp_dir();
        store
            .record_resume("admin_creation", "step=2&mode=create")
            .expect("record");
        assert_eq!(
            store.load_resume("admin_creation").expect("load resume"),
            Some("step=2&mode=create".into())
        );
        store.clear("admin_creation").expect("clear");
        assert_eq!(store.load_resume("admin_creation").expect("load resume"), None);
    }
}
