//! Persistent location preferences.
//!
//! Three named slots live in a small TOML file (`drizzle.toml`, the
//! preference group) next to `config.toml`. Reads happen once on open,
//! every update is written through immediately.

use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::Config;

pub const PREFERENCE_GROUP: &str = "drizzle";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown location slot '{0}'. Expected one of: a, b, c.")]
    UnknownSlot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSlot {
    A,
    B,
    C,
}

impl LocationSlot {
    pub const fn all() -> &'static [LocationSlot] {
        &[LocationSlot::A, LocationSlot::B, LocationSlot::C]
    }

    /// Storage key of the slot.
    pub fn key(&self) -> &'static str {
        match self {
            LocationSlot::A => "locA",
            LocationSlot::B => "locB",
            LocationSlot::C => "locC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationSlot::A => "Location A",
            LocationSlot::B => "Location B",
            LocationSlot::C => "Location C",
        }
    }

    pub fn default_location(&self) -> &'static str {
        match self {
            LocationSlot::A => "Thunder Bay",
            LocationSlot::B => "Kochi",
            LocationSlot::C => "London",
        }
    }
}

impl fmt::Display for LocationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl TryFrom<&str> for LocationSlot {
    type Error = SettingsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "a" | "loca" => Ok(LocationSlot::A),
            "b" | "locb" => Ok(LocationSlot::B),
            "c" | "locc" => Ok(LocationSlot::C),
            _ => Err(SettingsError::UnknownSlot(value.to_string())),
        }
    }
}

impl std::str::FromStr for LocationSlot {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationSlot::try_from(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Locations {
    #[serde(rename = "locA", default = "default_a")]
    a: String,
    #[serde(rename = "locB", default = "default_b")]
    b: String,
    #[serde(rename = "locC", default = "default_c")]
    c: String,
}

fn default_a() -> String {
    LocationSlot::A.default_location().to_string()
}

fn default_b() -> String {
    LocationSlot::B.default_location().to_string()
}

fn default_c() -> String {
    LocationSlot::C.default_location().to_string()
}

impl Default for Locations {
    fn default() -> Self {
        Self { a: default_a(), b: default_b(), c: default_c() }
    }
}

impl Locations {
    fn get(&self, slot: LocationSlot) -> &str {
        match slot {
            LocationSlot::A => &self.a,
            LocationSlot::B => &self.b,
            LocationSlot::C => &self.c,
        }
    }

    fn get_mut(&mut self, slot: LocationSlot) -> &mut String {
        match slot {
            LocationSlot::A => &mut self.a,
            LocationSlot::B => &mut self.b,
            LocationSlot::C => &mut self.c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    locations: Locations,
}

impl SettingsStore {
    /// Open the store at the platform location.
    pub fn open_default() -> anyhow::Result<Self> {
        let path = Self::default_path()?;
        Ok(Self::open(path)?)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Config::config_dir()?.join(format!("{PREFERENCE_GROUP}.toml")))
    }

    /// Read the file once; a missing file means every slot holds its default.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let locations = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|source| SettingsError::Read { path: path.clone(), source })?;
            toml::from_str(&contents)
                .map_err(|source| SettingsError::Parse { path: path.clone(), source })?
        } else {
            Locations::default()
        };

        Ok(Self { path, locations })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn location(&self, slot: LocationSlot) -> &str {
        self.locations.get(slot)
    }

    /// All slots in order A, B, C.
    pub fn locations(&self) -> Vec<String> {
        LocationSlot::all().iter().map(|slot| self.location(*slot).to_string()).collect()
    }

    /// Update one slot and persist the whole group right away.
    pub fn set_location(
        &mut self,
        slot: LocationSlot,
        location: impl Into<String>,
    ) -> Result<(), SettingsError> {
        *self.locations.get_mut(slot) = location.into();
        tracing::debug!(slot = slot.key(), path = %self.path.display(), "saving location");
        self.save()
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SettingsError::Write { path: parent.to_path_buf(), source })?;
        }

        let toml = toml::to_string_pretty(&self.locations)?;
        fs::write(&self.path, toml)
            .map_err(|source| SettingsError::Write { path: self.path.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SettingsStore::open(dir.path().join("drizzle.toml")).expect("open");

        assert_eq!(store.location(LocationSlot::A), "Thunder Bay");
        assert_eq!(store.location(LocationSlot::B), "Kochi");
        assert_eq!(store.location(LocationSlot::C), "London");
        assert_eq!(store.locations(), vec!["Thunder Bay", "Kochi", "London"]);
    }

    #[test]
    fn write_then_read_returns_same_value() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("prefs").join("drizzle.toml");

        let mut store = SettingsStore::open(&path).expect("open");
        store.set_location(LocationSlot::B, "Winnipeg").expect("save");
        assert_eq!(store.location(LocationSlot::B), "Winnipeg");

        let reopened = SettingsStore::open(&path).expect("reopen");
        assert_eq!(reopened.location(LocationSlot::B), "Winnipeg");
        assert_eq!(reopened.location(LocationSlot::A), "Thunder Bay");
    }

    #[test]
    fn input_is_stored_verbatim() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("drizzle.toml");

        let mut store = SettingsStore::open(&path).expect("open");
        store.set_location(LocationSlot::C, "").expect("save");
        store.set_location(LocationSlot::A, "  São Paulo, BR ").expect("save");

        let reopened = SettingsStore::open(&path).expect("reopen");
        assert_eq!(reopened.location(LocationSlot::C), "");
        assert_eq!(reopened.location(LocationSlot::A), "  São Paulo, BR ");
    }

    #[test]
    fn file_uses_preference_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("drizzle.toml");

        let mut store = SettingsStore::open(&path).expect("open");
        store.set_location(LocationSlot::A, "Toronto").expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("locA = \"Toronto\""));
        assert!(raw.contains("locB = \"Kochi\""));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("drizzle.toml");
        fs::write(&path, "locC = \"Oslo\"\n").expect("write");

        let store = SettingsStore::open(&path).expect("open");
        assert_eq!(store.location(LocationSlot::A), "Thunder Bay");
        assert_eq!(store.location(LocationSlot::C), "Oslo");
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("drizzle.toml");
        fs::write(&path, "locA = [").expect("write");

        let err = SettingsStore::open(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn slot_parsing_accepts_short_and_key_forms() {
        assert_eq!(LocationSlot::try_from("a").expect("slot"), LocationSlot::A);
        assert_eq!(LocationSlot::try_from("locB").expect("slot"), LocationSlot::B);
        assert_eq!("C".parse::<LocationSlot>().expect("slot"), LocationSlot::C);

        let err = LocationSlot::try_from("d").unwrap_err();
        assert!(err.to_string().contains("Unknown location slot"));
    }
}
