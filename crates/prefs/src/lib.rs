use anyhow::{Context, Result};
use std::{collections::BTreeMap, collections::HashMap, fs, path::{Path, PathBuf}};
use tracing::{debug, warn};
use model::*;

pub const TEMPERATURE_UNIT_KEY: &str = "TemperatureUnit";
pub const SPEED_UNIT_KEY: &str = "SpeedUnit";
pub const CAPACITY_UNIT_KEY: &str = "CapacityUnit";

/// Integer key/value settings storage.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<i32>>;
    fn set(&mut self, key: &str, value: i32) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<i32>> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: i32) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings kept as a flat JSON object, rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl JsonFileStore {
    /// `<config dir>/dashinfo/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|d| d.join("dashinfo").join("settings.json"))
    }

    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let values = match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s)
                .with_context(|| format!("parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };
        Ok(Self { path: path.to_path_buf(), values })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let s = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<i32>> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: i32) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

fn restore_one<U>(store: &mut dyn PreferenceStore, key: &str) -> Result<U>
where
    U: TryFrom<i32, Error = InvalidUnitIndex> + Default,
{
    match store.get(key)? {
        None => {
            // first run: persist the default so the key exists from now on
            store.set(key, 0)?;
            Ok(U::default())
        }
        Some(v) => match U::try_from(v) {
            Ok(u) => Ok(u),
            Err(e) => {
                warn!(key, error = %e, "ignoring stored unit");
                Ok(U::default())
            }
        },
    }
}

/// Reads the unit selection, writing back defaults for keys that are absent.
pub fn restore_units(store: &mut dyn PreferenceStore) -> Result<Units> {
    let units = Units {
        temperature: restore_one(store, TEMPERATURE_UNIT_KEY)?,
        speed: restore_one(store, SPEED_UNIT_KEY)?,
        capacity: restore_one(store, CAPACITY_UNIT_KEY)?,
    };
    debug!(?units, "restored units");
    Ok(units)
}

pub fn save_units(store: &mut dyn PreferenceStore, units: &Units) -> Result<()> {
    store.set(TEMPERATURE_UNIT_KEY, units.temperature.index())?;
    store.set(SPEED_UNIT_KEY, units.speed.index())?;
    store.set(CAPACITY_UNIT_KEY, units.capacity.index())?;
    Ok(())
}
