//! Wave/craft data provider.
//!
//! An explicitly constructed, read-only context handed to the engine at startup.
//! Every lookup is optional: callers fall back to per-kind defaults or
//! procedural generation when data is absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base stats for one craft type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftStats {
    /// Starting health.
    pub armor: f64,
    pub points: u32,
    /// Lateral speed (px/s).
    pub speed: f64,
    pub fire_interval_ms: f64,
    /// Animation frame count. Carried for the rendering collaborator only.
    #[serde(default)]
    pub frame_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSpawn {
    pub craft_id: String,
    pub quantity: u32,
}

/// One authored wave: ordered spawns and an optional total duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveTableEntry {
    #[serde(default)]
    pub duration_ms: Option<f64>,
    pub spawns: Vec<WaveSpawn>,
}

#[derive(Debug, Deserialize)]
struct SurvivalRow {
    tier: u32,
    level: u32,
    wave: u32,
    #[serde(flatten)]
    entry: WaveTableEntry,
}

#[derive(Debug, Deserialize)]
struct CraftFile {
    crafts: HashMap<String, CraftStats>,
}

#[derive(Debug, Default, Deserialize)]
struct WaveFile {
    #[serde(default)]
    survival: Vec<SurvivalRow>,
    #[serde(default)]
    generic: Vec<WaveTableEntry>,
}

/// Errors raised while loading external data. Never fatal to the simulation.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid data: {0}")]
    Invalid(String),
}

/// Read-only craft and wave tables.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    crafts: HashMap<String, CraftStats>,
    survival: HashMap<(u32, u32, u32), WaveTableEntry>,
    generic: Vec<WaveTableEntry>,
}

pub const CRAFTS_FILE: &str = "crafts.json";
pub const WAVES_FILE: &str = "waves.json";

impl DataContext {
    /// Context with no data; every lookup falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse both tables from JSON text.
    pub fn from_json(crafts_json: &str, waves_json: &str) -> Result<Self, DataError> {
        let crafts: CraftFile = serde_json::from_str(crafts_json).map_err(|source| {
            DataError::Parse {
                what: CRAFTS_FILE,
                source,
            }
        })?;
        let waves: WaveFile =
            serde_json::from_str(waves_json).map_err(|source| DataError::Parse {
                what: WAVES_FILE,
                source,
            })?;

        let mut ctx = Self {
            crafts: crafts.crafts,
            survival: HashMap::new(),
            generic: waves.generic,
        };
        for row in waves.survival {
            ctx.survival.insert((row.tier, row.level, row.wave), row.entry);
        }
        ctx.validate()?;
        Ok(ctx)
    }

    /// Load `crafts.json` and `waves.json` from a directory.
    pub fn load_dir(dir: &Path) -> Result<Self, DataError> {
        let crafts = read_file(&dir.join(CRAFTS_FILE))?;
        let waves = read_file(&dir.join(WAVES_FILE))?;
        Self::from_json(&crafts, &waves)
    }

    /// Load from a directory, degrading to the empty context on any failure.
    pub fn load_or_empty(dir: &Path) -> Self {
        match Self::load_dir(dir) {
            Ok(ctx) => {
                log::info!(
                    "Loaded {} crafts, {} survival waves, {} generic waves from {}",
                    ctx.crafts.len(),
                    ctx.survival.len(),
                    ctx.generic.len(),
                    dir.display()
                );
                ctx
            }
            Err(e) => {
                log::warn!("Wave/craft data unavailable ({e}); using built-in defaults");
                Self::empty()
            }
        }
    }

    pub fn craft(&self, name: &str) -> Option<&CraftStats> {
        self.crafts.get(name)
    }

    pub fn survival_wave(&self, tier: u32, level: u32, wave: u32) -> Option<&WaveTableEntry> {
        self.survival.get(&(tier, level, wave))
    }

    /// Generic table entry for a zero-based index.
    pub fn generic_wave(&self, index: u32) -> Option<&WaveTableEntry> {
        self.generic.get(index as usize)
    }

    pub fn craft_count(&self) -> usize {
        self.crafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crafts.is_empty() && self.survival.is_empty() && self.generic.is_empty()
    }

    pub fn with_craft(mut self, name: &str, stats: CraftStats) -> Self {
        self.crafts.insert(name.to_string(), stats);
        self
    }

    pub fn with_survival_wave(
        mut self,
        tier: u32,
        level: u32,
        wave: u32,
        entry: WaveTableEntry,
    ) -> Self {
        self.survival.insert((tier, level, wave), entry);
        self
    }

    pub fn with_generic_wave(mut self, entry: WaveTableEntry) -> Self {
        self.generic.push(entry);
        self
    }

    fn validate(&self) -> Result<(), DataError> {
        for (name, stats) in &self.crafts {
            if !(stats.armor.is_finite() && stats.armor > 0.0) {
                return Err(DataError::Invalid(format!(
                    "craft {name}: armor must be positive, got {}",
                    stats.armor
                )));
            }
            if !(stats.speed.is_finite() && stats.speed >= 0.0) {
                return Err(DataError::Invalid(format!(
                    "craft {name}: speed must be non-negative, got {}",
                    stats.speed
                )));
            }
            if !(stats.fire_interval_ms.is_finite() && stats.fire_interval_ms >= 0.0) {
                return Err(DataError::Invalid(format!(
                    "craft {name}: fireIntervalMs must be non-negative"
                )));
            }
        }
        let entries = self.survival.values().chain(self.generic.iter());
        for entry in entries {
            if let Some(d) = entry.duration_ms {
                if !(d.is_finite() && d > 0.0) {
                    return Err(DataError::Invalid(format!(
                        "wave duration must be positive, got {d}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}
