//! The raw-data initialisation cache: preprocessed population data written
//! by the upstream initialisation step into a study-area folder, read back
//! here when a snapshot has to be generated from scratch.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AspicsError;
use crate::lockdown::LockdownTimeSeries;
use crate::population::{ActivityLocation, Individual};

const INDIVIDUALS_FILE: &str = "individuals.bin";
const ACTIVITY_LOCATIONS_FILE: &str = "activity_locations.bin";
const LOCKDOWN_FILE: &str = "lockdown.csv";

#[derive(Debug, Serialize, Deserialize)]
struct LockdownRow {
    change: f32,
}

/// Handle on the raw-data cache inside one study-area folder.
///
/// A cache is either absent (none of the three files exist), complete, or
/// broken. Partial caches are not a miss: they mean the preprocessing step
/// was interrupted, and reading one is a fatal configuration error.
#[derive(Debug, Clone)]
pub struct InitialisationCache {
    cache_dir: PathBuf,
}

impl InitialisationCache {
    pub fn new<P: Into<PathBuf>>(cache_dir: P) -> InitialisationCache {
        InitialisationCache {
            cache_dir: cache_dir.into(),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.cache_dir.join(name)
    }

    /// True when the initialisation step has never populated this folder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [INDIVIDUALS_FILE, ACTIVITY_LOCATIONS_FILE, LOCKDOWN_FILE]
            .iter()
            .all(|name| !self.file(name).exists())
    }

    /// Reads the complete triple back from the cache.
    ///
    /// # Errors
    /// `AspicsError::Config` naming the missing files when the cache is
    /// incomplete; I/O and decoding errors otherwise.
    pub fn read_from_cache(
        &self,
    ) -> Result<(Vec<Individual>, Vec<ActivityLocation>, LockdownTimeSeries), AspicsError> {
        let missing: Vec<&str> = [INDIVIDUALS_FILE, ACTIVITY_LOCATIONS_FILE, LOCKDOWN_FILE]
            .into_iter()
            .filter(|name| !self.file(name).exists())
            .collect();
        if !missing.is_empty() {
            return Err(AspicsError::Config(format!(
                "initialisation cache in {} is incomplete; missing {}. \
                 Re-run the initialisation step",
                self.cache_dir.display(),
                missing.join(", ")
            )));
        }

        let individuals = self.decode(INDIVIDUALS_FILE)?;
        let activity_locations = self.decode(ACTIVITY_LOCATIONS_FILE)?;

        let mut change = Vec::new();
        let mut reader = csv::Reader::from_path(self.file(LOCKDOWN_FILE))?;
        for row in reader.deserialize() {
            let row: LockdownRow = row?;
            change.push(row.change);
        }

        Ok((individuals, activity_locations, LockdownTimeSeries { change }))
    }

    /// Writes the complete triple, creating the folder if needed. Used by
    /// the initialisation step and by test fixtures.
    ///
    /// # Errors
    /// `AspicsError` on I/O or encoding failure.
    pub fn write_to_cache(
        &self,
        individuals: &[Individual],
        activity_locations: &[ActivityLocation],
        lockdown: &LockdownTimeSeries,
    ) -> Result<(), AspicsError> {
        fs::create_dir_all(&self.cache_dir)?;
        self.encode(INDIVIDUALS_FILE, individuals)?;
        self.encode(ACTIVITY_LOCATIONS_FILE, activity_locations)?;

        let mut writer = csv::Writer::from_path(self.file(LOCKDOWN_FILE))?;
        for &change in &lockdown.change {
            writer.serialize(LockdownRow { change })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, AspicsError> {
        let mut reader = BufReader::new(File::open(self.file(name))?);
        let value =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(value)
    }

    fn encode<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), AspicsError> {
        let mut writer = BufWriter::new(File::create(self.file(name))?);
        bincode::serde::encode_into_std_write(value, &mut writer, bincode::config::standard())?;
        Ok(())
    }
}
