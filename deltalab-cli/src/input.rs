//! CSV bar and volume-profile loading for replays.
//!
//! Bars: `index,timestamp,high,volume,bid_volume,offer_volume`, timestamps in
//! local time as `YYYY-MM-DDTHH:MM:SS`. Empty volume cells read as zero.
//!
//! Profile levels: `index,price,vol,bid_vol,ask_vol`, any number of rows per
//! bar index.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use deltalab_core::domain::{Bar, BarEvent, VolumeProfile, VolumeProfileLevel};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BarRecord {
    index: usize,
    timestamp: NaiveDateTime,
    high: f64,
    volume: Option<f64>,
    bid_volume: Option<f64>,
    offer_volume: Option<f64>,
}

impl From<BarRecord> for Bar {
    fn from(record: BarRecord) -> Self {
        Bar {
            index: record.index,
            timestamp: record.timestamp,
            high: record.high,
            volume: record.volume.unwrap_or(0.0),
            bid_volume: record.bid_volume.unwrap_or(0.0),
            offer_volume: record.offer_volume.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LevelRecord {
    index: usize,
    price: f64,
    vol: Option<f64>,
    bid_vol: Option<f64>,
    ask_vol: Option<f64>,
}

/// Read bars from a CSV source. Row numbers in errors are 1-based data rows.
pub fn read_bars<R: Read>(source: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    reader
        .deserialize::<BarRecord>()
        .enumerate()
        .map(|(row, record)| {
            record
                .map(Bar::from)
                .with_context(|| format!("bars row {}", row + 1))
        })
        .collect()
}

/// Read profile levels grouped by bar index, in file order.
pub fn read_profiles<R: Read>(source: R) -> Result<HashMap<usize, Vec<VolumeProfileLevel>>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let mut profiles: HashMap<usize, Vec<VolumeProfileLevel>> = HashMap::new();
    for (row, record) in reader.deserialize::<LevelRecord>().enumerate() {
        let record = record.with_context(|| format!("profile row {}", row + 1))?;
        profiles.entry(record.index).or_default().push(VolumeProfileLevel::new(
            record.price,
            record.vol.unwrap_or(0.0),
            record.bid_vol.unwrap_or(0.0),
            record.ask_vol.unwrap_or(0.0),
        ));
    }
    Ok(profiles)
}

/// Attach profiles to bars.
///
/// Without a profile source every bar's profile is absent. With one, bars
/// missing from it get an empty profile.
pub fn join_events(
    bars: Vec<Bar>,
    mut profiles: Option<HashMap<usize, Vec<VolumeProfileLevel>>>,
) -> Vec<BarEvent> {
    bars.into_iter()
        .map(|bar| {
            let profile = match profiles.as_mut() {
                None => VolumeProfile::Absent,
                Some(profiles) => {
                    VolumeProfile::Present(profiles.remove(&bar.index).unwrap_or_default())
                }
            };
            BarEvent::with_profile(bar, profile)
        })
        .collect()
}

/// Load bars and an optional profile file into events.
pub fn load_events(bars_path: &Path, profile_path: Option<&Path>) -> Result<Vec<BarEvent>> {
    let bars_file = std::fs::File::open(bars_path)
        .with_context(|| format!("open bars file {}", bars_path.display()))?;
    let bars = read_bars(bars_file)?;

    let profiles = profile_path
        .map(|path| -> Result<_> {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open profile file {}", path.display()))?;
            read_profiles(file)
        })
        .transpose()?;

    Ok(join_events(bars, profiles))
}
