//! Destinations for exported fare tables.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::domain::StationId;
use crate::network::Station;

use super::FareRow;

/// Errors from writing an exported table.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a table
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink refused the table
    #[error("sink rejected table for {origin}: {message}")]
    Rejected { origin: String, message: String },
}

/// Receives one table per origin station.
pub trait ReachabilitySink {
    /// Store the rows for one origin.
    fn write_origin(&mut self, origin: &Station, rows: Vec<FareRow>) -> Result<(), SinkError>;

    /// Called once after every origin has been offered.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Storage name for an origin's table: `from_` plus the station name with
/// whitespace and path-hostile characters replaced by `_`.
pub fn table_name(station_name: &str) -> String {
    let cleaned: String = station_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("from_{cleaned}")
}

/// An origin's table held by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTable {
    pub origin: String,
    pub rows: Vec<FareRow>,
}

/// Keeps tables in memory, keyed by origin station.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: HashMap<StationId, MemoryTable>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &HashMap<StationId, MemoryTable> {
        &self.tables
    }

    /// Rows written for `origin`, if any.
    pub fn rows(&self, origin: StationId) -> Option<&[FareRow]> {
        self.tables.get(&origin).map(|t| t.rows.as_slice())
    }

    pub fn into_tables(self) -> HashMap<StationId, MemoryTable> {
        self.tables
    }
}

impl ReachabilitySink for MemorySink {
    fn write_origin(&mut self, origin: &Station, rows: Vec<FareRow>) -> Result<(), SinkError> {
        let table = MemoryTable {
            origin: origin.name.clone(),
            rows,
        };
        self.tables.insert(origin.id, table);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OriginTable<'a> {
    origin: &'a str,
    origin_id: String,
    rows: &'a [FareRow],
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    origin: String,
    file: String,
    rows: usize,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    exported_at: String,
    origins: &'a [ManifestEntry],
}

/// Writes one JSON file per origin into a directory, plus `manifest.json`.
///
/// Station names are not unique, so a name that was already used in this
/// export gets the station id appended to its file name, then a counter
/// until the name is free.
#[derive(Debug)]
pub struct JsonDirSink {
    dir: PathBuf,
    used_names: HashSet<String>,
    entries: Vec<ManifestEntry>,
}

impl JsonDirSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| SinkError::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            used_names: HashSet::new(),
            entries: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(&mut self, origin: &Station) -> String {
        let base = table_name(&origin.name);
        let mut stem = base.clone();
        if self.used_names.contains(&stem) {
            stem = format!("{base}_{}", origin.id);
        }
        let mut n = 2;
        while self.used_names.contains(&stem) {
            stem = format!("{base}_{}_{n}", origin.id);
            n += 1;
        }
        self.used_names.insert(stem.clone());
        stem
    }
}

impl ReachabilitySink for JsonDirSink {
    fn write_origin(&mut self, origin: &Station, rows: Vec<FareRow>) -> Result<(), SinkError> {
        let file = format!("{}.json", self.file_stem(origin));
        let path = self.dir.join(&file);

        let table = OriginTable {
            origin: &origin.name,
            origin_id: origin.id.to_string(),
            rows: &rows,
        };
        let json = serde_json::to_vec_pretty(&table)?;
        std::fs::write(&path, json).map_err(|source| SinkError::Io { path, source })?;

        self.entries.push(ManifestEntry {
            origin: origin.name.clone(),
            file,
            rows: rows.len(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let manifest = Manifest {
            exported_at: Utc::now().to_rfc3339(),
            origins: &self.entries,
        };
        let path = self.dir.join("manifest.json");
        let json = serde_json::to_vec_pretty(&manifest)?;
        std::fs::write(&path, json).map_err(|source| SinkError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;
    use tempfile::tempdir;

    fn station(id: u32, name: &str) -> Station {
        Station::new(StationId::new(id), name)
    }

    fn row(destination: &str) -> FareRow {
        FareRow {
            destination: destination.to_string(),
            fare: 3,
            distance: 1_200,
            path: format!("Origin -> {destination}"),
        }
    }

    #[test]
    fn table_names_are_sanitized() {
        assert_eq!(table_name("Xizhimen"), "from_Xizhimen");
        assert_eq!(table_name("Capital Airport T3"), "from_Capital_Airport_T3");
        assert_eq!(table_name("A/B:C"), "from_A_B_C");
        assert_eq!(table_name("../up"), "from____up");
    }

    #[test]
    fn memory_sink_keeps_tables() {
        let mut sink = MemorySink::new();
        sink.write_origin(&station(1, "A"), vec![row("B")]).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.rows(StationId::new(1)), Some(&[row("B")][..]));
        let tables = sink.into_tables();
        assert_eq!(tables[&StationId::new(1)].origin, "A");
    }

    #[test]
    fn memory_sink_keeps_stations_sharing_a_name_apart() {
        let mut sink = MemorySink::new();
        sink.write_origin(&station(1, "Twin"), vec![row("B")]).unwrap();
        sink.write_origin(&station(2, "Twin"), vec![]).unwrap();

        assert_eq!(sink.tables().len(), 2);
        assert_eq!(sink.rows(StationId::new(1)).unwrap().len(), 1);
        assert!(sink.rows(StationId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn json_sink_writes_files_and_manifest() {
        let dir = tempdir().unwrap();
        let mut sink = JsonDirSink::new(dir.path().join("out")).unwrap();

        sink.write_origin(&station(1, "West Gate"), vec![row("B"), row("C")])
            .unwrap();
        sink.finish().unwrap();

        let table_path = dir.path().join("out").join("from_West_Gate.json");
        let table: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(table_path).unwrap()).unwrap();
        assert_eq!(table["origin"], "West Gate");
        assert_eq!(table["origin_id"], "1");
        assert_eq!(table["rows"].as_array().unwrap().len(), 2);
        assert_eq!(table["rows"][0]["path"], "Origin -> B");

        let manifest: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out").join("manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["origins"][0]["file"], "from_West_Gate.json");
        assert_eq!(manifest["origins"][0]["rows"], 2);
        assert!(manifest["exported_at"].as_str().is_some());
    }

    #[test]
    fn json_sink_disambiguates_duplicate_names() {
        let dir = tempdir().unwrap();
        let mut sink = JsonDirSink::new(dir.path()).unwrap();

        sink.write_origin(&station(1, "Twin"), vec![]).unwrap();
        sink.write_origin(&station(2, "Twin"), vec![]).unwrap();

        assert!(dir.path().join("from_Twin.json").exists());
        assert!(dir.path().join("from_Twin_2.json").exists());
    }

    fn read_table(dir: &Path, file: &str) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(dir.join(file)).unwrap()).unwrap()
    }

    #[test]
    fn json_sink_never_overwrites_an_earlier_table() {
        let dir = tempdir().unwrap();
        let mut sink = JsonDirSink::new(dir.path()).unwrap();

        // "Twin 2" takes the name the second "Twin" would be suffixed to.
        sink.write_origin(&station(5, "Twin 2"), vec![row("B")]).unwrap();
        sink.write_origin(&station(1, "Twin"), vec![]).unwrap();
        sink.write_origin(&station(2, "Twin"), vec![]).unwrap();
        sink.finish().unwrap();

        let first = read_table(dir.path(), "from_Twin_2.json");
        assert_eq!(first["origin"], "Twin 2");
        assert_eq!(first["rows"].as_array().unwrap().len(), 1);
        assert_eq!(read_table(dir.path(), "from_Twin.json")["origin_id"], "1");
        assert_eq!(read_table(dir.path(), "from_Twin_2_2.json")["origin_id"], "2");

        let manifest = read_table(dir.path(), "manifest.json");
        let mut files: Vec<&str> = manifest["origins"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["file"].as_str().unwrap())
            .collect();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn json_sink_reports_unwritable_directory() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = JsonDirSink::new(blocker.join("nested")).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
