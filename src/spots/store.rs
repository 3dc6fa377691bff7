//! One profile's spot file.
//!
//! The file is a CSV with the header `Name,X,Y,WindowPattern`. Reading is
//! tolerant: extra columns are ignored, a missing `WindowPattern` column
//! means every spot is global, and rows that fail to parse are skipped with
//! a warning. Only a header missing `Name`, `X` or `Y` rejects the file.
//!
//! Every mutation rewrites the whole file through a temporary sibling and a
//! rename, so a crash mid-write never leaves a truncated file behind.

use super::types::{Spot, SpotRow, spot_key};
use crate::error::{Result, SpotError};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Header row written to every spot file
pub const CSV_HEADERS: [&str; 4] = ["Name", "X", "Y", "WindowPattern"];

/// Size and modification time of a spot file, used to detect external edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileSignature {
    pub fn read(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Why a single row was skipped
#[derive(Debug, Error)]
enum RowError {
    #[error("empty name")]
    EmptyName,
    #[error("invalid {column} value {value:?}")]
    BadCoordinate { column: &'static str, value: String },
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    x: usize,
    y: usize,
    pattern: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, path: &Path) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };

        let name = find(CSV_HEADERS[0]);
        let x = find(CSV_HEADERS[1]);
        let y = find(CSV_HEADERS[2]);
        match (name, x, y) {
            (Some(name), Some(x), Some(y)) => Ok(Self {
                name,
                x,
                y,
                pattern: find(CSV_HEADERS[3]),
            }),
            _ => {
                let missing = [(name, CSV_HEADERS[0]), (x, CSV_HEADERS[1]), (y, CSV_HEADERS[2])]
                    .into_iter()
                    .filter_map(|(pos, column)| pos.is_none().then_some(column))
                    .collect();
                Err(SpotError::MissingColumns {
                    path: path.to_path_buf(),
                    missing,
                })
            }
        }
    }

    fn parse_row(&self, record: &csv::StringRecord) -> std::result::Result<Spot, RowError> {
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let name = field(self.name);
        if name.is_empty() {
            return Err(RowError::EmptyName);
        }
        let coordinate = |i: usize, column: &'static str| {
            let value = field(i);
            value.parse::<i32>().map_err(|_| RowError::BadCoordinate {
                column,
                value: value.to_string(),
            })
        };
        let x = coordinate(self.x, CSV_HEADERS[1])?;
        let y = coordinate(self.y, CSV_HEADERS[2])?;
        let pattern = self.pattern.map(|i| field(i).to_string());

        Ok(Spot::new(name, x, y, pattern))
    }
}

/// Parse spot rows from CSV text.
///
/// `path` is only used for error messages and warnings.
pub fn parse_spots(reader: impl Read, path: &Path) -> Result<Vec<Spot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| SpotError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        crate::debug_info!("SPOTS", "{:?} has no header; treating as empty", path);
        return Ok(Vec::new());
    }
    let columns = Columns::resolve(&headers, path)?;

    let mut spots = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(SpotError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                log::warn!("Skipping unreadable row in {:?}: {}", path, e);
                continue;
            }
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        match columns.parse_row(&record) {
            Ok(spot) => spots.push(spot),
            Err(e) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                log::warn!("Skipping row at line {} of {:?}: {}", line, path, e);
            }
        }
    }
    Ok(spots)
}

/// In-memory view of one spot file
#[derive(Debug, Clone)]
pub struct SpotStore {
    path: PathBuf,
    /// Spots keyed by lowercase name
    spots: HashMap<String, Spot>,
    /// Keys in file order
    order: Vec<String>,
    signature: Option<FileSignature>,
}

impl SpotStore {
    /// Empty store bound to `path`; nothing is read or written
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            spots: HashMap::new(),
            order: Vec::new(),
            signature: None,
        }
    }

    /// Store bound to `path` holding `spots`. Later duplicates (by
    /// case-insensitive name) replace earlier ones in place.
    pub fn from_spots(path: impl Into<PathBuf>, spots: impl IntoIterator<Item = Spot>) -> Self {
        let mut store = Self::empty(path);
        for spot in spots {
            store.insert(spot);
        }
        store
    }

    /// Read a spot file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let signature = FileSignature::read(&path).map_err(|e| SpotError::io(&path, e))?;
        let file = fs::File::open(&path).map_err(|e| SpotError::io(&path, e))?;
        let spots = parse_spots(io::BufReader::new(file), &path)?;

        let mut store = Self::from_spots(&path, spots);
        store.signature = Some(signature);
        crate::debug_info!("SPOTS", "Loaded {} spots from {:?}", store.len(), path);
        Ok(store)
    }

    /// Load `path`, first creating it with just the header row if absent
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load(path);
        }
        let mut store = Self::empty(path);
        store.persist()?;
        log::info!("Created spot file {:?}", store.path);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Signature recorded at the last load or write
    pub fn signature(&self) -> Option<FileSignature> {
        self.signature
    }

    /// Whether the file on disk differs from what was last loaded or written.
    /// A missing file counts as changed.
    pub fn is_stale(&self) -> bool {
        match FileSignature::read(&self.path) {
            Ok(current) => Some(current) != self.signature,
            Err(_) => true,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&Spot> {
        self.spots.get(&spot_key(name))
    }

    /// Spots in file order
    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.order.iter().filter_map(|key| self.spots.get(key))
    }

    pub fn list(&self) -> Vec<&Spot> {
        self.iter().collect()
    }

    /// Insert or overwrite a spot and write the file.
    /// An overwritten spot keeps its position.
    pub fn save_spot(&mut self, spot: Spot) -> Result<()> {
        let snapshot = self.snapshot();
        self.insert(spot);
        self.persist_or_restore(snapshot)
    }

    /// Remove a spot by name. Returns `false` (and writes nothing) if absent.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let key = spot_key(name);
        if !self.spots.contains_key(&key) {
            return Ok(false);
        }
        let snapshot = self.snapshot();
        self.spots.remove(&key);
        self.order.retain(|k| k != &key);
        self.persist_or_restore(snapshot)?;
        Ok(true)
    }

    /// Remove every window-specific spot active in `context`; global spots
    /// are kept. Returns how many were removed.
    pub fn delete_matching_window(&mut self, context: &crate::window::WindowContext) -> Result<usize> {
        let doomed: Vec<String> = self
            .iter()
            .filter(|spot| !spot.is_global() && spot.is_active_in(context))
            .map(Spot::key)
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }

        let snapshot = self.snapshot();
        for key in &doomed {
            self.spots.remove(key);
        }
        self.order.retain(|k| !doomed.contains(k));
        self.persist_or_restore(snapshot)?;
        Ok(doomed.len())
    }

    /// Remove every spot, leaving a header-only file. Returns how many were removed.
    pub fn clear_all(&mut self) -> Result<usize> {
        let removed = self.len();
        let snapshot = self.snapshot();
        self.spots.clear();
        self.order.clear();
        self.persist_or_restore(snapshot)?;
        Ok(removed)
    }

    /// Write the current contents to a different file (used by migration)
    pub fn save_as(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.iter())
    }

    /// Write the current contents to this store's file
    pub fn persist(&mut self) -> Result<()> {
        write_atomic(&self.path, self.iter())?;
        self.signature = FileSignature::read(&self.path).ok();
        Ok(())
    }

    fn insert(&mut self, spot: Spot) {
        let key = spot.key();
        if self.spots.insert(key.clone(), spot).is_none() {
            self.order.push(key);
        }
    }

    fn snapshot(&self) -> (HashMap<String, Spot>, Vec<String>) {
        (self.spots.clone(), self.order.clone())
    }

    /// Keep memory in step with the file: a failed write undoes the mutation
    fn persist_or_restore(&mut self, snapshot: (HashMap<String, Spot>, Vec<String>)) -> Result<()> {
        if let Err(e) = self.persist() {
            (self.spots, self.order) = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

/// Write spots to `path` via a `.csv.tmp` sibling and a rename
fn write_atomic<'a>(path: &Path, spots: impl Iterator<Item = &'a Spot>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SpotError::io(parent, e))?;
    }

    let temp_path = path.with_extension("csv.tmp");
    let result = write_rows(&temp_path, spots).and_then(|count| {
        fs::rename(&temp_path, path).map_err(|e| SpotError::io(path, e))?;
        Ok(count)
    });

    match result {
        Ok(count) => {
            crate::debug_info!("SPOTS", "Wrote {} spots to {:?}", count, path);
            Ok(())
        }
        Err(e) => {
            crate::debug_error!("SPOTS", "Failed to write {:?}: {}", path, e);
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

fn write_rows<'a>(temp_path: &Path, spots: impl Iterator<Item = &'a Spot>) -> Result<usize> {
    let csv_err = |source| SpotError::Csv {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(temp_path)
        .map_err(csv_err)?;
    wtr.write_record(CSV_HEADERS).map_err(csv_err)?;

    let mut count = 0;
    for spot in spots {
        wtr.serialize(SpotRow::from(spot)).map_err(csv_err)?;
        count += 1;
    }

    let file = wtr
        .into_inner()
        .map_err(|e| SpotError::io(temp_path, e.into_error()))?;
    file.sync_all().map_err(|e| SpotError::io(temp_path, e))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowContext;
    use tempfile::TempDir;

    fn parse(text: &str) -> Result<Vec<Spot>> {
        parse_spots(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_parse_basic_file() {
        let spots = parse("Name,X,Y,WindowPattern\nsend,10,20,\ncompose,100,200,Gmail\n").unwrap();
        assert_eq!(
            spots,
            vec![
                Spot::new("send", 10, 20, None),
                Spot::new("compose", 100, 200, Some("Gmail".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_without_pattern_column() {
        let spots = parse("Name,X,Y\nold,1,2\n").unwrap();
        assert_eq!(spots, vec![Spot::new("old", 1, 2, None)]);
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let spots = parse(
            "Name,X,Y,WindowPattern\n\
             good,1,2,\n\
             bad,notanumber,3,\n\
             ,5,6,\n\
             short,7\n\
             also good,-8,9,Slack\n",
        )
        .unwrap();
        let names: Vec<_> = spots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["good", "also good"]);
        assert_eq!(spots[1].x, -8);
    }

    #[test]
    fn test_parse_missing_required_column() {
        let err = parse("Name,X\nfoo,1\n").unwrap_err();
        match err {
            SpotError::MissingColumns { missing, .. } => assert_eq!(missing, vec!["Y"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("Name,X,Y,WindowPattern\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let spots = parse("Name,X,Y,WindowPattern\n\"a, b\",1,2,\"Inbox, Gmail\"\n").unwrap();
        assert_eq!(spots[0].name, "a, b");
        assert_eq!(spots[0].window_pattern.as_deref(), Some("Inbox, Gmail"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("screen-spots-Host-0-1920x1080.csv");

        let mut store = SpotStore::open_or_create(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,X,Y,WindowPattern\n");

        store.save_spot(Spot::new("send", 10, 20, None)).unwrap();
        store
            .save_spot(Spot::new("compose", 1, 2, Some("a, \"b\"".to_string())))
            .unwrap();

        let loaded = SpotStore::load(&path).unwrap();
        assert_eq!(loaded.list(), store.list());
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_case_insensitively() {
        let temp = TempDir::new().unwrap();
        let mut store = SpotStore::open_or_create(temp.path().join("s.csv")).unwrap();

        store.save_spot(Spot::new("first", 0, 0, None)).unwrap();
        store.save_spot(Spot::new("Send", 1, 1, None)).unwrap();
        store.save_spot(Spot::new("last", 2, 2, None)).unwrap();
        store.save_spot(Spot::new("SEND", 5, 5, Some("Mail".into()))).unwrap();

        assert_eq!(store.len(), 3);
        let send = store.get("send").unwrap();
        assert_eq!(send.coords(), (5, 5));
        assert_eq!(send.name, "SEND");
        let names: Vec<_> = store.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "SEND", "last"]);
    }

    #[test]
    fn test_delete() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.csv");
        let mut store = SpotStore::open_or_create(&path).unwrap();
        store.save_spot(Spot::new("one", 1, 1, None)).unwrap();

        assert!(!store.delete("missing").unwrap());
        assert!(store.delete("ONE").unwrap());
        assert!(store.is_empty());
        assert!(SpotStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_delete_matching_window_keeps_globals() {
        let temp = TempDir::new().unwrap();
        let mut store = SpotStore::open_or_create(temp.path().join("s.csv")).unwrap();
        store.save_spot(Spot::new("global", 1, 1, None)).unwrap();
        store.save_spot(Spot::new("compose", 2, 2, Some("Gmail".into()))).unwrap();
        store.save_spot(Spot::new("reply", 3, 3, Some("Outlook".into()))).unwrap();

        let ctx = WindowContext::new(Some("Inbox - Gmail".into()), None);
        assert_eq!(store.delete_matching_window(&ctx).unwrap(), 1);
        assert!(store.get("global").is_some());
        assert!(store.get("compose").is_none());
        assert!(store.get("reply").is_some());

        assert_eq!(store.delete_matching_window(&WindowContext::default()).unwrap(), 0);
    }

    #[test]
    fn test_clear_all_leaves_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.csv");
        let mut store = SpotStore::open_or_create(&path).unwrap();
        store.save_spot(Spot::new("a", 1, 1, None)).unwrap();
        store.save_spot(Spot::new("b", 2, 2, None)).unwrap();

        assert_eq!(store.clear_all().unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Name,X,Y,WindowPattern\n");
    }

    #[test]
    fn test_is_stale_after_external_edit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.csv");
        let store = SpotStore::open_or_create(&path).unwrap();
        assert!(!store.is_stale());

        fs::write(&path, "Name,X,Y,WindowPattern\nadded,1,2,\n").unwrap();
        assert!(store.is_stale());

        fs::remove_file(&path).unwrap();
        assert!(store.is_stale());
    }

    #[test]
    fn test_failed_write_restores_memory() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let mut store = SpotStore::from_spots(blocker.join("s.csv"), [Spot::new("keep", 1, 1, None)]);
        assert!(store.save_spot(Spot::new("new", 2, 2, None)).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.get("new").is_none());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("screen-spots-Host-0-800x600.csv");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let mut store = SpotStore::from_spots(path.clone(), Vec::<Spot>::new());
        assert!(store.save_spot(Spot::new("new", 2, 2, None)).is_err());
        assert!(store.is_empty());
        assert!(!path.with_extension("csv.tmp").exists());
    }
}
