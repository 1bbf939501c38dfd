//=========================================================================
// Song
//=========================================================================
//
// Song metadata and chart access, loaded in two phases.
//
// Flow:
//   Song::new(id)             (no I/O, placeholder metadata)
//     ↓
//   song.load(&loader)?       (metadata.json → SongMetadata)
//     ↓
//   song.map(index, &loader)? (maps[index].data_path → GameMap)
//
// File access and parsing live behind `SongLoader`; paths are resolved
// relative to `songs/{id}/`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::info;

//=== Internal Dependencies ===============================================

use super::map::{GameMap, Note};

//=== LoadError ===========================================================

/// Failure to produce song or chart data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No resource at the given path.
    NotFound(String),

    /// The resource exists but could not be understood.
    Malformed { path: String, reason: String },

    /// Requested a chart the song does not list.
    MapIndexOutOfRange { index: usize, count: usize },

    /// `map()` called before `load()` succeeded.
    NotLoaded(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Resource not found: {}", path),
            Self::Malformed { path, reason } => write!(f, "Malformed resource {}: {}", path, reason),
            Self::MapIndexOutOfRange { index, count } => {
                write!(f, "Map index {} out of range (song has {} maps)", index, count)
            }
            Self::NotLoaded(id) => write!(f, "Song {} metadata is not loaded", id),
        }
    }
}

impl std::error::Error for LoadError {}

//=== Metadata ============================================================

/// One playable chart listed by a song.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub data_path: String,
    pub name: String,
    pub difficulty: u32,
}

/// Song-level data, excluding chart notes.
#[derive(Debug, Clone, PartialEq)]
pub struct SongMetadata {
    pub name: String,
    pub artist: String,
    pub track_path: String,
    pub cover_path: String,
    pub bpm: f64,
    pub maps: Vec<MapInfo>,
}

impl Default for SongMetadata {
    fn default() -> Self {
        Self {
            name: "Unknown track".to_string(),
            artist: "Unknown".to_string(),
            track_path: String::new(),
            cover_path: String::new(),
            bpm: 0.0,
            maps: Vec::new(),
        }
    }
}

//=== SongLoader ==========================================================

/// Producer of song data (file system, network, embedded assets, ...).
pub trait SongLoader {
    /// Reads the metadata file at `path`.
    fn metadata(&self, path: &str) -> Result<SongMetadata, LoadError>;

    /// Reads the notes of the chart file at `path`, in any order.
    fn notes(&self, path: &str) -> Result<Vec<Note>, LoadError>;
}

//=== Song ================================================================

/// A song and its chart list.
#[derive(Debug, Clone)]
pub struct Song {
    id: String,
    metadata: SongMetadata,
    loaded: bool,
}

impl Song {
    /// Creates an unloaded song with placeholder metadata.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: SongMetadata::default(),
            loaded: false,
        }
    }

    /// Loads the metadata from `songs/{id}/metadata.json`.
    pub fn load(&mut self, loader: &dyn SongLoader) -> Result<(), LoadError> {
        let path = self.relative_file("metadata.json");
        self.metadata = loader.metadata(&path)?;
        self.loaded = true;

        info!(
            "Loaded song {} ({} by {}, {} maps)",
            self.id,
            self.metadata.name,
            self.metadata.artist,
            self.metadata.maps.len()
        );
        Ok(())
    }

    /// Loads chart `index` listed in the metadata.
    pub fn map(&self, index: usize, loader: &dyn SongLoader) -> Result<GameMap, LoadError> {
        if !self.loaded {
            return Err(LoadError::NotLoaded(self.id.clone()));
        }

        let info = self.metadata.maps.get(index).ok_or(LoadError::MapIndexOutOfRange {
            index,
            count: self.metadata.maps.len(),
        })?;

        let notes = loader.notes(&self.relative_file(&info.data_path))?;
        info!("Loaded map {:?} of song {} ({} notes)", info.name, self.id, notes.len());
        Ok(GameMap::new(notes))
    }

    /// Resolves `path` inside this song's directory.
    pub fn relative_file(&self, path: &str) -> String {
        format!("songs/{}/{}", self.id, path)
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &SongMetadata {
        &self.metadata
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::map::NoteLayer;
    use std::cell::RefCell;

    //--- Test Fixtures ----------------------------------------------------

    /// In-memory loader serving a single song.
    #[derive(Default)]
    pub(crate) struct MemoryLoader {
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl SongLoader for MemoryLoader {
        fn metadata(&self, path: &str) -> Result<SongMetadata, LoadError> {
            self.requests.borrow_mut().push(path.to_string());
            if path != "songs/demo/metadata.json" {
                return Err(LoadError::NotFound(path.to_string()));
            }
            Ok(SongMetadata {
                name: "Demo".to_string(),
                artist: "Band".to_string(),
                track_path: "track.ogg".to_string(),
                cover_path: "cover.png".to_string(),
                bpm: 128.0,
                maps: vec![MapInfo {
                    data_path: "easy.json".to_string(),
                    name: "Easy".to_string(),
                    difficulty: 1,
                }],
            })
        }

        fn notes(&self, path: &str) -> Result<Vec<Note>, LoadError> {
            self.requests.borrow_mut().push(path.to_string());
            if path != "songs/demo/easy.json" {
                return Err(LoadError::NotFound(path.to_string()));
            }
            Ok([2.0, 1.0]
                .into_iter()
                .map(|start_time| Note {
                    start_time,
                    end_time: start_time,
                    start_lane: 0,
                    end_lane: 0,
                    layer: NoteLayer::Primary,
                })
                .collect())
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn new_song_has_placeholder_metadata() {
        let song = Song::new("demo");

        assert!(!song.is_loaded());
        assert_eq!(song.metadata().name, "Unknown track");
        assert_eq!(song.metadata().artist, "Unknown");
    }

    #[test]
    fn load_reads_metadata_from_song_directory() {
        let loader = MemoryLoader::default();
        let mut song = Song::new("demo");

        song.load(&loader).unwrap();

        assert!(song.is_loaded());
        assert_eq!(song.metadata().bpm, 128.0);
        assert_eq!(*loader.requests.borrow(), vec!["songs/demo/metadata.json"]);
    }

    #[test]
    fn load_propagates_loader_errors() {
        let loader = MemoryLoader::default();
        let mut song = Song::new("missing");

        let err = song.load(&loader).unwrap_err();

        assert_eq!(err, LoadError::NotFound("songs/missing/metadata.json".to_string()));
        assert!(!song.is_loaded());
    }

    #[test]
    fn map_loads_sorted_notes() {
        let loader = MemoryLoader::default();
        let mut song = Song::new("demo");
        song.load(&loader).unwrap();

        let map = song.map(0, &loader).unwrap();

        let starts: Vec<_> = map.notes().iter().map(|n| n.start_time).collect();
        assert_eq!(starts, vec![1.0, 2.0]);
    }

    #[test]
    fn map_rejects_unknown_index() {
        let loader = MemoryLoader::default();
        let mut song = Song::new("demo");
        song.load(&loader).unwrap();

        let err = song.map(3, &loader).unwrap_err();

        assert_eq!(err, LoadError::MapIndexOutOfRange { index: 3, count: 1 });
        assert_eq!(err.to_string(), "Map index 3 out of range (song has 1 maps)");
    }

    #[test]
    fn map_before_load_is_an_error() {
        let loader = MemoryLoader::default();
        let song = Song::new("demo");

        assert_eq!(song.map(0, &loader).unwrap_err(), LoadError::NotLoaded("demo".to_string()));
    }

    #[test]
    fn relative_file_is_scoped_to_song() {
        assert_eq!(Song::new("abc").relative_file("cover.png"), "songs/abc/cover.png");
    }
}
