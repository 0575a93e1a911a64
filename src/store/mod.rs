//! Sharded JSON persistence for the comic catalog.
//!
//! One catalog root holds a summary index plus one directory per comic:
//!
//! ```text
//! comics/
//!     comic-index.json            [{"id": 1, "title": "..."}, ...]
//!     1/
//!         comic.json              full record, chapters as {vol, chap, file}
//!         vol_1_chapter_5.json    one file per chapter
//! ```
//!
//! Loading tolerates missing detail and chapter files: the broken reference
//! is skipped with a warning and everything else stays readable. The next
//! full save rewrites the tree from what was loaded.

pub mod chapter;
pub mod comic;
pub mod index;

use chapter::{chapter_file_name, Chapter, ChapterLink};
use comic::Comic;
use index::IndexEntry;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the summary index file inside the catalog root.
pub const INDEX_FILE: &str = "comic-index.json";

/// Name of the detail file inside each comic directory.
pub const DETAIL_FILE: &str = "comic.json";

/// Catalog root used when the caller does not pick one.
pub const DEFAULT_ROOT: &str = "comics";

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("Comic not found")]
    ComicNotFoundError,

    #[error("Chapter not found")]
    ChapterNotFoundError,

    #[error("{0} index out of range")]
    IndexOutOfRangeError(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Serializes `value` with a four-space indent and writes it through a
/// sibling temp file, renaming into place so a crash mid-write cannot leave
/// `path` truncated.
fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, path)?;

    Ok(())
}

/// Handle to one catalog root on disk. All paths derive from `root`; nothing
/// outside of it is ever touched.
#[derive(Debug, Clone)]
pub struct ComicStore {
    root: PathBuf,
}

impl ComicStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ComicStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the catalog root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }

        Ok(())
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn comic_dir(&self, id: u32) -> PathBuf {
        self.root.join(id.to_string())
    }

    pub fn detail_path(&self, id: u32) -> PathBuf {
        self.comic_dir(id).join(DETAIL_FILE)
    }

    pub fn ensure_comic_dir(&self, id: u32) -> Result<PathBuf> {
        self.ensure_root()?;

        let dir = self.comic_dir(id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    pub fn remove_comic_dir(&self, id: u32) -> Result<()> {
        let dir = self.comic_dir(id);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }

        Ok(())
    }

    /// A missing index file reads as an empty catalog.
    pub fn read_index(&self) -> Result<Vec<IndexEntry>> {
        self.ensure_root()?;

        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&contents)?)
    }

    pub fn write_index(&self, entries: &[IndexEntry]) -> Result<()> {
        self.ensure_root()?;

        write_json(&self.index_path(), &entries)
    }

    /// Reads a detail file, splitting the `chapters` array off into links.
    /// The returned [`Comic`] always has an empty `chapters` vector; the
    /// caller hydrates it from the links.
    pub fn read_detail(&self, id: u32) -> Result<Option<(Comic, Vec<ChapterLink>)>> {
        let path = self.detail_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let mut value: Value = serde_json::from_str(&contents)?;

        let mut links = Vec::new();
        if let Some(chapters) = value.get_mut("chapters") {
            links = serde_json::from_value(chapters.take())?;
            *chapters = Value::Array(Vec::new());
        }

        let comic = serde_json::from_value(value)?;

        Ok(Some((comic, links)))
    }

    /// Writes a detail file with the hydrated chapters replaced by `links`.
    pub fn write_detail(&self, comic: &Comic, links: &[ChapterLink]) -> Result<()> {
        let mut value = serde_json::to_value(comic)?;
        value["chapters"] = serde_json::to_value(links)?;

        write_json(&self.detail_path(comic.id), &value)
    }

    pub fn read_chapter(&self, dir: &Path, link: &ChapterLink) -> Result<Option<Chapter>> {
        let path = dir.join(&link.file);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;

        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Writes one chapter file under the comic directory and returns the
    /// link that a detail file should carry for it.
    pub fn write_chapter(&self, id: u32, chapter: &Chapter) -> Result<ChapterLink> {
        let dir = self.ensure_comic_dir(id)?;
        let file = chapter.file_name();

        write_json(&dir.join(&file), chapter)?;

        Ok(ChapterLink {
            vol: chapter.vol,
            chap: chapter.chap,
            file,
        })
    }

    /// Removes the chapter file named after `(vol, chap)` if it exists.
    pub fn delete_chapter_file(&self, id: u32, vol: f64, chap: f64) -> Result<()> {
        let path = self.comic_dir(id).join(chapter_file_name(vol, chap));
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }

    /// Loads the whole catalog. Index entries without a detail file and
    /// links without a chapter file are skipped with a warning; chapters
    /// come back sorted by `(vol, chap)`.
    #[tracing::instrument]
    pub fn load(&self) -> Result<Vec<Comic>> {
        self.ensure_root()?;

        let mut comics = Vec::new();

        for entry in self.read_index()? {
            let Some((mut comic, links)) = self.read_detail(entry.id)? else {
                tracing::warn!(id = entry.id, "index entry without a detail file, skipping");
                continue;
            };

            let dir = self.comic_dir(entry.id);
            let mut chapters = Vec::with_capacity(links.len());

            for link in &links {
                match self.read_chapter(&dir, link)? {
                    Some(chapter) => chapters.push(chapter),
                    None => {
                        tracing::warn!(
                            id = entry.id,
                            file = %link.file,
                            "chapter link without a file, skipping"
                        );
                    }
                }
            }

            chapters.sort_by(|a, b| a.vol.total_cmp(&b.vol).then(a.chap.total_cmp(&b.chap)));
            comic.chapters = chapters;

            comics.push(comic);
        }

        Ok(comics)
    }

    /// Rewrites the whole tree: chapter files first, then each detail file,
    /// then the index. Readers that only trust the index never see a comic
    /// whose files are not on disk yet.
    #[tracing::instrument(skip(comics))]
    pub fn save(&self, comics: &[Comic]) -> Result<()> {
        self.ensure_root()?;

        let mut index = Vec::with_capacity(comics.len());

        for comic in comics {
            self.ensure_comic_dir(comic.id)?;

            let mut links = Vec::with_capacity(comic.chapters.len());
            for chapter in &comic.chapters {
                links.push(self.write_chapter(comic.id, chapter)?);
            }

            self.write_detail(comic, &links)?;

            index.push(IndexEntry {
                id: comic.id,
                title: comic.title.clone(),
            });
        }

        self.write_index(&index)
    }

    /// Read-only consistency sweep. [`load`](ComicStore::load) tolerates
    /// every anomaly reported here; this exists for callers that want to see
    /// them instead.
    #[tracing::instrument]
    pub fn validate(&self) -> Result<ValidateReport> {
        self.ensure_root()?;

        let mut report = ValidateReport::default();
        let index = self.read_index()?;

        for entry in &index {
            let Some((_, links)) = self.read_detail(entry.id)? else {
                report.missing_details.push(entry.id);
                continue;
            };

            let dir = self.comic_dir(entry.id);
            let referenced: HashSet<&str> = links.iter().map(|l| l.file.as_str()).collect();

            for link in &links {
                if !dir.join(&link.file).exists() {
                    report
                        .missing_chapter_files
                        .push((entry.id, link.file.clone()));
                }
            }

            for dir_entry in fs::read_dir(&dir)? {
                let name = dir_entry?.file_name().to_string_lossy().into_owned();
                if name == DETAIL_FILE || !name.ends_with(".json") {
                    continue;
                }

                if !referenced.contains(name.as_str()) {
                    report.orphan_chapter_files.push((entry.id, name));
                }
            }
        }

        let indexed: HashSet<String> = index.iter().map(|e| e.id.to_string()).collect();
        for dir_entry in fs::read_dir(&self.root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }

            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if !indexed.contains(&name) {
                report.orphan_dirs.push(name);
            }
        }

        report.sort();

        Ok(report)
    }
}

/// What [`ComicStore::validate`] found. Empty on a consistent tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateReport {
    /// Index entries whose directory has no detail file.
    pub missing_details: Vec<u32>,
    /// `(comic id, file)` links whose chapter file is gone.
    pub missing_chapter_files: Vec<(u32, String)>,
    /// `(comic id, file)` chapter files no link points at.
    pub orphan_chapter_files: Vec<(u32, String)>,
    /// Directories under the root that no index entry claims.
    pub orphan_dirs: Vec<String>,
}

impl ValidateReport {
    pub fn is_clean(&self) -> bool {
        self.missing_details.is_empty()
            && self.missing_chapter_files.is_empty()
            && self.orphan_chapter_files.is_empty()
            && self.orphan_dirs.is_empty()
    }

    // Directory iteration order is platform dependent.
    fn sort(&mut self) {
        self.missing_details.sort_unstable();
        self.missing_chapter_files.sort();
        self.orphan_chapter_files.sort();
        self.orphan_dirs.sort();
    }
}
