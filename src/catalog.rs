//! In-memory catalog and the operations the API facade exposes.
//!
//! [`Catalog`] owns the hydrated comics plus the store they came from.
//! Mutating operations update the vector in place and perform the same
//! targeted file side effects the desktop tool did: directory creation on
//! add, a chapter file write on chapter add/edit, file and directory
//! removal on the delete paths. A full [`Catalog::save`] rewrites the tree.

use crate::store::chapter::Chapter;
use crate::store::comic::{
    AltName, Comic, Comment, ComicStatus, ComicType, ContentRating, Demographic, StringListKind,
    NA,
};
use crate::store::{ComicStore, Error, Result};

use bon::Builder;
use chrono::Utc;
use serde::{Deserialize, Deserializer};

use std::collections::BTreeSet;
use std::path::Path;

/// Current time in the catalog's timestamp format: UTC, second precision,
/// e.g. `2024-11-05T17:03:21Z`.
pub fn now_utc() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// Distinguishes `"publication_year": null` (clear) from the field being
// absent (leave alone) when merging a draft.
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial comic payload for [`Catalog::add_comic`] and
/// [`Catalog::edit_comic`]. Absent fields fall back to defaults on add and
/// stay untouched on edit. There is deliberately no `id` and no `chapters`
/// member: ids are assigned once, chapters go through the chapter
/// operations.
#[derive(Deserialize, Builder, Debug, Clone, Default)]
#[builder(on(String, into))]
pub struct ComicDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub comic_type: Option<ComicType>,
    pub status: Option<ComicStatus>,
    pub original_language: Option<String>,
    pub content_rating: Option<ContentRating>,
    pub star: Option<f64>,
    pub demographics: Option<Vec<Demographic>>,
    pub description: Option<String>,
    pub createtime: Option<String>,
    pub pinned: Option<bool>,
    pub favorites: Option<bool>,
    pub following: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub publication_year: Option<Option<i32>>,
    pub mangadex_url: Option<String>,
    pub alt_names: Option<Vec<AltName>>,
    pub arts: Option<Vec<String>>,
    pub artists: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub formats: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub comments: Option<Vec<Comment>>,
}

impl ComicDraft {
    fn apply(self, comic: &mut Comic) {
        if let Some(title) = self.title {
            comic.title = title;
        }
        if let Some(author) = self.author {
            comic.author = author;
        }
        if let Some(comic_type) = self.comic_type {
            comic.comic_type = comic_type;
        }
        if let Some(status) = self.status {
            comic.status = status;
        }
        if let Some(original_language) = self.original_language {
            comic.original_language = original_language;
        }
        if let Some(content_rating) = self.content_rating {
            comic.content_rating = content_rating;
        }
        if let Some(star) = self.star {
            comic.star = star;
        }
        if let Some(demographics) = self.demographics {
            comic.demographics = demographics;
        }
        if let Some(description) = self.description {
            comic.description = description;
        }
        if let Some(createtime) = self.createtime {
            comic.createtime = createtime;
        }
        if let Some(pinned) = self.pinned {
            comic.pinned = pinned;
        }
        if let Some(favorites) = self.favorites {
            comic.favorites = favorites;
        }
        if let Some(following) = self.following {
            comic.following = following;
        }
        if let Some(publication_year) = self.publication_year {
            comic.publication_year = publication_year;
        }
        if let Some(mangadex_url) = self.mangadex_url {
            comic.mangadex_url = mangadex_url;
        }
        if let Some(alt_names) = self.alt_names {
            comic.alt_names = alt_names;
        }
        if let Some(arts) = self.arts {
            comic.arts = arts;
        }
        if let Some(artists) = self.artists {
            comic.artists = artists;
        }
        if let Some(genres) = self.genres {
            comic.genres = genres;
        }
        if let Some(themes) = self.themes {
            comic.themes = themes;
        }
        if let Some(formats) = self.formats {
            comic.formats = formats;
        }
        if let Some(tags) = self.tags {
            comic.tags = tags;
        }
        if let Some(comments) = self.comments {
            comic.comments = comments;
        }
    }
}

/// Chapter payload for [`Catalog::add_chapter`] and
/// [`Catalog::edit_chapter`]. Edits replace the stored record with this,
/// keeping only the original `created_at`.
#[derive(Deserialize, Builder, Debug, Clone, Default)]
#[builder(on(String, into))]
pub struct ChapterDraft {
    #[serde(default)]
    #[builder(default)]
    pub chapter_name: String,
    #[serde(default)]
    #[builder(default)]
    pub vol: f64,
    #[serde(default)]
    #[builder(default)]
    pub chap: f64,
    #[serde(default)]
    #[builder(default)]
    pub language: String,
    #[serde(default)]
    #[builder(default)]
    pub reading_progress: usize,
    #[serde(default)]
    #[builder(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[builder(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    #[builder(default)]
    pub one_shot: bool,
}

impl ChapterDraft {
    fn into_chapter(self, created_at: String, updated_at: String) -> Chapter {
        Chapter {
            chapter_name: self.chapter_name,
            vol: self.vol,
            chap: self.chap,
            language: self.language,
            reading_progress: self.reading_progress,
            images: self.images,
            comments: self.comments,
            one_shot: self.one_shot,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    store: ComicStore,
    comics: Vec<Comic>,
}

impl Catalog {
    /// Loads every comic under `root`, creating the root if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let store = ComicStore::new(root.as_ref());
        let comics = store.load()?;

        Ok(Catalog { store, comics })
    }

    pub fn store(&self) -> &ComicStore {
        &self.store
    }

    pub fn comics(&self) -> &[Comic] {
        &self.comics
    }

    /// Rewrites the whole tree through the store.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.comics)
    }

    /// Ids are compared in string form, so `"7"` finds the comic with id 7
    /// while `"07"` finds nothing.
    pub fn get(&self, id: &str) -> Option<&Comic> {
        self.comics.iter().find(|c| c.id.to_string() == id)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.comics
            .iter()
            .position(|c| c.id.to_string() == id)
            .ok_or(Error::ComicNotFoundError)
    }

    /// Highest existing id plus one; 1 for an empty catalog. Deleted ids get
    /// reused once nothing above them is left. Saturates instead of
    /// overflowing when a hand-edited index carries `u32::MAX`.
    pub fn next_id(&self) -> u32 {
        self.comics
            .iter()
            .map(|c| c.id)
            .max()
            .map_or(1, |id| id.saturating_add(1))
    }

    /// Adds a comic with a fresh id and no chapters. `createtime` and
    /// `updated_at` are stamped with the current time no matter what the
    /// draft says; `latest_chapter_at` starts as `"N/A"`.
    #[tracing::instrument(skip(self, draft))]
    pub fn add_comic(&mut self, draft: ComicDraft) -> Result<&Comic> {
        let mut comic = Comic::default();
        draft.apply(&mut comic);

        let now = now_utc();
        comic.id = self.next_id();
        comic.createtime = now.clone();
        comic.updated_at = now;
        comic.latest_chapter_at = NA.to_string();
        comic.chapters = Vec::new();

        self.store.ensure_comic_dir(comic.id)?;
        self.comics.push(comic);

        Ok(self.comics.last().expect("comic was just pushed"))
    }

    /// Merges the draft into an existing comic and refreshes `updated_at`.
    #[tracing::instrument(skip(self, draft))]
    pub fn edit_comic(&mut self, id: &str, draft: ComicDraft) -> Result<&Comic> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        draft.apply(comic);
        comic.updated_at = now_utc();

        Ok(&self.comics[idx])
    }

    /// Removes the comic and its whole directory.
    #[tracing::instrument(skip(self))]
    pub fn delete_comic(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;

        self.store.remove_comic_dir(self.comics[idx].id)?;
        self.comics.remove(idx);

        Ok(())
    }

    /// Appends a chapter, writes its file right away and bumps both
    /// `updated_at` and `latest_chapter_at` on the owner.
    #[tracing::instrument(skip(self, draft))]
    pub fn add_chapter(&mut self, id: &str, draft: ChapterDraft) -> Result<&Chapter> {
        let idx = self.index_of(id)?;

        let now = now_utc();
        let chapter = draft.into_chapter(now.clone(), now.clone());

        let comic = &mut self.comics[idx];
        self.store.write_chapter(comic.id, &chapter)?;

        comic.chapters.push(chapter);
        comic.updated_at = now.clone();
        comic.latest_chapter_at = now;

        Ok(comic.chapters.last().expect("chapter was just pushed"))
    }

    /// Replaces the chapter keyed by `(vol, chap)` with the draft, keeping
    /// its `created_at`. The new record is written under the name derived
    /// from the draft's numbers; when those changed, the old file stays
    /// behind until the comic is deleted.
    #[tracing::instrument(skip(self, draft))]
    pub fn edit_chapter(
        &mut self,
        id: &str,
        vol: f64,
        chap: f64,
        draft: ChapterDraft,
    ) -> Result<&Chapter> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        let pos = comic
            .chapters
            .iter()
            .position(|c| c.vol == vol && c.chap == chap)
            .ok_or(Error::ChapterNotFoundError)?;

        let created_at = comic.chapters[pos].created_at.clone();
        let now = now_utc();
        let chapter = draft.into_chapter(created_at, now.clone());

        self.store.write_chapter(comic.id, &chapter)?;

        comic.chapters[pos] = chapter;
        comic.updated_at = now;

        Ok(&comic.chapters[pos])
    }

    /// Removes the chapter keyed by `(vol, chap)` along with its file.
    #[tracing::instrument(skip(self))]
    pub fn delete_chapter(&mut self, id: &str, vol: f64, chap: f64) -> Result<()> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        let pos = comic
            .chapters
            .iter()
            .position(|c| c.vol == vol && c.chap == chap)
            .ok_or(Error::ChapterNotFoundError)?;

        self.store.delete_chapter_file(comic.id, vol, chap)?;

        comic.chapters.remove(pos);
        comic.updated_at = now_utc();

        Ok(())
    }

    pub fn string_list(&self, id: &str, kind: StringListKind) -> Result<&[String]> {
        let idx = self.index_of(id)?;

        Ok(self.comics[idx].string_list(kind))
    }

    /// Appends to one of the string lists. Kinds that de-duplicate silently
    /// skip an item that is already present.
    pub fn add_string_item(
        &mut self,
        id: &str,
        kind: StringListKind,
        item: String,
    ) -> Result<&[String]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        let list = comic.string_list_mut(kind);

        if kind.dedups_on_add() && list.contains(&item) {
            return Ok(comic.string_list(kind));
        }

        list.push(item);
        comic.updated_at = now_utc();

        Ok(comic.string_list(kind))
    }

    pub fn edit_string_item(
        &mut self,
        id: &str,
        kind: StringListKind,
        index: usize,
        item: String,
    ) -> Result<&[String]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        let list = comic.string_list_mut(kind);
        if index >= list.len() {
            return Err(Error::IndexOutOfRangeError(kind.label()));
        }

        list[index] = item;
        comic.updated_at = now_utc();

        Ok(comic.string_list(kind))
    }

    pub fn delete_string_item(
        &mut self,
        id: &str,
        kind: StringListKind,
        index: usize,
    ) -> Result<&[String]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        let list = comic.string_list_mut(kind);
        if index >= list.len() {
            return Err(Error::IndexOutOfRangeError(kind.label()));
        }

        list.remove(index);
        comic.updated_at = now_utc();

        Ok(comic.string_list(kind))
    }

    /// Sorted union of one string list over every comic, without duplicates.
    pub fn all_items(&self, kind: StringListKind) -> Vec<String> {
        let mut items = BTreeSet::new();

        for comic in &self.comics {
            for item in comic.string_list(kind) {
                items.insert(item.clone());
            }
        }

        items.into_iter().collect()
    }

    pub fn alt_names(&self, id: &str) -> Result<&[AltName]> {
        let idx = self.index_of(id)?;

        Ok(&self.comics[idx].alt_names)
    }

    /// Alternative titles always append; the same name in two languages is
    /// legitimate.
    pub fn add_alt_name(&mut self, id: &str, alt_name: AltName) -> Result<&[AltName]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        comic.alt_names.push(alt_name);
        comic.updated_at = now_utc();

        Ok(&comic.alt_names)
    }

    pub fn edit_alt_name(
        &mut self,
        id: &str,
        index: usize,
        alt_name: AltName,
    ) -> Result<&[AltName]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        if index >= comic.alt_names.len() {
            return Err(Error::IndexOutOfRangeError("Alt name"));
        }

        comic.alt_names[index] = alt_name;
        comic.updated_at = now_utc();

        Ok(&comic.alt_names)
    }

    pub fn delete_alt_name(&mut self, id: &str, index: usize) -> Result<&[AltName]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        if index >= comic.alt_names.len() {
            return Err(Error::IndexOutOfRangeError("Alt name"));
        }

        comic.alt_names.remove(index);
        comic.updated_at = now_utc();

        Ok(&comic.alt_names)
    }

    pub fn comments(&self, id: &str) -> Result<&[Comment]> {
        let idx = self.index_of(id)?;

        Ok(&self.comics[idx].comments)
    }

    pub fn add_comment(&mut self, id: &str, comment: Comment) -> Result<&[Comment]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        comic.comments.push(comment);
        comic.updated_at = now_utc();

        Ok(&comic.comments)
    }

    pub fn edit_comment(&mut self, id: &str, index: usize, comment: Comment) -> Result<&[Comment]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        if index >= comic.comments.len() {
            return Err(Error::IndexOutOfRangeError("Comment"));
        }

        comic.comments[index] = comment;
        comic.updated_at = now_utc();

        Ok(&comic.comments)
    }

    pub fn delete_comment(&mut self, id: &str, index: usize) -> Result<&[Comment]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        if index >= comic.comments.len() {
            return Err(Error::IndexOutOfRangeError("Comment"));
        }

        comic.comments.remove(index);
        comic.updated_at = now_utc();

        Ok(&comic.comments)
    }

    pub fn demographics(&self, id: &str) -> Result<&[Demographic]> {
        let idx = self.index_of(id)?;

        Ok(&self.comics[idx].demographics)
    }

    pub fn set_demographics(
        &mut self,
        id: &str,
        demographics: Vec<Demographic>,
    ) -> Result<&[Demographic]> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        comic.demographics = demographics;
        comic.updated_at = now_utc();

        Ok(&comic.demographics)
    }

    pub fn star(&self, id: &str) -> Result<f64> {
        let idx = self.index_of(id)?;

        Ok(self.comics[idx].star)
    }

    pub fn set_star(&mut self, id: &str, star: f64) -> Result<f64> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        comic.star = star;
        comic.updated_at = now_utc();

        Ok(comic.star)
    }

    pub fn description(&self, id: &str) -> Result<&str> {
        let idx = self.index_of(id)?;

        Ok(&self.comics[idx].description)
    }

    pub fn set_description(&mut self, id: &str, description: String) -> Result<&str> {
        let idx = self.index_of(id)?;

        let comic = &mut self.comics[idx];
        comic.description = description;
        comic.updated_at = now_utc();

        Ok(&comic.description)
    }
}
