//! JSON-envelope facade over the catalog, one method per operation of the
//! original webview bridge.
//!
//! Every method returns a compact JSON string shaped as
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
//! Each call loads the catalog from disk, applies one operation and saves on
//! success, so the files are the only state between calls.

use crate::catalog::{Catalog, ChapterDraft, ComicDraft};
use crate::store::comic::{AltName, Comment, Demographic, StringListKind};
use crate::store::{Error, Result, DEFAULT_ROOT};

use serde::Serialize;
use serde_json::Value;

use std::path::PathBuf;

#[derive(Serialize, Debug)]
struct Envelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Envelope {
    fn ok(data: Option<Value>) -> String {
        Envelope {
            success: true,
            data,
            error: None,
        }
        .render()
    }

    fn err(error: &Error) -> String {
        Envelope {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
        .render()
    }

    fn render(self) -> String {
        serde_json::to_string(&self).expect("envelope is always serializable")
    }
}

// Negative indices become usize::MAX, which fails the range check only
// after the comic lookup had its chance to fail first.
fn to_index(index: i64) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

// Same integral collapse the stored files use, so a star of 4.0 replies as 4.
fn number_value(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// The facade itself. Cheap to construct; every method opens the catalog
/// fresh from `root`.
#[derive(Debug, Clone)]
pub struct ComicApi {
    root: PathBuf,
}

impl Default for ComicApi {
    fn default() -> Self {
        ComicApi::new(DEFAULT_ROOT)
    }
}

impl ComicApi {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ComicApi { root: root.into() }
    }

    fn open(&self) -> Result<Catalog> {
        Catalog::open(&self.root)
    }

    /// Read-only call: load, inspect, reply.
    fn reply<F>(&self, op: F) -> String
    where
        F: FnOnce(&Catalog) -> Result<Option<Value>>,
    {
        match self.open().and_then(|catalog| op(&catalog)) {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(&e),
        }
    }

    /// Mutating call: load, mutate, save, reply. Nothing is saved when the
    /// operation fails.
    fn reply_mut<F>(&self, op: F) -> String
    where
        F: FnOnce(&mut Catalog) -> Result<Option<Value>>,
    {
        let run = || -> Result<Option<Value>> {
            let mut catalog = self.open()?;
            let data = op(&mut catalog)?;
            catalog.save()?;

            Ok(data)
        };

        match run() {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(&e),
        }
    }

    pub fn get_comics(&self) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.comics())?)))
    }

    pub fn get_comic(&self, id: &str) -> String {
        self.reply(|catalog| {
            let comic = catalog.get(id).ok_or(Error::ComicNotFoundError)?;

            Ok(Some(serde_json::to_value(comic)?))
        })
    }

    pub fn add_comic(&self, comic_data: Value) -> String {
        self.reply_mut(move |catalog| {
            let draft: ComicDraft = serde_json::from_value(comic_data)?;

            Ok(Some(serde_json::to_value(catalog.add_comic(draft)?)?))
        })
    }

    pub fn edit_comic(&self, id: &str, comic_data: Value) -> String {
        self.reply_mut(move |catalog| {
            let draft: ComicDraft = serde_json::from_value(comic_data)?;

            Ok(Some(serde_json::to_value(catalog.edit_comic(id, draft)?)?))
        })
    }

    pub fn delete_comic(&self, id: &str) -> String {
        self.reply_mut(|catalog| {
            catalog.delete_comic(id)?;

            Ok(None)
        })
    }

    pub fn add_chapter(&self, id: &str, chapter_data: Value) -> String {
        self.reply_mut(move |catalog| {
            let draft: ChapterDraft = serde_json::from_value(chapter_data)?;

            Ok(Some(serde_json::to_value(catalog.add_chapter(id, draft)?)?))
        })
    }

    pub fn edit_chapter(&self, id: &str, vol: f64, chap: f64, chapter_data: Value) -> String {
        self.reply_mut(move |catalog| {
            let draft: ChapterDraft = serde_json::from_value(chapter_data)?;

            Ok(Some(serde_json::to_value(
                catalog.edit_chapter(id, vol, chap, draft)?,
            )?))
        })
    }

    pub fn delete_chapter(&self, id: &str, vol: f64, chap: f64) -> String {
        self.reply_mut(|catalog| {
            catalog.delete_chapter(id, vol, chap)?;

            Ok(None)
        })
    }

    fn get_list(&self, id: &str, kind: StringListKind) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.string_list(id, kind)?)?)))
    }

    fn add_list_item(&self, id: &str, kind: StringListKind, item: &str) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(catalog.add_string_item(
                id,
                kind,
                item.to_string(),
            )?)?))
        })
    }

    fn edit_list_item(&self, id: &str, kind: StringListKind, index: i64, item: &str) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(catalog.edit_string_item(
                id,
                kind,
                to_index(index),
                item.to_string(),
            )?)?))
        })
    }

    fn delete_list_item(&self, id: &str, kind: StringListKind, index: i64) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(catalog.delete_string_item(
                id,
                kind,
                to_index(index),
            )?)?))
        })
    }

    fn get_all_items(&self, kind: StringListKind) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.all_items(kind))?)))
    }

    pub fn get_genres(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Genres)
    }

    pub fn add_genre(&self, id: &str, genre: &str) -> String {
        self.add_list_item(id, StringListKind::Genres, genre)
    }

    pub fn edit_genre(&self, id: &str, index: i64, genre: &str) -> String {
        self.edit_list_item(id, StringListKind::Genres, index, genre)
    }

    pub fn delete_genre(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Genres, index)
    }

    pub fn get_themes(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Themes)
    }

    pub fn add_theme(&self, id: &str, theme: &str) -> String {
        self.add_list_item(id, StringListKind::Themes, theme)
    }

    pub fn edit_theme(&self, id: &str, index: i64, theme: &str) -> String {
        self.edit_list_item(id, StringListKind::Themes, index, theme)
    }

    pub fn delete_theme(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Themes, index)
    }

    pub fn get_formats(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Formats)
    }

    pub fn add_format(&self, id: &str, format: &str) -> String {
        self.add_list_item(id, StringListKind::Formats, format)
    }

    pub fn edit_format(&self, id: &str, index: i64, format: &str) -> String {
        self.edit_list_item(id, StringListKind::Formats, index, format)
    }

    pub fn delete_format(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Formats, index)
    }

    pub fn get_tags(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Tags)
    }

    pub fn add_tag(&self, id: &str, tag: &str) -> String {
        self.add_list_item(id, StringListKind::Tags, tag)
    }

    pub fn edit_tag(&self, id: &str, index: i64, tag: &str) -> String {
        self.edit_list_item(id, StringListKind::Tags, index, tag)
    }

    pub fn delete_tag(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Tags, index)
    }

    pub fn get_artists(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Artists)
    }

    pub fn add_artist(&self, id: &str, artist: &str) -> String {
        self.add_list_item(id, StringListKind::Artists, artist)
    }

    pub fn edit_artist(&self, id: &str, index: i64, artist: &str) -> String {
        self.edit_list_item(id, StringListKind::Artists, index, artist)
    }

    pub fn delete_artist(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Artists, index)
    }

    pub fn get_arts(&self, id: &str) -> String {
        self.get_list(id, StringListKind::Arts)
    }

    pub fn add_art(&self, id: &str, art: &str) -> String {
        self.add_list_item(id, StringListKind::Arts, art)
    }

    pub fn edit_art(&self, id: &str, index: i64, art: &str) -> String {
        self.edit_list_item(id, StringListKind::Arts, index, art)
    }

    pub fn delete_art(&self, id: &str, index: i64) -> String {
        self.delete_list_item(id, StringListKind::Arts, index)
    }

    pub fn get_alt_names(&self, id: &str) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.alt_names(id)?)?)))
    }

    pub fn add_alt_name(&self, id: &str, alt_name: Value) -> String {
        self.reply_mut(move |catalog| {
            let alt_name: AltName = serde_json::from_value(alt_name)?;

            Ok(Some(serde_json::to_value(
                catalog.add_alt_name(id, alt_name)?,
            )?))
        })
    }

    pub fn edit_alt_name(&self, id: &str, index: i64, alt_name: Value) -> String {
        self.reply_mut(move |catalog| {
            let alt_name: AltName = serde_json::from_value(alt_name)?;

            Ok(Some(serde_json::to_value(catalog.edit_alt_name(
                id,
                to_index(index),
                alt_name,
            )?)?))
        })
    }

    pub fn delete_alt_name(&self, id: &str, index: i64) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(
                catalog.delete_alt_name(id, to_index(index))?,
            )?))
        })
    }

    pub fn get_comments(&self, id: &str) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.comments(id)?)?)))
    }

    pub fn add_comment(&self, id: &str, comment: Value) -> String {
        self.reply_mut(move |catalog| {
            let comment: Comment = serde_json::from_value(comment)?;

            Ok(Some(serde_json::to_value(
                catalog.add_comment(id, comment)?,
            )?))
        })
    }

    pub fn edit_comment(&self, id: &str, index: i64, comment: Value) -> String {
        self.reply_mut(move |catalog| {
            let comment: Comment = serde_json::from_value(comment)?;

            Ok(Some(serde_json::to_value(catalog.edit_comment(
                id,
                to_index(index),
                comment,
            )?)?))
        })
    }

    pub fn delete_comment(&self, id: &str, index: i64) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(
                catalog.delete_comment(id, to_index(index))?,
            )?))
        })
    }

    pub fn get_demographics(&self, id: &str) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.demographics(id)?)?)))
    }

    pub fn set_demographics(&self, id: &str, demographics: Value) -> String {
        self.reply_mut(move |catalog| {
            let demographics: Vec<Demographic> = serde_json::from_value(demographics)?;

            Ok(Some(serde_json::to_value(
                catalog.set_demographics(id, demographics)?,
            )?))
        })
    }

    pub fn get_star(&self, id: &str) -> String {
        self.reply(|catalog| Ok(Some(number_value(catalog.star(id)?))))
    }

    pub fn set_star(&self, id: &str, star: f64) -> String {
        self.reply_mut(|catalog| Ok(Some(number_value(catalog.set_star(id, star)?))))
    }

    pub fn get_description(&self, id: &str) -> String {
        self.reply(|catalog| Ok(Some(serde_json::to_value(catalog.description(id)?)?)))
    }

    pub fn set_description(&self, id: &str, description: &str) -> String {
        self.reply_mut(|catalog| {
            Ok(Some(serde_json::to_value(
                catalog.set_description(id, description.to_string())?,
            )?))
        })
    }

    pub fn get_all_genres(&self) -> String {
        self.get_all_items(StringListKind::Genres)
    }

    pub fn get_all_themes(&self) -> String {
        self.get_all_items(StringListKind::Themes)
    }

    pub fn get_all_formats(&self) -> String {
        self.get_all_items(StringListKind::Formats)
    }

    pub fn get_all_tags(&self) -> String {
        self.get_all_items(StringListKind::Tags)
    }

    pub fn get_all_artists(&self) -> String {
        self.get_all_items(StringListKind::Artists)
    }
}
