use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::store::chapter::{serialize_number, Chapter};

/// Sentinel used wherever a timestamp is not known yet.
pub const NA: &str = "N/A";

fn na() -> String {
    NA.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComicType {
    #[default]
    Manga,
    Manhwa,
    Manhua,
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComicStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentRating {
    #[default]
    Safe,
    Suggestive,
    Erotica,
    Pornographic,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demographic {
    Shounen,
    Shoujo,
    Seinen,
    Josei,
    None,
}

#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq, Eq)]
#[builder(on(String, into))]
pub struct AltName {
    pub language: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq, Eq)]
#[builder(on(String, into))]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub date: String,
}

/// The six plain string-list fields that share one CRUD implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringListKind {
    Genres,
    Themes,
    Formats,
    Tags,
    Artists,
    Arts,
}

impl StringListKind {
    /// Singular label used in "<label> index out of range" messages.
    pub fn label(self) -> &'static str {
        match self {
            StringListKind::Genres => "Genre",
            StringListKind::Themes => "Theme",
            StringListKind::Formats => "Format",
            StringListKind::Tags => "Tag",
            StringListKind::Artists => "Artist",
            StringListKind::Arts => "Art",
        }
    }

    /// Genres, themes, formats and tags skip duplicate adds. Artists and
    /// arts keep every entry.
    pub fn dedups_on_add(self) -> bool {
        matches!(
            self,
            StringListKind::Genres
                | StringListKind::Themes
                | StringListKind::Formats
                | StringListKind::Tags
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comic {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "type", default)]
    pub comic_type: ComicType,
    #[serde(default)]
    pub status: ComicStatus,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub content_rating: ContentRating,
    #[serde(default, serialize_with = "serialize_number")]
    pub star: f64,
    #[serde(default)]
    pub demographics: Vec<Demographic>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "na")]
    pub createtime: String,
    #[serde(default = "na")]
    pub updated_at: String,
    #[serde(default = "na")]
    pub latest_chapter_at: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub favorites: bool,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub mangadex_url: String,
    #[serde(default)]
    pub alt_names: Vec<AltName>,
    #[serde(default)]
    pub arts: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Default for Comic {
    fn default() -> Self {
        Comic {
            id: 0,
            title: String::new(),
            author: String::new(),
            comic_type: ComicType::default(),
            status: ComicStatus::default(),
            original_language: String::new(),
            content_rating: ContentRating::default(),
            star: 0.0,
            demographics: Vec::new(),
            description: String::new(),
            createtime: na(),
            updated_at: na(),
            latest_chapter_at: na(),
            pinned: false,
            favorites: false,
            following: false,
            publication_year: None,
            mangadex_url: String::new(),
            alt_names: Vec::new(),
            arts: Vec::new(),
            artists: Vec::new(),
            genres: Vec::new(),
            themes: Vec::new(),
            formats: Vec::new(),
            tags: Vec::new(),
            comments: Vec::new(),
            chapters: Vec::new(),
        }
    }
}

impl Comic {
    pub fn string_list(&self, kind: StringListKind) -> &Vec<String> {
        match kind {
            StringListKind::Genres => &self.genres,
            StringListKind::Themes => &self.themes,
            StringListKind::Formats => &self.formats,
            StringListKind::Tags => &self.tags,
            StringListKind::Artists => &self.artists,
            StringListKind::Arts => &self.arts,
        }
    }

    pub fn string_list_mut(&mut self, kind: StringListKind) -> &mut Vec<String> {
        match kind {
            StringListKind::Genres => &mut self.genres,
            StringListKind::Themes => &mut self.themes,
            StringListKind::Formats => &mut self.formats,
            StringListKind::Tags => &mut self.tags,
            StringListKind::Artists => &mut self.artists,
            StringListKind::Arts => &mut self.arts,
        }
    }
}
