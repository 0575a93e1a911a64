use serde::{Deserialize, Serialize, Serializer};

use crate::store::comic::Comment;

/// Writes integral volume/chapter numbers as JSON integers so that files
/// keep reading `"vol": 1` rather than `"vol": 1.0`.
pub(crate) fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Canonical file name for a chapter. Integral numbers render without a
/// decimal point, so `(1.0, 5.0)` maps to `vol_1_chapter_5.json`.
pub fn chapter_file_name(vol: f64, chap: f64) -> String {
    format!("vol_{vol}_chapter_{chap}.json")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    #[serde(default)]
    pub chapter_name: String,
    #[serde(default, serialize_with = "serialize_number")]
    pub vol: f64,
    #[serde(default, serialize_with = "serialize_number")]
    pub chap: f64,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub reading_progress: usize,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub one_shot: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Chapter {
    pub fn file_name(&self) -> String {
        chapter_file_name(self.vol, self.chap)
    }
}

/// Chapter reference as stored in a detail file. The full record lives in
/// `file`, a name relative to the comic directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChapterLink {
    #[serde(serialize_with = "serialize_number")]
    pub vol: f64,
    #[serde(serialize_with = "serialize_number")]
    pub chap: f64,
    pub file: String,
}
