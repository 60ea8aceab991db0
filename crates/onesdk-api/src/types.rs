//! The One API entity records.

use serde::{Deserialize, Serialize};

/// A book (`/book`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Server-assigned ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Book title.
    pub name: String,
}

/// A movie (`/movie`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Server-assigned ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Movie title.
    pub name: String,
    /// Runtime in minutes.
    pub runtime_in_minutes: f64,
    /// Budget in millions of USD.
    pub budget_in_millions: f64,
    /// Box office revenue in millions of USD.
    pub box_office_revenue_in_millions: f64,
    /// Number of Academy Award nominations.
    pub academy_award_nominations: u32,
    /// Number of Academy Awards won.
    pub academy_award_wins: u32,
    /// Rotten Tomatoes score (series entries carry an average).
    pub rotten_tomatoes_score: f64,
}

/// A book chapter (`/chapter`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Server-assigned ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Chapter title.
    pub chapter_name: String,
    /// Owning book ID (omitted by `/book/{id}/chapter`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
}

/// A character (`/character`).
///
/// Most attributes are free text and are often empty or `"NaN"` upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Server-assigned ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Character name.
    pub name: String,
    /// Race (e.g. `"Hobbit"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    /// Gender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Birth date, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    /// Death date, free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
    /// Spouse name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<String>,
    /// Realm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    /// Hair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Tolkien Gateway wiki URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
}

/// A movie quote (`/quote`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Server-assigned ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Quoted line.
    pub dialog: String,
    /// Movie ID.
    pub movie: String,
    /// Speaking character ID.
    pub character: String,
}
