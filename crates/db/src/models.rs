use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

/// Path prefix every entity location lives under.
pub const CATALOG_ROOT: &str = "/catalog";

/// Opaque, store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Allocate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v7(Timestamp::now(NoContext)).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A category books can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("{CATALOG_ROOT}/genre/{}", self.id)
    }
}

/// Genre fields as submitted through a form. `id` is set only when the draft
/// targets an existing document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub name: String,
}

impl From<&Genre> for GenreDraft {
    fn from(genre: &Genre) -> Self {
        Self {
            id: Some(genre.id.clone()),
            name: genre.name.clone(),
        }
    }
}

/// A title in the catalog. Read-only from the controllers' point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genres: Vec<EntityId>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("{CATALOG_ROOT}/book/{}", self.id)
    }
}

/// Fields for seeding a book into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genres: Vec<EntityId>,
}

/// Availability of a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| format!("`{value}` is not a valid book instance status"))
    }
}

/// A physical copy of a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: EntityId,
    pub book: EntityId,
    pub imprint: String,
    #[serde(default)]
    pub status: BookInstanceStatus,
    #[serde(default)]
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("{CATALOG_ROOT}/bookinstance/{}", self.id)
    }
}

/// Book instance fields as submitted through a form, kept as text so an
/// invalid submission can be shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstanceDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub book: String,
    pub imprint: String,
    pub status: String,
    #[serde(default)]
    pub due_back: Option<NaiveDate>,
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            id: Some(instance.id.clone()),
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.as_str().to_string(),
            due_back: instance.due_back,
        }
    }
}

/// A book instance joined with the book it copies. `book` is `None` when the
/// reference dangles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstanceWithBook {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

impl BookInstanceWithBook {
    pub fn title(&self) -> Option<&str> {
        self.book.as_ref().map(|book| book.title.as_str())
    }
}

/// Every document the store holds, in insertion order. This is also the
/// on-disk data file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub book_instances: Vec<BookInstance>,
}

impl CatalogData {
    /// Human-readable descriptions of references pointing at missing documents.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for book in &self.books {
            for genre_id in &book.genres {
                if !self.genres.iter().any(|genre| &genre.id == genre_id) {
                    problems.push(format!(
                        "book {} references missing genre {}",
                        book.id, genre_id
                    ));
                }
            }
        }

        for instance in &self.book_instances {
            if !self.books.iter().any(|book| book.id == instance.book) {
                problems.push(format!(
                    "book instance {} references missing book {}",
                    instance.id, instance.book
                ));
            }
        }

        problems
    }
}
