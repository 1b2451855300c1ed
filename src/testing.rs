//! Fixture platform shared by the unit tests.
//!
//! Physics journal (1), about page 100:
//!   101 Introduction        live, links document 10
//!   102 Chapter One         live, links image 20
//!     103 Measurements      live, links document 10 and video 30
//!   104 Unpublished notes   draft, links document 12
//!   105 Members only        live but private, links image 21
//!
//! History journal (2), about page 200:
//!   201 Archive             live, links document 13 and video 31
//!
//! Document 11 is not linked from any page.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::{
    content::{MemoryContent, memory::Journal, memory::Snapshot},
    models::{AboutPage, AccessGrant, Document, Image, Page, Video},
    types::{JournalId, PageId},
};

pub const PHYSICS: JournalId = 1;
pub const HISTORY: JournalId = 2;
pub const PHYSICS_ABOUT: PageId = 100;
pub const HISTORY_ABOUT: PageId = 200;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn page(id: PageId, parent_id: PageId, title: &str, path: &str, body: &str) -> Page {
    Page {
        id,
        parent_id: Some(parent_id),
        title: title.to_string(),
        url_path: path.to_string(),
        live: true,
        public: true,
        body: body.to_string(),
        ..Default::default()
    }
}

pub fn snapshot() -> Snapshot {
    let mut introduction = page(
        101,
        PHYSICS_ABOUT,
        "Introduction",
        "/physics/introduction/",
        "The quick brown fox jumps over the lazy dog.",
    );
    introduction.documents = vec![10];

    let mut chapter = page(
        102,
        PHYSICS_ABOUT,
        "Chapter One",
        "/physics/chapter-one/",
        "Is the fox quick? The fox is brown.",
    );
    chapter.images = vec![20];

    let mut measurements = page(
        103,
        102,
        "Measurements",
        "/physics/chapter-one/measurements/",
        "Section about reports and measuring waves.",
    );
    measurements.documents = vec![10];
    measurements.videos = vec![30];

    let mut notes = page(
        104,
        PHYSICS_ABOUT,
        "Unpublished notes",
        "/physics/notes/",
        "Draft report on waves.",
    );
    notes.live = false;
    notes.documents = vec![12];

    let mut members = page(
        105,
        PHYSICS_ABOUT,
        "Members only",
        "/physics/members/",
        "Private waves discussion.",
    );
    members.public = false;
    members.images = vec![21];

    let mut archive = page(
        201,
        HISTORY_ABOUT,
        "Archive",
        "/history/archive/",
        "Waves of migration in the archive.",
    );
    archive.documents = vec![13];
    archive.videos = vec![31];

    let expires = today().checked_add_days(Days::new(30)).unwrap();
    let expired = today().pred_opt().unwrap();

    Snapshot {
        journals: vec![
            Journal { id: PHYSICS },
            Journal { id: HISTORY },
        ],
        about_pages: vec![
            AboutPage {
                id: PHYSICS_ABOUT,
                journal_id: PHYSICS,
                title: "Physics Journal".to_string(),
                url_path: "/physics/".to_string(),
                live: true,
            },
            AboutPage {
                id: HISTORY_ABOUT,
                journal_id: HISTORY,
                title: "History Journal".to_string(),
                url_path: "/history/".to_string(),
                live: true,
            },
        ],
        pages: vec![introduction, chapter, measurements, notes, members, archive],
        documents: vec![
            Document {
                id: 10,
                title: "Annual Report".to_string(),
                content: "Measurements of waves collected this year.".to_string(),
            },
            Document {
                id: 11,
                title: "Orphan report".to_string(),
                content: String::new(),
            },
            Document {
                id: 12,
                title: "Draft report".to_string(),
                content: String::new(),
            },
            Document {
                id: 13,
                title: "War report".to_string(),
                content: "Letters from the front.".to_string(),
            },
        ],
        images: vec![
            Image {
                id: 20,
                title: "Fox photo".to_string(),
                caption: "A brown fox in the snow".to_string(),
            },
            Image {
                id: 21,
                title: "Private chart".to_string(),
                caption: "waves".to_string(),
            },
        ],
        videos: vec![
            Video {
                id: 30,
                display_name: "Waves lecture".to_string(),
                transcript: "Today we talk about waves and the report.".to_string(),
                tags: vec!["physics".to_string()],
            },
            Video {
                id: 31,
                display_name: "Migration".to_string(),
                transcript: "Waves of people moved.".to_string(),
                tags: vec!["history".to_string()],
            },
        ],
        grants: vec![
            AccessGrant {
                identity: "reader".to_string(),
                journal_id: PHYSICS,
                expiration: expires,
                revoked: false,
            },
            AccessGrant {
                identity: "lapsed".to_string(),
                journal_id: PHYSICS,
                expiration: expired,
                revoked: false,
            },
            AccessGrant {
                identity: "revoked".to_string(),
                journal_id: HISTORY,
                expiration: expires,
                revoked: true,
            },
        ],
    }
}

pub fn platform() -> MemoryContent {
    MemoryContent::new(snapshot())
}

pub fn shared_platform() -> Arc<MemoryContent> {
    Arc::new(platform())
}
