//! Shared record types and fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rowmap::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Field types
// =============================================================================

/// Stored as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Normal,
    Urgent,
}

impl RawRepresentable for Priority {
    const RAW_KINDS: &'static [RawKind] = &[RawKind::Int];

    fn to_raw(&self, _kind: RawKind) -> Option<RawValue> {
        Some(RawValue::Int(match self {
            Priority::Low => 0,
            Priority::Normal => 1,
            Priority::Urgent => 9,
        }))
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Int(0) => Some(Priority::Low),
            RawValue::Int(1) => Some(Priority::Normal),
            RawValue::Int(9) => Some(Priority::Urgent),
            _ => None,
        }
    }
}

raw_field!(Priority);

/// Stored as its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl RawRepresentable for Color {
    const RAW_KINDS: &'static [RawKind] = &[RawKind::String];

    fn to_raw(&self, _kind: RawKind) -> Option<RawValue> {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        };
        Some(RawValue::String(name.to_owned()))
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::String(s) => match s.as_str() {
                "red" => Some(Color::Red),
                "green" => Some(Color::Green),
                "blue" => Some(Color::Blue),
                _ => None,
            },
            _ => None,
        }
    }
}

raw_field!(Color);

/// Stored as JSON text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: Option<String>,
}

json_field!(Address);

// =============================================================================
// Records
// =============================================================================

record! {
    /// One of every supported field kind
    #[derive(Debug, Clone, PartialEq)]
    pub struct Task {
        pub id: i64,
        pub title: String,
        pub done: bool,
        pub weight: f64,
        pub ratio: f32,
        pub payload: Vec<u8>,
        pub priority: Priority,
        pub color: Option<Color>,
        pub due: Option<NaiveDate>,
        pub created: DateTime<Utc>,
        pub owner: Uuid,
        pub tags: Json<Vec<String>>,
        pub address: Option<Address>,
        pub note: Option<String>,
    }
}

pub const TASKS_DDL: &str = "CREATE TABLE tasks (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    done INTEGER NOT NULL,
    weight REAL NOT NULL,
    ratio REAL NOT NULL,
    payload BLOB NOT NULL,
    priority INTEGER NOT NULL,
    color TEXT,
    due TEXT,
    created TEXT NOT NULL,
    owner TEXT NOT NULL,
    tags TEXT NOT NULL,
    address TEXT,
    note TEXT
)";

/// A fully populated task
pub fn sample_task(id: i64) -> Task {
    Task {
        id,
        title: format!("task {id}"),
        done: id % 2 == 0,
        weight: 1.5 * id as f64,
        ratio: 0.25,
        payload: vec![0x00, 0x7f, 0xff],
        priority: Priority::Urgent,
        color: Some(Color::Green),
        due: NaiveDate::from_ymd_opt(2024, 2, 29),
        created: fixed_instant(),
        owner: Uuid::from_u128(0x6ba7_b810_9dad_11d1_80b4_00c0_4fd4_30c8),
        tags: Json(vec!["home".into(), "weekly".into()]),
        address: Some(Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            zip: None,
        }),
        note: Some("it's done".into()),
    }
}

/// A task with every optional field empty
pub fn sparse_task(id: i64) -> Task {
    Task {
        color: None,
        due: None,
        address: None,
        note: None,
        ..sample_task(id)
    }
}

/// Millisecond-precision instant
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap() + Duration::milliseconds(250)
}

/// In-memory database with the tasks table
pub fn tasks_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory database");
    db.execute(TASKS_DDL).expect("create tasks table");
    db
}
