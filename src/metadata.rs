//! Per-photo metadata from YAML sidecars.
//!
//! Each source image may have a sidecar named after its basename:
//! `harbour.jpg` → `harbour.yaml`.
//!
//! ```yaml
//! title: Harbour at dusk
//! slug: harbour-dusk          # optional, overrides the filename-derived slug
//! date: 2024-06-15
//! description: Long exposure from the east pier.
//! tags: [night, water]
//! camera:
//!   make: Nikon
//!   model: FM2
//!   lens: 50mm f/1.4
//!   film: Portra 400
//!   settings:
//!     aperture: f/8
//!     shutter: 30s
//!     iso: 400
//! location:
//!   city: Lisbon
//!   country: Portugal
//! ```
//!
//! ## Fallback
//!
//! Loading never fails. A missing, unreadable or malformed sidecar yields
//! `{title: basename, slug: basename, date: today}`, tagged with the reason so
//! callers can decide whether to log it. A parsed sidecar is used as written,
//! except that an empty `slug`, `title` or `date` is filled from the same
//! defaults. After loading, `slug` is never empty.
//!
//! Fields are read one at a time. A field of the wrong shape (`tags: 12`,
//! `camera: Nikon`) is dropped with a warning and the rest of the sidecar
//! still applies. Scalars are read as text, so `title: 1984` stays a title,
//! and `iso` accepts a number or a quoted number.

use crate::naming::basename;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// Normalized metadata for one photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoMetadata {
    pub title: String,
    pub slug: String,
    /// Date as written in the sidecar (ISO-like), or today as `YYYY-MM-DD`.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub make: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub model: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub lens: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub film: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CameraSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub aperture: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub shutter: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub iso: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,
}

/// Sidecar file as written. Every field is optional here; normalization
/// happens in [`load_metadata`].
#[derive(Debug, Default)]
struct Sidecar {
    title: Option<String>,
    slug: Option<String>,
    date: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    camera: Option<Camera>,
    location: Option<Location>,
}

impl Sidecar {
    /// Pick fields out of a parsed YAML document one by one.
    ///
    /// A field of the wrong shape is dropped on its own so the rest of the
    /// sidecar (its `slug` above all) still applies. Only a document that is
    /// not a mapping is rejected.
    fn from_value(value: Value) -> Result<Self, String> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => return Err("expected a mapping of fields".to_string()),
        };

        let text = |name: &str| map.get(name).and_then(|v| lenient_field(name, v, scalar_text));
        Ok(Self {
            title: text("title"),
            slug: text("slug"),
            date: text("date"),
            description: text("description"),
            tags: map
                .get("tags")
                .and_then(|v| lenient_field("tags", v, text_list)),
            camera: map.get("camera").and_then(|v| nested("camera", v)),
            location: map.get("location").and_then(|v| nested("location", v)),
        })
    }
}

/// Apply `extract` to a field, logging when it has an unusable shape.
fn lenient_field<T>(name: &str, value: &Value, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
    if value.is_null() {
        return None;
    }
    let extracted = extract(value);
    if extracted.is_none() {
        tracing::warn!(field = name, "ignoring sidecar field with unexpected type");
    }
    extracted
}

fn nested<T: DeserializeOwned>(name: &str, value: &Value) -> Option<T> {
    lenient_field(name, value, |v| serde_yaml::from_value(v.clone()).ok())
}

/// Scalars as text: `1984` and `true` are kept as written.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_sequence()
        .map(|items| items.iter().filter_map(scalar_text).collect())
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(d)?))
}

/// Numbers, or strings holding one (`iso: "400"`).
fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Why default metadata was used instead of a sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    NoSidecar,
    Unreadable(String),
    Malformed(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::NoSidecar => write!(f, "no sidecar"),
            DefaultReason::Unreadable(e) => write!(f, "unreadable sidecar: {e}"),
            DefaultReason::Malformed(e) => write!(f, "malformed sidecar: {e}"),
        }
    }
}

/// Outcome of loading a photo's metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedMetadata {
    /// Parsed from the sidecar (after normalization).
    Sidecar(PhotoMetadata),
    /// Filename-derived defaults.
    Defaulted {
        metadata: PhotoMetadata,
        reason: DefaultReason,
    },
}

impl LoadedMetadata {
    pub fn metadata(&self) -> &PhotoMetadata {
        match self {
            LoadedMetadata::Sidecar(metadata) => metadata,
            LoadedMetadata::Defaulted { metadata, .. } => metadata,
        }
    }

    pub fn into_metadata(self) -> PhotoMetadata {
        match self {
            LoadedMetadata::Sidecar(metadata) => metadata,
            LoadedMetadata::Defaulted { metadata, .. } => metadata,
        }
    }

    /// The reason defaults were used, if they were.
    pub fn default_reason(&self) -> Option<&DefaultReason> {
        match self {
            LoadedMetadata::Sidecar(_) => None,
            LoadedMetadata::Defaulted { reason, .. } => Some(reason),
        }
    }
}

/// Metadata used when a photo has no usable sidecar.
pub fn default_metadata(filename: &str, today: NaiveDate) -> PhotoMetadata {
    let base = basename(filename).to_string();
    PhotoMetadata {
        title: base.clone(),
        slug: base,
        date: format_date(today),
        description: None,
        tags: Vec::new(),
        camera: None,
        location: None,
    }
}

/// Load metadata for `filename` from the sidecar at `sidecar_path`.
///
/// Never fails: see the [module docs](self) for the fallback rules.
pub fn load_metadata(sidecar_path: &Path, filename: &str, today: NaiveDate) -> LoadedMetadata {
    let defaulted = |reason| LoadedMetadata::Defaulted {
        metadata: default_metadata(filename, today),
        reason,
    };

    if !sidecar_path.is_file() {
        return defaulted(DefaultReason::NoSidecar);
    }
    let content = match std::fs::read_to_string(sidecar_path) {
        Ok(content) => content,
        Err(e) => return defaulted(DefaultReason::Unreadable(e.to_string())),
    };
    let parsed = serde_yaml::from_str::<Value>(&content)
        .map_err(|e| e.to_string())
        .and_then(Sidecar::from_value);
    match parsed {
        Ok(sidecar) => LoadedMetadata::Sidecar(normalize(sidecar, filename, today)),
        Err(e) => defaulted(DefaultReason::Malformed(e)),
    }
}

fn normalize(sidecar: Sidecar, filename: &str, today: NaiveDate) -> PhotoMetadata {
    let defaults = default_metadata(filename, today);
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    PhotoMetadata {
        title: non_empty(sidecar.title).unwrap_or(defaults.title),
        slug: non_empty(sidecar.slug).unwrap_or(defaults.slug),
        date: non_empty(sidecar.date).unwrap_or(defaults.date),
        description: sidecar.description,
        tags: sidecar.tags.unwrap_or_default(),
        camera: sidecar.camera,
        location: sidecar.location,
    }
}

/// The date given to photos without a sidecar date, taken in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date the way default metadata stores it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an ISO-like date for ordering.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps
/// (converted to UTC). Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()
}

impl PhotoMetadata {
    /// The parsed `date`, if it is in a recognized format.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
