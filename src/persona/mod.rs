//! # Personas
//!
//! The records shown when a figure is hovered, how they are loaded, where their
//! figures stand, and the [`HoverablePeople`] helper that ties figures to records.
//!
//! - [`PersonaData`] - name, bio and free-form extras attached to one figure
//! - [`PersonaRoster`] - a list of records loaded from JSON
//! - [`Layout`] - ground-plane placement of a roster
//! - [`HoverablePeople`] - figure factory, hover detector and info panel updater

pub mod hoverable;
pub mod layout;

pub use hoverable::{build_composite, HoverablePeople, PartDescriptor, HUMANOID_PARTS};
pub use layout::Layout;

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TroupeError};

/// Field names owned by [`PersonaData`] itself
pub const RESERVED_FIELDS: [&str; 3] = ["name", "bio", "isHoverable"];

const UNKNOWN_NAME: &str = "Unknown";

/// Metadata attached to one figure
///
/// `name` and `bio` are what the info panel shows. Anything else the caller knows about
/// the persona rides along in `extras`. An empty `name` means the record does not
/// identify anyone, and hovering its figure shows nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// Set by the figure factory on every record it attaches
    #[serde(rename = "isHoverable", default)]
    pub is_hoverable: bool,
    #[serde(flatten)]
    extras: BTreeMap<String, Value>,
}

impl PersonaData {
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            ..Self::default()
        }
    }

    /// Adds a caller-defined field, returning the value it replaced
    ///
    /// Fails with [`TroupeError::ReservedField`] for `name`, `bio` and `isHoverable`.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(TroupeError::ReservedField(key));
        }
        Ok(self.extras.insert(key, value))
    }

    /// Builder form of [`insert_extra`](Self::insert_extra)
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Result<Self> {
        self.insert_extra(key, value)?;
        Ok(self)
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extras
    }

    /// Whether this record names someone
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Roster entry as it appears on disk; a missing name reads as "Unknown"
#[derive(Deserialize)]
struct RosterEntry {
    #[serde(default = "unknown_name")]
    name: String,
    #[serde(default)]
    bio: String,
    #[serde(flatten)]
    extras: BTreeMap<String, Value>,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

impl From<RosterEntry> for PersonaData {
    fn from(entry: RosterEntry) -> Self {
        let mut extras = entry.extras;
        // A stale marker in the file says nothing about this scene
        extras.remove("isHoverable");

        Self {
            name: entry.name,
            bio: entry.bio,
            is_hoverable: false,
            extras,
        }
    }
}

/// Accepts both `{"personas": [...]}` and a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Wrapped { personas: Vec<RosterEntry> },
    Bare(Vec<RosterEntry>),
}

/// An ordered list of personas to place in the scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonaRoster {
    pub personas: Vec<PersonaData>,
}

impl PersonaRoster {
    pub fn new(personas: Vec<PersonaData>) -> Self {
        Self { personas }
    }

    /// Parses a roster from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries = match serde_json::from_str::<RosterFile>(json)? {
            RosterFile::Wrapped { personas } => personas,
            RosterFile::Bare(personas) => personas,
        };
        Ok(Self::new(entries.into_iter().map(PersonaData::from).collect()))
    }

    /// Reads and parses a roster file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| TroupeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_json_str(&json)?;
        log::info!(
            "loaded {} personas from {}",
            roster.len(),
            path.display()
        );
        Ok(roster)
    }

    /// A small built-in troupe used when no roster file is configured
    pub fn sample() -> Self {
        let people = [
            ("Ada", "Engineer who writes the compiler passes nobody else wants to touch."),
            ("Bashir", "Night-shift nurse, weekend trail runner, amateur beekeeper."),
            ("Carmen", "Runs a bakery and argues about sourdough hydration online."),
            ("Dmitri", "Retired teacher learning to restore vintage synthesizers."),
            ("Eun-ji", "Product designer obsessed with accessible typography."),
            ("Farah", "Logistics analyst who plans holidays with spreadsheets."),
        ];

        Self::new(
            people
                .into_iter()
                .map(|(name, bio)| PersonaData::new(name, bio))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaData> {
        self.personas.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roster_from_wrapped_response() {
        let roster = PersonaRoster::from_json_str(
            r#"{"personas": [
                {"name": "Ada", "bio": "Engineer"},
                {"name": "Grace", "bio": "Admiral", "age": 85}
            ]}"#,
        )
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.personas[0], PersonaData::new("Ada", "Engineer"));
        assert_eq!(roster.personas[1].extra("age"), Some(&json!(85)));
    }

    #[test]
    fn test_roster_from_bare_array_with_defaults() {
        let roster = PersonaRoster::from_json_str(r#"[{"bio": "No name given"}, {"name": "Lin"}]"#)
            .unwrap();

        assert_eq!(roster.personas[0].name, "Unknown");
        assert_eq!(roster.personas[0].bio, "No name given");
        assert_eq!(roster.personas[1].bio, "");
    }

    #[test]
    fn test_roster_drops_stale_marker() {
        let roster =
            PersonaRoster::from_json_str(r#"[{"name": "Ada", "isHoverable": true}]"#).unwrap();
        assert!(!roster.personas[0].is_hoverable);
        assert!(roster.personas[0].extras().is_empty());
    }

    #[test]
    fn test_roster_rejects_malformed_json() {
        let err = PersonaRoster::from_json_str(r#"{"people": 3}"#).unwrap_err();
        assert!(matches!(err, TroupeError::Roster(_)));
    }

    #[test]
    fn test_roster_missing_file_reports_path() {
        let err = PersonaRoster::from_path(Path::new("/nonexistent/roster.json")).unwrap_err();
        match err {
            TroupeError::Io { path, .. } => assert!(path.ends_with("roster.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reserved_extras_are_rejected() {
        let mut persona = PersonaData::new("Ada", "Engineer");
        for key in RESERVED_FIELDS {
            assert!(matches!(
                persona.insert_extra(key, json!("x")),
                Err(TroupeError::ReservedField(_))
            ));
        }

        let previous = persona.insert_extra("team", json!("compilers")).unwrap();
        assert!(previous.is_none());
        assert_eq!(persona.extra("team"), Some(&json!("compilers")));
    }

    #[test]
    fn test_persona_serializes_flat() {
        let persona = PersonaData::new("Ada", "Engineer")
            .with_extra("city", json!("London"))
            .unwrap();
        let value = serde_json::to_value(&persona).unwrap();

        assert_eq!(
            value,
            json!({"name": "Ada", "bio": "Engineer", "isHoverable": false, "city": "London"})
        );
    }

    #[test]
    fn test_sample_roster_is_named() {
        let roster = PersonaRoster::sample();
        assert!(!roster.is_empty());
        assert!(roster.iter().all(PersonaData::has_name));
    }
}
