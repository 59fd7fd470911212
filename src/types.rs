//! Core types for page layouts and their sections.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum length of a page name in bytes.
pub const MAX_PAGE_NAME_LEN: usize = 128;

/// Unique identifier for a section within a page.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub u64);

impl SectionId {
    /// The following id, or None past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(SectionId)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a section list (SHA-256 over its JSON encoding).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(pub [u8; 32]);

impl Revision {
    /// Compute the revision of a section list.
    pub fn of(sections: &[Section]) -> Result<Self> {
        let encoded = serde_json::to_vec(sections)?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(Revision(hasher.finalize().into()))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Revision(arr))
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time. Clocks set before the epoch read as zero.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0);
        Timestamp(micros)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Discriminant of [`SectionContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    Text,
    Grid,
    Cta,
    Image,
    EventList,
    Newsletter,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Hero,
        SectionKind::Text,
        SectionKind::Grid,
        SectionKind::Cta,
        SectionKind::Image,
        SectionKind::EventList,
        SectionKind::Newsletter,
    ];

    /// The wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Text => "text",
            SectionKind::Grid => "grid",
            SectionKind::Cta => "cta",
            SectionKind::Image => "image",
            SectionKind::EventList => "event_list",
            SectionKind::Newsletter => "newsletter",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EditorError::UnknownSectionKind(s.to_string()))
    }
}

/// A card inside a grid section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// Typed content of a section, tagged by section type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionContent {
    Hero {
        title: String,
        subtitle: String,
        #[serde(default)]
        background_image: Option<String>,
        #[serde(default)]
        cta_label: Option<String>,
        #[serde(default)]
        cta_href: Option<String>,
    },

    Text {
        #[serde(default)]
        heading: Option<String>,
        body: String,
    },

    Grid {
        #[serde(default)]
        title: Option<String>,
        columns: u8,
        items: Vec<GridItem>,
    },

    Cta {
        heading: String,
        body: String,
        button_label: String,
        button_href: String,
    },

    Image {
        src: String,
        alt: String,
        #[serde(default)]
        caption: Option<String>,
    },

    /// Upcoming (and optionally past) events pulled from the events listing.
    EventList {
        title: String,
        limit: u32,
        show_past: bool,
    },

    Newsletter {
        heading: String,
        description: String,
        button_label: String,
    },
}

impl SectionContent {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Hero { .. } => SectionKind::Hero,
            SectionContent::Text { .. } => SectionKind::Text,
            SectionContent::Grid { .. } => SectionKind::Grid,
            SectionContent::Cta { .. } => SectionKind::Cta,
            SectionContent::Image { .. } => SectionKind::Image,
            SectionContent::EventList { .. } => SectionKind::EventList,
            SectionContent::Newsletter { .. } => SectionKind::Newsletter,
        }
    }

    /// Template content inserted when a new section of `kind` is added.
    pub fn default_for(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Hero => SectionContent::Hero {
                title: "New hero".into(),
                subtitle: String::new(),
                background_image: None,
                cta_label: None,
                cta_href: None,
            },
            SectionKind::Text => SectionContent::Text {
                heading: None,
                body: String::new(),
            },
            SectionKind::Grid => SectionContent::Grid {
                title: None,
                columns: 3,
                items: Vec::new(),
            },
            SectionKind::Cta => SectionContent::Cta {
                heading: "Call to action".into(),
                body: String::new(),
                button_label: "Learn more".into(),
                button_href: "/".into(),
            },
            SectionKind::Image => SectionContent::Image {
                src: String::new(),
                alt: String::new(),
                caption: None,
            },
            SectionKind::EventList => SectionContent::EventList {
                title: "Upcoming events".into(),
                limit: 3,
                show_past: false,
            },
            SectionKind::Newsletter => SectionContent::Newsletter {
                heading: "Stay in the loop".into(),
                description: String::new(),
                button_label: "Subscribe".into(),
            },
        }
    }
}

/// A typed block of page content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub content: SectionContent,
}

impl Section {
    pub fn new(id: SectionId, content: SectionContent) -> Self {
        Self { id, content }
    }

    pub fn kind(&self) -> SectionKind {
        self.content.kind()
    }
}

/// A saved page layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page name (e.g., "home", "about").
    pub page: String,

    /// Ordered sections, top of page first.
    pub sections: Vec<Section>,

    /// Revision of `sections` at save time.
    pub revision: Revision,

    /// When the layout was saved.
    pub updated: Timestamp,
}

impl PageLayout {
    /// Build a layout stamped with the current time.
    pub fn new(page: impl Into<String>, sections: Vec<Section>) -> Result<Self> {
        let revision = Revision::of(&sections)?;
        Ok(Self {
            page: page.into(),
            sections,
            revision,
            updated: Timestamp::now(),
        })
    }
}

/// Check that a page name is usable as a storage key.
pub fn validate_page_name(page: &str) -> Result<()> {
    let valid = !page.is_empty()
        && page.len() <= MAX_PAGE_NAME_LEN
        && page
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if valid {
        Ok(())
    } else {
        Err(EditorError::InvalidPageName(page.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> SectionContent {
        SectionContent::Text {
            heading: None,
            body: body.into(),
        }
    }

    #[test]
    fn test_section_id_next() {
        assert_eq!(SectionId(1).next(), Some(SectionId(2)));
        assert_eq!(SectionId(u64::MAX).next(), None);
    }

    #[test]
    fn test_revision_hex_roundtrip() {
        let revision = Revision::of(&[Section::new(SectionId(1), text("hi"))]).unwrap();
        let parsed = Revision::from_hex(&revision.to_hex()).unwrap();
        assert_eq!(revision, parsed);
    }

    #[test]
    fn test_revision_tracks_content() {
        let a = Revision::of(&[Section::new(SectionId(1), text("a"))]).unwrap();
        let b = Revision::of(&[Section::new(SectionId(1), text("b"))]).unwrap();
        let empty = Revision::of(&[]).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, empty);
        assert_eq!(a, Revision::of(&[Section::new(SectionId(1), text("a"))]).unwrap());
    }

    #[test]
    fn test_section_wire_shape() {
        let section = Section::new(
            SectionId(7),
            SectionContent::EventList {
                title: "Events".into(),
                limit: 5,
                show_past: true,
            },
        );

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["content"]["type"], "event_list");
        assert_eq!(json["content"]["limit"], 5);

        let back: Section = serde_json::from_value(json).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": 1, "content": {"type": "image", "src": "/a.png", "alt": "A"}}"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(
            section.content,
            SectionContent::Image {
                src: "/a.png".into(),
                alt: "A".into(),
                caption: None,
            }
        );
    }

    #[test]
    fn test_unknown_type_tag_rejected() {
        let json = r#"{"id": 1, "content": {"type": "carousel"}}"#;
        assert!(serde_json::from_str::<Section>(json).is_err());
    }

    #[test]
    fn test_kind_parse() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.as_str().parse::<SectionKind>().unwrap(), kind);
            assert_eq!(SectionContent::default_for(kind).kind(), kind);
        }
        assert!(matches!(
            "carousel".parse::<SectionKind>(),
            Err(EditorError::UnknownSectionKind(_))
        ));
    }

    #[test]
    fn test_page_name_validation() {
        assert!(validate_page_name("home").is_ok());
        assert!(validate_page_name("events_2024-spring").is_ok());
        assert!(validate_page_name("").is_err());
        assert!(validate_page_name("../etc").is_err());
        assert!(validate_page_name("a b").is_err());
        assert!(validate_page_name(&"x".repeat(MAX_PAGE_NAME_LEN + 1)).is_err());
    }
}
