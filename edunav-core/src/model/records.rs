//! ``src/model/records.rs``
//! ============================================================================
//! # Records: the six flat collections served by the provider
//!
//! Spreadsheet exports are loosely typed: any cell may arrive as a JSON
//! string, a number, or be missing altogether. Every field is therefore
//! decoded through the lenient helpers in [`flex`]; identifiers are
//! normalised to trimmed strings so that `1` and `"1"` name the same record.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Deserializer};

/// Identifier of any record, normalised to its trimmed textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(CompactString);

impl RecordId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(CompactString::from(raw.as_ref().trim()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(compact_str::format_compact!("{raw}"))
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(flex::opt_text(deserializer)?
            .map(Self::new)
            .unwrap_or_default())
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Root of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Course {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(rename = "CourseName", deserialize_with = "flex::text")]
    pub name: String,

    #[serde(rename = "Description", deserialize_with = "flex::text")]
    pub description: String,

    #[serde(rename = "Icon", deserialize_with = "flex::opt_text")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Branch {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(rename = "CourseID")]
    pub course_id: RecordId,

    #[serde(rename = "BranchName", deserialize_with = "flex::text")]
    pub name: String,

    #[serde(rename = "Description", deserialize_with = "flex::text")]
    pub description: String,

    #[serde(rename = "University", deserialize_with = "flex::opt_text")]
    pub university: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Semester {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(rename = "BranchID")]
    pub branch_id: RecordId,

    #[serde(rename = "SemesterNumber", deserialize_with = "flex::text")]
    pub number: String,

    #[serde(rename = "SemesterName", deserialize_with = "flex::text")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Subject {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(rename = "SemesterID")]
    pub semester_id: RecordId,

    #[serde(rename = "SubjectCode", deserialize_with = "flex::text")]
    pub code: String,

    #[serde(rename = "SubjectName", deserialize_with = "flex::text")]
    pub name: String,

    #[serde(rename = "Description", deserialize_with = "flex::text")]
    pub description: String,

    #[serde(rename = "Credits", deserialize_with = "flex::text")]
    pub credits: String,

    /// Extra keywords folded into the page meta
    #[serde(rename = "MetaKeywords", deserialize_with = "flex::opt_text")]
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(rename = "SubjectID")]
    pub subject_id: RecordId,

    #[serde(rename = "Title", deserialize_with = "flex::text")]
    pub title: String,

    #[serde(rename = "Description", deserialize_with = "flex::text")]
    pub description: String,

    /// Open set: Notes, PYQ, Video, ...
    #[serde(rename = "ResourceType", deserialize_with = "flex::text")]
    pub kind: String,

    #[serde(rename = "Language", deserialize_with = "flex::opt_text")]
    pub language: Option<String>,

    #[serde(rename = "University", deserialize_with = "flex::opt_text")]
    pub university: Option<String>,

    #[serde(rename = "Year", deserialize_with = "flex::opt_text")]
    pub year: Option<String>,

    #[serde(rename = "Link", deserialize_with = "flex::text")]
    pub link: String,

    /// Provider count plus local, non-persisted increments
    #[serde(rename = "Downloads", deserialize_with = "flex::count")]
    pub downloads: u64,
}

impl Resource {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind.eq_ignore_ascii_case("video")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct University {
    #[serde(rename = "ID")]
    pub id: RecordId,

    #[serde(
        rename = "UniversityName",
        alias = "Name",
        deserialize_with = "flex::text"
    )]
    pub name: String,
}

/// Lenient cell decoders.
pub mod flex {
    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    struct FlexText;

    impl<'de> Visitor<'de> for FlexText {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, bool or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            self.visit_str(&v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            // 3.0 -> "3", 3.5 -> "3.5"
            if v.fract() == 0.0 && v.is_finite() {
                Ok(Some(format!("{v:.0}")))
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(FlexText)
        }
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        d.deserialize_any(FlexText)
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(opt_text(d)?.unwrap_or_default())
    }

    /// Non-numeric counts read as zero.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(opt_text(d)?
            .and_then(|raw| {
                let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_normalise_alike() {
        let a: Course = serde_json::from_value(json!({"ID": 1, "CourseName": "BTech"})).unwrap();
        let b: Course = serde_json::from_value(json!({"ID": " 1 ", "CourseName": "BTech"})).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, RecordId::from(1));
    }

    #[test]
    fn missing_optional_fields_default() {
        let branch: Branch =
            serde_json::from_value(json!({"ID": "10", "CourseID": "1", "BranchName": "CSE"}))
                .unwrap();
        assert_eq!(branch.description, "");
        assert!(branch.university.is_none());
    }

    #[test]
    fn empty_cells_read_as_absent() {
        let resource: Resource = serde_json::from_value(json!({
            "ID": "100",
            "SubjectID": "5",
            "ResourceType": "Video",
            "Language": "",
            "Year": 2023
        }))
        .unwrap();
        assert!(resource.language.is_none());
        assert_eq!(resource.year.as_deref(), Some("2023"));
        assert!(resource.is_video());
    }

    #[test]
    fn download_counts_parse_leniently() {
        let parse = |v: serde_json::Value| -> u64 {
            serde_json::from_value::<Resource>(json!({"ID": "1", "Downloads": v}))
                .unwrap()
                .downloads
        };
        assert_eq!(parse(json!("42")), 42);
        assert_eq!(parse(json!(7)), 7);
        assert_eq!(parse(json!("12 downloads")), 12);
        assert_eq!(parse(json!("n/a")), 0);
        assert_eq!(parse(json!(null)), 0);
    }

    #[test]
    fn float_cells_drop_trailing_zero() {
        let semester: Semester =
            serde_json::from_value(json!({"ID": 3.0, "SemesterNumber": 3.0})).unwrap();
        assert_eq!(semester.id.as_str(), "3");
        assert_eq!(semester.number, "3");
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let uni: University =
            serde_json::from_value(json!({"ID": "u1", "Name": "AKTU", "Extra": true})).unwrap();
        assert_eq!(uni.name, "AKTU");
    }
}
