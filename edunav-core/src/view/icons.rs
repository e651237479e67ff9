//! src/view/icons.rs
//! ============================================================================
//! # Catalog Icons (Nerd Fonts)
//!
//! Nerd Font glyphs for each level of the catalog and for resource kinds.

use crate::model::navigation::ViewLevel;

pub const COURSE_ICON: &str = "󰑴";
pub const BRANCH_ICON: &str = "";
pub const SEMESTER_ICON: &str = "";
pub const SUBJECT_ICON: &str = "";

pub const NOTES_ICON: &str = "";
pub const PYQ_ICON: &str = "";
pub const VIDEO_ICON: &str = "";
pub const RESOURCE_ICON: &str = "";

pub const BOOKMARK_ICON: &str = "";
pub const DOWNLOADED_ICON: &str = "";

pub const fn level_icon(level: ViewLevel) -> &'static str {
    match level {
        ViewLevel::Course => COURSE_ICON,
        ViewLevel::Branch => BRANCH_ICON,
        ViewLevel::Semester => SEMESTER_ICON,
        ViewLevel::Subject => SUBJECT_ICON,
        ViewLevel::Resource => RESOURCE_ICON,
    }
}

pub fn resource_icon(kind: &str) -> &'static str {
    match kind.to_ascii_lowercase().as_str() {
        "notes" => NOTES_ICON,
        "pyq" => PYQ_ICON,
        "video" => VIDEO_ICON,
        _ => RESOURCE_ICON,
    }
}
