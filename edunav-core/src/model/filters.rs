//! ``src/model/filters.rs``
//! ============================================================================
//! # Resource filters
//!
//! Two orthogonal predicates (resource type, language) applied on top of the
//! subject-scoped resource set. Filtering is order-stable: results keep the
//! provider's relative order and are never ranked or sorted.

use std::fmt;

use compact_str::CompactString;

use crate::model::records::{RecordId, Resource};

/// Kinds offered even when the current subject has none of them.
pub const DEFAULT_RESOURCE_KINDS: [&str; 3] = ["Notes", "PYQ", "Video"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterValue {
    #[default]
    All,
    Only(CompactString),
}

impl FilterValue {
    pub fn only(value: impl Into<CompactString>) -> Self {
        Self::Only(value.into())
    }

    /// "all" (any case) means no filtering, as in the original filter UI.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::only(trimmed)
        }
    }

    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted.as_str()),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilters {
    pub resource_type: FilterValue,
    pub language: FilterValue,
}

impl ResourceFilters {
    #[must_use]
    pub fn accepts(&self, resource: &Resource) -> bool {
        self.resource_type.matches(Some(resource.kind.as_str()))
            && self.language.matches(resource.language.as_deref())
    }
}

/// Resources of `subject` passing both filters, in original order.
pub fn apply_filters<'a>(
    resources: &'a [Resource],
    subject: &RecordId,
    filters: &ResourceFilters,
) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|r| &r.subject_id == subject)
        .filter(|r| filters.resource_type.matches(Some(r.kind.as_str())))
        .filter(|r| filters.language.matches(r.language.as_deref()))
        .collect()
}

/// Type choices for a subject: All, the defaults, then any other kind
/// present, first-seen order.
pub fn type_options<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Vec<FilterValue> {
    let mut options: Vec<FilterValue> = std::iter::once(FilterValue::All)
        .chain(DEFAULT_RESOURCE_KINDS.iter().map(|k| FilterValue::only(*k)))
        .collect();
    for resource in resources {
        push_unique(&mut options, &resource.kind);
    }
    options
}

/// Language choices for a subject: All, then languages present.
pub fn language_options<'a>(
    resources: impl IntoIterator<Item = &'a Resource>,
) -> Vec<FilterValue> {
    let mut options = vec![FilterValue::All];
    for resource in resources {
        if let Some(language) = resource.language.as_deref() {
            push_unique(&mut options, language);
        }
    }
    options
}

fn push_unique(options: &mut Vec<FilterValue>, value: &str) {
    if value.is_empty() {
        return;
    }
    let candidate = FilterValue::only(value);
    if !options.contains(&candidate) {
        options.push(candidate);
    }
}

/// Option after `current`, wrapping; `All` when `current` is not offered.
#[must_use]
pub fn next_option(options: &[FilterValue], current: &FilterValue) -> FilterValue {
    options
        .iter()
        .position(|o| o == current)
        .and_then(|pos| options.get((pos + 1) % options.len()))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::fixtures::resource;
    use proptest::prelude::*;

    fn ids(resources: &[&Resource]) -> Vec<String> {
        resources.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn type_filter_keeps_matching_kind() {
        let resources = vec![
            resource("100", "5", "Video", "en"),
            resource("101", "5", "Notes", "hi"),
        ];
        let filters = ResourceFilters {
            resource_type: FilterValue::only("Notes"),
            language: FilterValue::All,
        };
        let out = apply_filters(&resources, &"5".into(), &filters);
        assert_eq!(ids(&out), ["101"]);
    }

    #[test]
    fn language_filter_excludes_missing_language() {
        let mut untagged = resource("102", "5", "Notes", "en");
        untagged.language = None;
        let resources = vec![resource("100", "5", "Video", "en"), untagged];
        let filters = ResourceFilters {
            resource_type: FilterValue::All,
            language: FilterValue::only("en"),
        };
        assert_eq!(ids(&apply_filters(&resources, &"5".into(), &filters)), ["100"]);
    }

    #[test]
    fn parse_treats_all_case_insensitively() {
        assert_eq!(FilterValue::parse("ALL"), FilterValue::All);
        assert_eq!(FilterValue::parse(""), FilterValue::All);
        assert_eq!(FilterValue::parse(" PYQ "), FilterValue::only("PYQ"));
    }

    #[test]
    fn options_include_defaults_and_present_values() {
        let resources = [
            resource("1", "5", "Lab", "hi"),
            resource("2", "5", "Notes", "en"),
            resource("3", "5", "Lab", "hi"),
        ];
        let types = type_options(&resources);
        assert_eq!(
            types,
            [
                FilterValue::All,
                FilterValue::only("Notes"),
                FilterValue::only("PYQ"),
                FilterValue::only("Video"),
                FilterValue::only("Lab"),
            ]
        );
        let langs = language_options(&resources);
        assert_eq!(
            langs,
            [FilterValue::All, FilterValue::only("hi"), FilterValue::only("en")]
        );
    }

    #[test]
    fn next_option_wraps_and_recovers() {
        let options = [FilterValue::All, FilterValue::only("en")];
        assert_eq!(next_option(&options, &FilterValue::All), FilterValue::only("en"));
        assert_eq!(next_option(&options, &FilterValue::only("en")), FilterValue::All);
        assert_eq!(next_option(&options, &FilterValue::only("fr")), FilterValue::All);
    }

    fn arb_resources() -> impl Strategy<Value = Vec<Resource>> {
        let kinds = prop::sample::select(vec!["Notes", "PYQ", "Video"]);
        let langs = prop::sample::select(vec!["en", "hi"]);
        let subjects = prop::sample::select(vec!["5", "6"]);
        prop::collection::vec((subjects, kinds, langs), 0..24).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (s, k, l))| resource(&i.to_string(), s, k, l))
                .collect()
        })
    }

    fn arb_filter() -> impl Strategy<Value = FilterValue> {
        prop_oneof![
            Just(FilterValue::All),
            prop::sample::select(vec!["Notes", "PYQ", "Video", "en", "hi"])
                .prop_map(FilterValue::only),
        ]
    }

    proptest! {
        #[test]
        fn all_all_returns_exactly_subject_resources(resources in arb_resources()) {
            let out = apply_filters(&resources, &"5".into(), &ResourceFilters::default());
            let expected: Vec<&Resource> =
                resources.iter().filter(|r| r.subject_id.as_str() == "5").collect();
            prop_assert_eq!(out, expected);
        }

        #[test]
        fn filtering_is_idempotent(
            resources in arb_resources(),
            resource_type in arb_filter(),
            language in arb_filter(),
        ) {
            let filters = ResourceFilters { resource_type, language };
            let once: Vec<Resource> = apply_filters(&resources, &"5".into(), &filters)
                .into_iter()
                .cloned()
                .collect();
            let twice = apply_filters(&once, &"5".into(), &filters);
            prop_assert_eq!(twice, once.iter().collect::<Vec<_>>());
        }

        #[test]
        fn filtering_preserves_relative_order(
            resources in arb_resources(),
            resource_type in arb_filter(),
        ) {
            let filters = ResourceFilters { resource_type, language: FilterValue::All };
            let out = apply_filters(&resources, &"5".into(), &filters);
            let positions: Vec<usize> = out
                .iter()
                .map(|r| resources.iter().position(|x| x.id == r.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
