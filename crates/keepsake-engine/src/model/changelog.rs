use std::collections::BTreeMap;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::model::{Offset, Release, Section, SectionName};

/// A fully validated changelog document.
///
/// The model is produced in one pass over an immutable source string and
/// never mutated afterwards. Callers that need to edit the document slice
/// `source` with the recorded offsets and splice the replacement text in,
/// which preserves every byte the parser didn't claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// The exact text the model was parsed from.
    pub source: String,
    /// Releases in document order; `Unreleased` can only be first.
    pub releases: Vec<Release>,
    /// Document start up to just before the first release header.
    pub preamble: Offset,
    /// Everything after the last release, where reference-style link
    /// definitions live. May be empty.
    pub links: Offset,
}

impl Changelog {
    /// The `Unreleased` entry, if the document has one.
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.first().filter(|r| r.is_unreleased())
    }

    /// The release entry for an exact version, if present.
    pub fn release_for(&self, version: &Version) -> Option<&Release> {
        self.releases
            .iter()
            .find(|r| r.meta.as_ref().is_some_and(|m| m.version == *version))
    }
}

/// A parsed changelog fragment: a bare section list without the document
/// wrapper, e.g. the changelog portion of a pull-request description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFragment {
    /// Section names in the order encountered.
    pub sections: Vec<SectionName>,
    /// Sections keyed by name.
    pub section_map: BTreeMap<SectionName, Section>,
}

impl SectionFragment {
    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.section_map.get(&name)
    }
}
