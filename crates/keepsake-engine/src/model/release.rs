use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::model::{Offset, Section, SectionName};

/// Version and date of a released entry.
///
/// Present only for released entries; the `Unreleased` entry has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMeta {
    /// Bare `major.minor.patch` triple; pre-release and build suffixes are
    /// rejected during parsing.
    pub version: Version,
    /// The `yyyy-mm-dd` release date.
    pub date: NaiveDate,
}

impl ReleaseMeta {
    /// The release date interpreted as UTC midnight.
    pub fn released_at(&self) -> DateTime<Utc> {
        self.date.and_time(NaiveTime::MIN).and_utc()
    }
}

/// One version (or `Unreleased`) entry in the changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Byte range from the header through the last section.
    pub offset: Offset,
    /// Byte range of the `## ...` heading's lines.
    pub header: Offset,
    /// `None` for the `Unreleased` entry.
    pub meta: Option<ReleaseMeta>,
    /// Section names in the order encountered.
    pub sections: Vec<SectionName>,
    /// Sections keyed by name.
    pub section_map: BTreeMap<SectionName, Section>,
}

impl Release {
    pub fn is_unreleased(&self) -> bool {
        self.meta.is_none()
    }

    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.section_map.get(&name)
    }
}
