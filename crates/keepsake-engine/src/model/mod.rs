pub mod changelog;
pub mod offset;
pub mod release;
pub mod section;

pub use changelog::{Changelog, SectionFragment};
pub use offset::Offset;
pub use release::{Release, ReleaseMeta};
pub use section::{Item, Section, SectionName, UnknownSectionName};
