pub mod collection;
pub mod film;
pub mod metadata;
pub mod person;
pub mod site;

pub use collection::CollectionEntry;
pub use film::FilmRecord;
pub use metadata::{CastEntry, DirectorEntry, MetadataBundle};
pub use person::{FilmographyEntry, PersonRecord, Role};
pub use site::{Chapter, SceneReview, SearchCandidate, SiteDetails};
