pub mod conflicts;
pub mod error;
pub mod executor;
pub mod fs;
pub mod listing;
pub mod mapping;
pub mod types;

pub use conflicts::{find_conflicts, Conflict};
pub use error::{ListError, MappingError, ParseError, RenameError, WalkError};
pub use executor::{rename_all, RenameReport};
pub use fs::{FileSystem, MemFs, OsFs, WalkEntry};
pub use listing::{write_identity_mapping, ListSummary};
pub use mapping::{parse_mapping, write_mapping, SEPARATOR};
pub use types::{RenameEntry, RenameOutcome};
