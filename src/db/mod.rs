pub mod memory_archive;
pub mod workflow_archive;

pub use memory_archive::InMemoryArchive;
pub use workflow_archive::{ArchiveError, NullArchive, WorkflowArchive};
