pub mod files;
pub mod paths;

pub use files::{update_gitignore, write_files, GITIGNORE_ENTRIES};
pub use paths::{PathUtils, ProjectPaths};
