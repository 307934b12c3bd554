//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner,
//! UidGenerator) but are themselves concrete structs, not traits.

mod date;
mod package;
mod repo;
mod result_list;

pub use date::DateService;
pub use package::{PackageRequest, PackageService};
pub use repo::{RepoService, SetupRequest};
pub use result_list::{NewItem, ResultListBuilder, SubtitleVariants, TextVariants};
