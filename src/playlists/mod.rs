pub mod builder;
pub mod navidrome;
pub mod source;

pub use builder::{PlaylistBuildError, PlaylistBuilder};
pub use navidrome::NavidromeSource;
pub use source::{PlaylistContents, PlaylistRef, PlaylistSource, PlaylistSourceError};
