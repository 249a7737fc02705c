//! CLI commands implementation

pub mod download;
pub mod init;
pub mod lookup;
pub mod maintenance;
pub mod pipeline;
pub mod populate;
pub mod status;

pub use download::*;
pub use init::*;
pub use lookup::*;
pub use maintenance::*;
pub use pipeline::*;
pub use populate::*;
pub use status::*;
