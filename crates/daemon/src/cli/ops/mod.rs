pub mod info;
pub mod probe;
pub mod publish;
pub mod serve;
pub mod unpublish;
pub mod version;

pub use info::Info;
pub use probe::Probe;
pub use publish::Publish;
pub use serve::Serve;
pub use unpublish::Unpublish;
pub use version::Version;
