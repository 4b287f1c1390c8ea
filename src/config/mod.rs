//! Configuration module

mod site;

pub use site::ComponentConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
pub use site::TempConfig;
