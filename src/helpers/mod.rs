//! Helper functions shared by the server, the generator and the templates

mod url;

pub use url::*;
