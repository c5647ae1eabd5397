//! HTML templates embedded into the binary at compile time.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "templates/"]
pub(crate) struct Templates;
impl Templates {
    /// Load a template's source by file name.
    pub(crate) fn load(name: &str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::AssetNotFound(name.to_string()))
    }

    /// Names of every embedded template.
    pub(crate) fn names() -> impl Iterator<Item = String> {
        Self::iter().filter(|f| f.ends_with(".html")).map(|f| f.into_owned())
    }
}
