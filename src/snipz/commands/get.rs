use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SnipzError};
use crate::key;
use crate::store::content::ContentStore;
use crate::store::{self, MetadataStore};

/// Reads a snippet's content. The file decides success; a missing metadata
/// row only produces a warning.
pub fn run<M: MetadataStore>(meta: &M, content: &ContentStore, raw_key: &str) -> Result<CmdResult> {
    let key = key::normalize(raw_key)?;
    let path = content.path_for(&key)?;
    if store::is_reserved(&key) {
        return Err(SnipzError::ContentNotFound(path));
    }
    let body = content.read(&path)?;

    let mut result = CmdResult::default();
    match meta.get(&key) {
        Ok(record) => result.affected.push(record),
        Err(SnipzError::MetadataNotFound(_)) => {
            log::warn!("content for {key} exists without a metadata row");
            result.add_message(CmdMessage::warning(format!(
                "Snippet {key} has no metadata; it will not show up in list"
            )));
        }
        Err(err) => return Err(err),
    }

    Ok(result.with_content(body))
}
