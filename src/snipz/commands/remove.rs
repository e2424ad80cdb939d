use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SnipzError};
use crate::key;
use crate::store::content::ContentStore;
use crate::store::MetadataStore;

/// Deletes the metadata row, then the content file. Without a row there is no
/// snippet, so a stray file is left alone and `MetadataNotFound` is returned.
pub fn run<M: MetadataStore>(meta: &mut M, content: &ContentStore, raw_key: &str) -> Result<CmdResult> {
    let key = key::normalize(raw_key)?;
    meta.delete(&key)?;

    let path = content.path_for(&key)?;
    let mut result = CmdResult::default();
    match content.delete(&path) {
        Ok(()) => {}
        Err(SnipzError::ContentNotFound(_)) => {
            log::warn!("metadata for {key} had no content file at {}", path.display());
            result.add_message(CmdMessage::warning(format!(
                "Content file for {key} was already missing"
            )));
        }
        Err(err) => return Err(err),
    }

    result.add_message(CmdMessage::success(format!("Snippet removed: {key}")));
    Ok(result.with_paths(vec![path]))
}
