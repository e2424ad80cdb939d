use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::key;
use crate::launcher::Launcher;
use crate::model::detect_type;
use crate::store::content::ContentStore;
use crate::store::MetadataStore;

/// Hands the content file to `editor` and records the result.
///
/// The file's mtime and size are compared before and after; when both are
/// unchanged the stored row is returned as is. Otherwise the content is
/// re-read, its type detected again and `modified` set to now.
pub fn run<M: MetadataStore>(
    meta: &mut M,
    content: &ContentStore,
    clock: &dyn Clock,
    editor: &dyn Launcher,
    raw_key: &str,
) -> Result<CmdResult> {
    let key = key::normalize(raw_key)?;
    let mut record = meta.get(&key)?;
    let path = content.path_for(&key)?;

    let before = content.stat(&path)?;
    editor.invoke(&path.to_string_lossy())?;
    let after = content.stat(&path)?;

    let mut result = CmdResult::default().with_paths(vec![path.clone()]);
    if before == after {
        log::debug!("{key} unchanged after edit");
        result.add_message(CmdMessage::info(format!("No changes: {key}")));
        return Ok(result.with_affected(vec![record]));
    }

    let body = content.read(&path)?;
    record.kind = detect_type(&body);
    record.modified = clock.now();
    meta.update(&record)?;

    result.add_message(CmdMessage::success(format!("Snippet updated: {key}")));
    Ok(result.with_affected(vec![record]))
}
