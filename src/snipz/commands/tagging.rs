use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::key;
use crate::store::MetadataStore;
use crate::tags;

/// Adds and removes tags on one snippet. The row is only rewritten when the
/// canonical tag string changes.
pub fn run<M: MetadataStore, A: AsRef<str>, R: AsRef<str>>(
    meta: &mut M,
    clock: &dyn Clock,
    raw_key: &str,
    add: &[A],
    remove: &[R],
) -> Result<CmdResult> {
    let key = key::normalize(raw_key)?;
    let mut record = meta.get(&key)?;

    let before = record.tag_list();
    let merged = tags::merge_tags(&record.tags, add, remove);
    let after = tags::parse_tags(&merged);

    let mut result = CmdResult::default();
    if merged == record.tags {
        result.add_message(CmdMessage::info(format!("Tags unchanged: {key}")));
    } else {
        record.tags = merged;
        record.modified = clock.now();
        meta.update(&record)?;
        result.add_message(CmdMessage::success(format!(
            "Tags updated: {key} [{}]",
            record.tags
        )));
    }

    result.tags_added = tags::diff(&after, &before);
    result.tags_removed = tags::diff(&before, &after);
    Ok(result.with_affected(vec![record]))
}
