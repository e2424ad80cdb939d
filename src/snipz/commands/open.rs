use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::key;
use crate::launcher::Launcher;
use crate::model::{first_non_empty_line, SnippetType};
use crate::store::content::ContentStore;
use crate::store::MetadataStore;

/// What `open` should hand the snippet to.
pub enum Viewer<'a> {
    /// The opener gets the URL of `url` snippets and the path of anything else.
    Opener(&'a dyn Launcher),
    /// The pager always gets the path.
    Pager(&'a dyn Launcher),
}

pub fn run<M: MetadataStore>(
    meta: &M,
    content: &ContentStore,
    viewer: Viewer<'_>,
    raw_key: &str,
) -> Result<CmdResult> {
    let key = key::normalize(raw_key)?;
    let record = meta.get(&key)?;
    let path = content.path_for(&key)?;
    let path_str = path.to_string_lossy().to_string();

    let target = match viewer {
        Viewer::Pager(pager) => {
            pager.invoke(&path_str)?;
            path_str
        }
        Viewer::Opener(opener) => {
            let target = if record.kind == SnippetType::Url {
                let body = content.read(&path)?;
                first_non_empty_line(&body).unwrap_or(path_str)
            } else {
                path_str
            };
            opener.invoke(&target)?;
            target
        }
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Opened {target}")));
    Ok(result.with_affected(vec![record]).with_paths(vec![path]))
}
