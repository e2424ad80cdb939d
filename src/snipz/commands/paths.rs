use crate::commands::CmdResult;
use crate::error::{Result, SnipzError};
use crate::key;
use crate::store::content::ContentStore;
use crate::store::{self, MetadataStore};

/// Resolves content paths for existing snippets.
pub fn run<M: MetadataStore, K: AsRef<str>>(
    meta: &M,
    content: &ContentStore,
    keys: &[K],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for raw in keys {
        let key = key::normalize(raw.as_ref())?;
        if store::is_reserved(&key) {
            return Err(SnipzError::MetadataNotFound(key));
        }
        let record = meta.get(&key)?;
        result.paths.push(content.path_for(&key)?);
        result.affected.push(record);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{Fixture, NOW};
    use crate::model::{Metadata, SnippetType};
    use chrono::DateTime;

    #[test]
    fn resolves_paths_in_order() {
        let mut fx = Fixture::new();
        fx.save("b", "2");
        fx.save("a/x", "1");

        let result = run(&fx.meta, &fx.content, &["a/x", "b"]).unwrap();

        assert_eq!(
            result.paths,
            vec![fx.dir.path().join("a/x"), fx.dir.path().join("b")]
        );
    }

    #[test]
    fn requires_metadata() {
        let fx = Fixture::new();
        let err = run(&fx.meta, &fx.content, &["ghost"]).unwrap_err();
        assert!(matches!(err, SnipzError::MetadataNotFound(_)));
    }

    #[test]
    fn store_files_have_no_path() {
        let mut fx = Fixture::new();
        let now = DateTime::from_timestamp(NOW, 0).unwrap();
        fx.meta
            .insert(&Metadata::new(".id".to_string(), SnippetType::Text, now))
            .unwrap();

        let err = run(&fx.meta, &fx.content, &[".id"]).unwrap_err();
        assert!(matches!(err, SnipzError::MetadataNotFound(_)));
    }
}
