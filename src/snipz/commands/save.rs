use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SnipzError};
use crate::key;
use crate::keygen::KeyGenerator;
use crate::model::{detect_type, Metadata};
use crate::store::content::ContentStore;
use crate::store::{self, MetadataStore};
use crate::tags;

#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub key: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub content: Vec<u8>,
}

impl SaveRequest {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }
}

pub fn run<M: MetadataStore>(
    meta: &mut M,
    content: &ContentStore,
    keygen: &KeyGenerator,
    clock: &dyn Clock,
    request: SaveRequest,
) -> Result<CmdResult> {
    if request.content.is_empty() {
        return Err(SnipzError::EmptyContent);
    }

    let now = clock.now();
    let key = match request.key.as_deref() {
        Some(raw) if !raw.trim().is_empty() => key::normalize(raw)?,
        _ => {
            let mut exists =
                |candidate: &str| -> Result<bool> { content.exists(&content.path_for(candidate)?) };
            keygen.generate(now, Some(&mut exists))?
        }
    };

    if store::is_reserved(&key) {
        return Err(SnipzError::SnippetExists(key));
    }

    let path = content.path_for(&key)?;
    if content.exists(&path)? {
        return Err(SnipzError::SnippetExists(key));
    }

    content.save(&path, request.content.as_slice())?;

    let record = Metadata::new(key.clone(), detect_type(&request.content), now)
        .with_description(request.description)
        .with_tags(tags::merge_tags("", &request.tags, &[] as &[&str]));

    if let Err(err) = meta.insert(&record) {
        log::warn!("metadata insert for {key} failed, removing content: {err}");
        if let Err(cleanup) = content.delete(&path) {
            log::warn!("could not remove {}: {cleanup}", path.display());
        }
        return Err(match err {
            SnipzError::Duplicate(key) => SnipzError::SnippetExists(key),
            other => other,
        });
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Snippet saved: {key}")));
    Ok(result.with_affected(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{Fixture, NOW};
    use crate::keygen::KeyStrategy;
    use crate::model::SnippetType;
    use std::fs;

    fn save(fx: &mut Fixture, request: SaveRequest) -> Result<CmdResult> {
        run(&mut fx.meta, &fx.content, &fx.keygen, &fx.clock, request)
    }

    #[test]
    fn saves_content_and_metadata() {
        let mut fx = Fixture::new();
        let request = SaveRequest::new(b"package main\n".to_vec())
            .with_key(" go/foo ")
            .with_description("entry point")
            .with_tags(&["Go", "utils", "go"]);

        let result = save(&mut fx, request).unwrap();

        let record = result.record().unwrap();
        assert_eq!(record.key, "go/foo");
        assert_eq!(record.tags, "go,utils");
        assert_eq!(record.kind, SnippetType::Text);
        assert_eq!(record.description, "entry point");
        assert_eq!(record.created.timestamp(), NOW);
        assert_eq!(record.created, record.modified);
        assert_eq!(fx.meta.get("go/foo").unwrap(), *record);
        assert_eq!(
            fs::read(fx.dir.path().join("go/foo")).unwrap(),
            b"package main\n"
        );
    }

    #[test]
    fn detects_url_snippets() {
        let mut fx = Fixture::new();
        let request = SaveRequest::new(b"https://example.com\n".to_vec()).with_key("link");
        let result = save(&mut fx, request).unwrap();
        assert_eq!(result.record().unwrap().kind, SnippetType::Url);
    }

    #[test]
    fn empty_content_is_rejected_before_any_write() {
        let mut fx = Fixture::new();
        let err = save(&mut fx, SaveRequest::new(Vec::new()).with_key("k")).unwrap_err();
        assert!(matches!(err, SnipzError::EmptyContent));
        assert!(fx.meta.is_empty());
        assert!(!fx.dir.path().join("k").exists());
    }

    #[test]
    fn invalid_key_is_rejected() {
        let mut fx = Fixture::new();
        let err = save(&mut fx, SaveRequest::new(b"x".to_vec()).with_key("../x")).unwrap_err();
        assert!(matches!(err, SnipzError::Key(_)));
        assert!(fx.meta.is_empty());
    }

    #[test]
    fn second_save_with_same_key_is_snippet_exists() {
        let mut fx = Fixture::new();
        fx.save("dup", "first");

        let err = save(&mut fx, SaveRequest::new(b"second".to_vec()).with_key("dup")).unwrap_err();

        assert!(matches!(err, SnipzError::SnippetExists(k) if k == "dup"));
        assert_eq!(fs::read(fx.dir.path().join("dup")).unwrap(), b"first");
        assert_eq!(fx.meta.len(), 1);
    }

    #[test]
    fn duplicate_row_compensates_by_deleting_new_content() {
        let mut fx = Fixture::new();
        // A row without a file: the content check passes, the insert collides.
        fx.meta
            .insert(&Metadata::new(
                "orphan".into(),
                SnippetType::Text,
                fx.clock.0,
            ))
            .unwrap();

        let err =
            save(&mut fx, SaveRequest::new(b"second".to_vec()).with_key("orphan")).unwrap_err();

        assert!(matches!(err, SnipzError::SnippetExists(k) if k == "orphan"));
        assert!(!fx.dir.path().join("orphan").exists());
    }

    #[test]
    fn failing_insert_propagates_and_compensates() {
        struct BrokenStore;
        impl MetadataStore for BrokenStore {
            fn insert(&mut self, _: &Metadata) -> Result<()> {
                Err(SnipzError::Io(std::io::Error::other("db gone")))
            }
            fn get(&self, key: &str) -> Result<Metadata> {
                Err(SnipzError::MetadataNotFound(key.into()))
            }
            fn list(&self) -> Result<Vec<Metadata>> {
                Ok(Vec::new())
            }
            fn update(&mut self, r: &Metadata) -> Result<()> {
                Err(SnipzError::MetadataNotFound(r.key.clone()))
            }
            fn delete(&mut self, key: &str) -> Result<()> {
                Err(SnipzError::MetadataNotFound(key.into()))
            }
        }

        let fx = Fixture::new();
        let err = run(
            &mut BrokenStore,
            &fx.content,
            &fx.keygen,
            &fx.clock,
            SaveRequest::new(b"x".to_vec()).with_key("k"),
        )
        .unwrap_err();

        assert!(matches!(err, SnipzError::Io(_)));
        assert!(!fx.dir.path().join("k").exists());
    }

    #[test]
    fn reserved_names_are_refused() {
        let mut fx = Fixture::new();
        for name in [".meta.db", ".id", "config.json"] {
            let err = save(&mut fx, SaveRequest::new(b"x".to_vec()).with_key(name)).unwrap_err();
            assert!(matches!(err, SnipzError::SnippetExists(_)), "{name}");
        }
        assert!(fx.meta.is_empty());
    }

    #[test]
    fn auto_key_skips_taken_timestamps() {
        let mut fx = Fixture::new();
        fx.save(&format!("auto/{NOW}"), "taken");

        let result = save(&mut fx, SaveRequest::new(b"fresh".to_vec())).unwrap();

        assert_eq!(result.record().unwrap().key, format!("auto/{NOW}-1"));
        let again = save(&mut fx, SaveRequest::new(b"again".to_vec())).unwrap();
        assert_eq!(again.record().unwrap().key, format!("auto/{NOW}-2"));
    }

    #[test]
    fn blank_key_is_generated() {
        let mut fx = Fixture::new();
        let request = SaveRequest::new(b"x".to_vec()).with_key("  \t");

        let result = save(&mut fx, request).unwrap();

        assert_eq!(result.record().unwrap().key, format!("auto/{NOW}"));
    }

    #[test]
    fn counter_strategy_hands_out_numbers() {
        let mut fx = Fixture::new();
        fx.keygen = KeyGenerator::for_strategy(KeyStrategy::Counter, fx.dir.path());
        fx.save("2", "manual");

        let mut keys = Vec::new();
        for _ in 0..2 {
            let result = save(&mut fx, SaveRequest::new(b"n".to_vec())).unwrap();
            keys.push(result.record().unwrap().key.clone());
        }

        assert_eq!(keys, vec!["1", "3"]);
    }
}
