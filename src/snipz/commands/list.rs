use crate::commands::CmdResult;
use crate::error::{Result, SnipzError};
use crate::store::MetadataStore;
use crate::tags::normalize_tag;

/// A window over the listing: `limit` rows starting at 1-based page `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: usize,
    number: usize,
}

impl Page {
    pub fn new(limit: usize, number: usize) -> Result<Self> {
        if limit == 0 || number == 0 {
            return Err(SnipzError::Config(
                "limit and page must be at least 1".to_string(),
            ));
        }
        Ok(Self { limit, number })
    }

    pub fn first(limit: usize) -> Result<Self> {
        Self::new(limit, 1)
    }

    fn skip(&self) -> usize {
        (self.number - 1).saturating_mul(self.limit)
    }
}

/// Records newest first, optionally limited to those carrying `tag`, then
/// cut down to `page`. Paging applies after the tag filter.
pub fn run<M: MetadataStore>(meta: &M, tag: Option<&str>, page: Option<Page>) -> Result<CmdResult> {
    let mut records = meta.list()?;

    if let Some(wanted) = tag.map(normalize_tag).filter(|t| !t.is_empty()) {
        records.retain(|record| record.tag_list().contains(&wanted));
    }

    if let Some(page) = page {
        records = records
            .into_iter()
            .skip(page.skip())
            .take(page.limit)
            .collect();
    }

    Ok(CmdResult::default().with_listed(records))
}
