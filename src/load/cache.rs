use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, RwLock},
};
use tracing::debug;

use super::{ColumnRange, LoadRequest, TableSource};
use crate::error::Result;
use crate::table::RawTable;

/// Load parameters that identify a cached table. The row limit is not part
/// of the key: the full table is cached and trimmed on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: PathBuf,
    sheet: String,
    columns: ColumnRange,
    header_row: usize,
}

impl From<&LoadRequest> for CacheKey {
    fn from(req: &LoadRequest) -> Self {
        Self {
            source: req.source.clone(),
            sheet: req.sheet.clone(),
            columns: req.columns,
            header_row: req.header_row,
        }
    }
}

/// Memoizing wrapper around any `TableSource`.
///
/// Failed loads are not cached, so a missing file is retried on the next call.
pub struct CachedSource<S> {
    inner: S,
    map: RwLock<HashMap<CacheKey, Arc<RawTable>>>,
}

impl<S: TableSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            map: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every cached table.
    pub fn clear(&self) {
        if let Ok(mut map) = self.map.write() {
            map.clear();
        }
    }
}

impl<S: TableSource> TableSource for CachedSource<S> {
    fn load(&self, request: &LoadRequest) -> Result<RawTable> {
        let key = CacheKey::from(request);

        // Fast-path: cached table
        let hit = self
            .map
            .read()
            .ok()
            .and_then(|map| map.get(&key).cloned());
        if let Some(table) = hit {
            debug!(path = %request.source.display(), "cache hit");
            return Ok(table.as_ref().clone().truncated(request.max_rows));
        }

        let full = LoadRequest {
            max_rows: None,
            ..request.clone()
        };
        let table = Arc::new(self.inner.load(&full)?);
        if let Ok(mut map) = self.map.write() {
            map.insert(key, Arc::clone(&table));
        }
        Ok(table.as_ref().clone().truncated(request.max_rows))
    }
}
