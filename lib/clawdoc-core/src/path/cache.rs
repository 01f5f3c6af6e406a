use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::trace;

use super::FieldPath;

static COMPILED: LazyLock<RwLock<HashMap<String, Arc<FieldPath>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

pub(super) fn compile(text: &str) -> Arc<FieldPath> {
    {
        let compiled = COMPILED.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(path) = compiled.get(text) {
            return Arc::clone(path);
        }
    }

    let path = Arc::new(FieldPath::parse(text));
    trace!(%text, %path, "compiled field path");

    // Another thread may have published the same text in the meantime, keep the first one
    let mut compiled = COMPILED.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(compiled.entry(text.to_string()).or_insert(path))
}

#[cfg(test)]
pub(super) fn is_cached(text: &str) -> bool {
    COMPILED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(text)
}
