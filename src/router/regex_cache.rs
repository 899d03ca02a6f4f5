//! Memoizes compiled regexes by source pattern, shared across routes.

use hashbrown::HashMap;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;

#[derive(Default)]
pub struct RegexCache {
    entries: Mutex<HashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        RegexCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached regex for `pattern`, compiling and inserting on a
    /// miss. Compilation is idempotent, so a racing duplicate compile under
    /// contention is a minor waste, not a correctness bug.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, String> {
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.get(pattern) {
            return Ok(Arc::clone(existing));
        }

        let compiled = Arc::new(Regex::new(pattern).map_err(|e| e.to_string())?);
        entries.insert(pattern.to_owned(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
