/// Caches a value derived from `K`, rebuilding only when the key changes.
/// `generation` counts builds.
pub struct Memoized<K, V> {
    entry: Option<(K, V)>,
    generation: u64,
}

impl<K, V> Default for Memoized<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            generation: 0,
        }
    }
}

impl<K: PartialEq + Clone, V> Memoized<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` and whether it had to be built.
    pub fn get_or_build(&mut self, key: &K, build: impl FnOnce(&K) -> V) -> (&V, bool) {
        let stale = match &self.entry {
            Some((cached, _)) => cached != key,
            None => true,
        };

        if stale {
            self.entry = None;
            self.generation += 1;
        }

        let (_, value) = self.entry.get_or_insert_with(|| (key.clone(), build(key)));
        (value, stale)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
