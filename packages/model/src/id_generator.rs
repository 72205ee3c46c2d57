use crate::component::ComponentId;
use crc32fast::Hasher;

/// Derive a session seed from a document name using CRC32
pub fn get_document_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for builder components within a session.
///
/// The counter only moves forward, so an id handed out once is never
/// produced again even after its node is removed.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(document_name: &str) -> Self {
        Self {
            seed: get_document_seed(document_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Resume after `count` ids have already been issued
    pub fn resume(seed: impl Into<String>, count: u64) -> Self {
        Self {
            seed: seed.into(),
            count,
        }
    }

    pub fn new_id(&mut self) -> ComponentId {
        self.count += 1;
        ComponentId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn issued(&self) -> u64 {
        self.count
    }

    /// Advance past any id in `ids` that carries this generator's seed, so
    /// ids loaded from a snapshot are never issued again.
    pub fn observe<'a>(&mut self, ids: impl IntoIterator<Item = &'a ComponentId>) {
        let prefix = format!("{}-", self.seed);
        for id in ids {
            if let Some(n) = id
                .as_str()
                .strip_prefix(&prefix)
                .and_then(|rest| rest.parse::<u64>().ok())
            {
                self.count = self.count.max(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable_per_name() {
        assert_eq!(get_document_seed("welcome"), get_document_seed("welcome"));
        assert_ne!(get_document_seed("welcome"), get_document_seed("newsletter"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("welcome");
        let a = gen.new_id();
        let b = gen.new_id();

        assert!(a.as_str().ends_with("-1"));
        assert!(b.as_str().ends_with("-2"));
        assert!(a.as_str().starts_with(gen.seed()));
        assert_eq!(gen.issued(), 2);
    }

    #[test]
    fn test_observe_skips_loaded_ids() {
        let mut gen = IdGenerator::from_seed("abc");
        let loaded = vec![
            ComponentId::new("abc-7"),
            ComponentId::new("abc-3"),
            ComponentId::new("other-40"),
        ];
        gen.observe(&loaded);

        assert_eq!(gen.new_id().as_str(), "abc-8");
    }
}
