use std::time::Duration;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
struct CacheSlot {
    domain: String,
    response: Vec<u8>,
    stored_at_ms: u64,
    valid: bool,
}

impl CacheSlot {
    fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.valid && now_ms.saturating_sub(self.stored_at_ms) < ttl_ms
    }
}

/// Fixed arena of raw upstream responses keyed by query name.
///
/// A store for a name already present overwrites that slot; otherwise the
/// first unused slot is taken, then the oldest entry is replaced. Expired
/// entries stay in place until reused.
#[derive(Debug)]
pub struct ResponseCache {
    slots: Vec<CacheSlot>,
    ttl_ms: u64,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            slots: vec![CacheSlot::default(); capacity.max(1)],
            ttl_ms: ttl.as_millis() as u64,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Cached response for `domain` younger than the TTL.
    pub fn lookup(&self, domain: &str, now_ms: u64) -> Option<&[u8]> {
        self.slots
            .iter()
            .find(|slot| slot.is_fresh(now_ms, self.ttl_ms) && slot.domain.eq_ignore_ascii_case(domain))
            .map(|slot| slot.response.as_slice())
    }

    pub fn store(&mut self, domain: &str, response: &[u8], now_ms: u64) {
        let index = self.replacement_slot(domain);
        let slot = &mut self.slots[index];
        slot.domain.clear();
        slot.domain.push_str(domain);
        slot.response.clear();
        slot.response.extend_from_slice(response);
        slot.stored_at_ms = now_ms;
        slot.valid = true;
    }

    fn replacement_slot(&self, domain: &str) -> usize {
        if let Some(index) = self
            .slots
            .iter()
            .position(|s| s.valid && s.domain.eq_ignore_ascii_case(domain))
        {
            return index;
        }
        if let Some(index) = self.slots.iter().position(|s| !s.valid) {
            return index;
        }
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.stored_at_ms)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Number of occupied slots, fresh or expired.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.valid).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.valid = false;
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}
