use crate::domain_name::{domain_matches, normalize_domain, MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH};
use crate::errors::DomainError;

/// Ordered set of blocked domains, unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockList {
    domains: Vec<String>,
    max_domains: usize,
}

impl BlockList {
    pub fn new(max_domains: usize) -> Self {
        Self {
            domains: Vec::new(),
            max_domains,
        }
    }

    /// Builds a list from persisted entries, skipping invalid ones and
    /// anything past the capacity.
    pub fn from_domains<I, S>(domains: I, max_domains: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new(max_domains);
        for domain in domains {
            if list.add(domain.as_ref()).is_err() {
                continue;
            }
        }
        list
    }

    /// Adds a normalized copy of `domain`. Returns `Ok(false)` if it was
    /// already present.
    pub fn add(&mut self, domain: &str) -> Result<bool, DomainError> {
        let normalized = normalize_domain(domain);
        validate_blocked_domain(&normalized, domain)?;

        if self.contains(&normalized) {
            return Ok(false);
        }
        if self.domains.len() >= self.max_domains {
            return Err(DomainError::BlockListFull(self.max_domains));
        }
        self.domains.push(normalized);
        Ok(true)
    }

    /// Removes the entry equal to `domain` ignoring case.
    pub fn remove(&mut self, domain: &str) -> bool {
        let normalized = normalize_domain(domain);
        let before = self.domains.len();
        self.domains.retain(|d| !d.eq_ignore_ascii_case(&normalized));
        self.domains.len() != before
    }

    pub fn clear(&mut self) {
        self.domains.clear();
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    /// Exact or strict-subdomain match against any entry.
    pub fn is_blocked(&self, domain: &str) -> bool {
        self.domains.iter().any(|blocked| domain_matches(domain, blocked))
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn max_domains(&self) -> usize {
        self.max_domains
    }
}

fn validate_blocked_domain(normalized: &str, raw: &str) -> Result<(), DomainError> {
    if normalized.is_empty() || normalized.len() > MAX_DOMAIN_LENGTH {
        return Err(DomainError::InvalidDomainName(raw.to_string()));
    }
    let valid_chars = normalized
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'_');
    if !valid_chars
        || normalized
            .split('.')
            .any(|label| label.is_empty() || label.len() > MAX_LABEL_LENGTH)
    {
        return Err(DomainError::InvalidDomainName(raw.to_string()));
    }
    Ok(())
}
