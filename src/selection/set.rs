//! Ordered, duplicate-free set of item ids.
//!
//! Members are kept most-recently-added first, which is the order consumers
//! display them in. The durable encoding is a plain JSON array of integers,
//! e.g. `[3,5]`.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    members: Vec<u64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the durable representation.
    ///
    /// Anything that is not a JSON array of non-negative integers is an error.
    /// Repeated ids keep their first position.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let ids: Vec<u64> = serde_json::from_str(raw)?;
        Ok(ids.into_iter().collect())
    }

    /// Decode, treating a missing or unreadable value as the empty set.
    pub fn decode_or_empty(raw: Option<&str>) -> Self {
        match raw.map(Self::decode) {
            Some(Ok(set)) => set,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "discarding unreadable selection data");
                Self::new()
            }
            None => Self::new(),
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.members.contains(&id)
    }

    /// Insert `id` at the front. Returns `false` if it was already a member.
    pub fn insert_front(&mut self, id: u64) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.insert(0, id);
        true
    }

    /// Remove `id`. Returns `false` if it was not a member.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.members.iter().position(|&m| m == id) {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn members(&self) -> &[u64] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Builds a set from ids listed most recent first; later duplicates are dropped.
impl FromIterator<u64> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut members = Vec::new();
        for id in iter {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        Self { members }
    }
}
