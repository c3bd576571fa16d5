use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity comparison, kept apart from structural `PartialEq`.
///
/// Two values can be "the same entry" (for duplicate detection and
/// replacement lookups) while differing in other fields.
pub trait Identity {
    /// Whether `self` and `other` denote the same entry.
    fn is_same(&self, other: &Self) -> bool;

    /// Short human-readable key naming this entry in error messages.
    fn identity_key(&self) -> String;
}

/// Error type for unique list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("duplicate entry: {0}")]
    Duplicate(String),
    #[error("entry not found: {0}")]
    NotFound(String),
}

/// An ordered list in which no two elements are the same under [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        UniqueList { items: Vec::new() }
    }
}

impl<T: Identity> UniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `items`, rejecting internal collisions.
    pub fn from_vec(items: Vec<T>) -> Result<Self, ListError> {
        if let Some(dup) = first_collision(&items) {
            return Err(ListError::Duplicate(dup.identity_key()));
        }
        Ok(UniqueList { items })
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing.is_same(item))
    }

    /// Position of the first element that is the same as `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|existing| existing.is_same(item))
    }

    /// Append `item`. Fails if an identity match already exists.
    pub fn add(&mut self, item: T) -> Result<(), ListError> {
        if self.contains(&item) {
            return Err(ListError::Duplicate(item.identity_key()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Substitute `replacement` for `target`, keeping its position.
    ///
    /// Fails if `target` is absent, or if `replacement` is the same as some
    /// element other than `target`.
    pub fn replace(&mut self, target: &T, replacement: T) -> Result<(), ListError> {
        let index = self
            .position(target)
            .ok_or_else(|| ListError::NotFound(target.identity_key()))?;
        let collides = self
            .items
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.is_same(&replacement));
        if collides {
            return Err(ListError::Duplicate(replacement.identity_key()));
        }
        self.items[index] = replacement;
        Ok(())
    }

    /// Remove the first element that is the same as `target`.
    pub fn remove(&mut self, target: &T) -> Result<T, ListError> {
        let index = self
            .position(target)
            .ok_or_else(|| ListError::NotFound(target.identity_key()))?;
        Ok(self.items.remove(index))
    }

    /// Replace the whole backing sequence. Fails (leaving the list
    /// untouched) if `items` contains an internal collision.
    pub fn set_all(&mut self, items: Vec<T>) -> Result<(), ListError> {
        *self = Self::from_vec(items)?;
        Ok(())
    }
}

impl<T> UniqueList<T> {
    /// Read-only view of the elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn first_collision<T: Identity>(items: &[T]) -> Option<&T> {
    items
        .iter()
        .enumerate()
        .find(|(i, item)| items[..*i].iter().any(|earlier| earlier.is_same(item)))
        .map(|(_, item)| item)
}

impl<T: Serialize> Serialize for UniqueList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for UniqueList<T>
where
    T: Deserialize<'de> + Identity,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        UniqueList::from_vec(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keyed by the first field only
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Entry(String, u32);

    impl Identity for Entry {
        fn is_same(&self, other: &Self) -> bool {
            self.0 == other.0
        }

        fn identity_key(&self) -> String {
            self.0.clone()
        }
    }

    fn entry(key: &str, n: u32) -> Entry {
        Entry(key.into(), n)
    }

    fn list(keys: &[&str]) -> UniqueList<Entry> {
        UniqueList::from_vec(keys.iter().map(|k| entry(k, 0)).collect()).unwrap()
    }

    #[test]
    fn add_appends_in_order() {
        let mut l = UniqueList::new();
        l.add(entry("a", 0)).unwrap();
        l.add(entry("b", 0)).unwrap();
        let keys: Vec<_> = l.iter().map(|e| e.0.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn add_rejects_identity_match() {
        let mut l = list(&["a"]);
        let err = l.add(entry("a", 7)).unwrap_err();
        assert_eq!(err, ListError::Duplicate("a".into()));
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn replace_keeps_position() {
        let mut l = list(&["a", "b", "c"]);
        l.replace(&entry("b", 99), entry("z", 1)).unwrap();
        let keys: Vec<_> = l.iter().map(|e| e.0.as_str()).collect();
        assert_eq!(keys, vec!["a", "z", "c"]);
    }

    #[test]
    fn replace_with_same_identity_is_allowed() {
        let mut l = list(&["a", "b"]);
        l.replace(&entry("a", 0), entry("a", 5)).unwrap();
        assert_eq!(l.get(0), Some(&entry("a", 5)));
    }

    #[test]
    fn replace_missing_target_fails() {
        let mut l = list(&["a"]);
        let err = l.replace(&entry("x", 0), entry("y", 0)).unwrap_err();
        assert_eq!(err, ListError::NotFound("x".into()));
    }

    #[test]
    fn replace_colliding_with_other_fails() {
        let mut l = list(&["a", "b"]);
        let err = l.replace(&entry("a", 0), entry("b", 3)).unwrap_err();
        assert_eq!(err, ListError::Duplicate("b".into()));
        assert_eq!(l, list(&["a", "b"]));
    }

    #[test]
    fn remove_then_readd() {
        let mut l = list(&["a", "b"]);
        let removed = l.remove(&entry("a", 42)).unwrap();
        assert_eq!(removed, entry("a", 0));
        l.add(entry("a", 1)).unwrap();
        assert_eq!(l.len(), 2);
        assert!(l.remove(&entry("q", 0)).is_err());
    }

    #[test]
    fn set_all_rejects_internal_collision() {
        let mut l = list(&["a"]);
        let err = l.set_all(vec![entry("x", 0), entry("x", 1)]).unwrap_err();
        assert_eq!(err, ListError::Duplicate("x".into()));
        assert_eq!(l, list(&["a"]));
        l.set_all(vec![entry("p", 0), entry("q", 0)]).unwrap();
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn deserialize_rejects_duplicates() {
        let ok: UniqueList<Entry> = serde_json::from_str(r#"[["a",1],["b",2]]"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<UniqueList<Entry>>(r#"[["a",1],["a",2]]"#);
        assert!(bad.is_err());
    }
}
