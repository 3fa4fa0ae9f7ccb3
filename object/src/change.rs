/// A single property mutation reported to listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<V> {
    pub key: String,
    pub kind: ChangeKind<V>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind<V> {
    /// A new own property
    Added(V),
    /// An existing own property was assigned, possibly to an equal value
    Updated { old: V, new: V },
    /// An own property was deleted
    Removed(V),
}

impl<V> Change<V> {
    pub fn added(key: impl Into<String>, value: V) -> Self { Self { key: key.into(), kind: ChangeKind::Added(value) } }

    pub fn updated(key: impl Into<String>, old: V, new: V) -> Self { Self { key: key.into(), kind: ChangeKind::Updated { old, new } } }

    pub fn removed(key: impl Into<String>, value: V) -> Self { Self { key: key.into(), kind: ChangeKind::Removed(value) } }

    /// The value the property holds after the change, `None` for removals
    pub fn value(&self) -> Option<&V> {
        match &self.kind {
            ChangeKind::Added(value) | ChangeKind::Updated { new: value, .. } => Some(value),
            ChangeKind::Removed(_) => None,
        }
    }
}
