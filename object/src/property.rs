use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub(crate) struct Property<V> {
    pub(crate) value: V,
    pub(crate) enumerable: bool,
}

/// Own properties in insertion order. Removing a key keeps the order of the others;
/// assigning to an existing key keeps its position.
#[derive(Debug, Clone)]
pub(crate) struct Properties<V>(IndexMap<String, Property<V>>);

impl<V> Default for Properties<V> {
    fn default() -> Self { Self(IndexMap::new()) }
}

impl<V: Clone> Properties<V> {
    pub(crate) fn get(&self, key: &str) -> Option<V> { self.0.get(key).map(|p| p.value.clone()) }

    pub(crate) fn contains(&self, key: &str) -> bool { self.0.contains_key(key) }

    pub(crate) fn keys(&self) -> Vec<String> { self.enumerable().map(|(k, _)| k.clone()).collect() }

    pub(crate) fn values(&self) -> Vec<V> { self.enumerable().map(|(_, v)| v.clone()).collect() }

    pub(crate) fn entries(&self) -> Vec<(String, V)> { self.enumerable().map(|(k, v)| (k.clone(), v.clone())).collect() }

    pub(crate) fn len(&self) -> usize { self.enumerable().count() }

    /// Assigns a value, keeping the enumerable flag of an existing property. Returns the previous value.
    pub(crate) fn assign(&mut self, key: String, value: V) -> Option<V> {
        match self.0.get_mut(&key) {
            Some(property) => Some(std::mem::replace(&mut property.value, value)),
            None => {
                self.0.insert(key, Property { value, enumerable: true });
                None
            }
        }
    }

    /// Defines or redefines a property with an explicit enumerable flag. Returns the previous value.
    pub(crate) fn define(&mut self, key: String, value: V, enumerable: bool) -> Option<V> {
        match self.0.get_mut(&key) {
            Some(property) => {
                property.enumerable = enumerable;
                Some(std::mem::replace(&mut property.value, value))
            }
            None => {
                self.0.insert(key, Property { value, enumerable });
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<V> { self.0.shift_remove(key).map(|p| p.value) }

    fn enumerable(&self) -> impl Iterator<Item = (&String, &V)> { self.0.iter().filter(|(_, p)| p.enumerable).map(|(k, p)| (k, &p.value)) }
}
