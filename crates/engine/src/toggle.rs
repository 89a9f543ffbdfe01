//! Add/remove-by-identity editing over selection lists.
//!
//! Countries, MCCs, merchant categories and merchants all share the same
//! semantics: toggling a present value removes it, toggling an absent value
//! appends it. Toggling twice restores the original list.

/// Returns a new list with `value` removed if present, appended otherwise.
///
/// The order of the remaining items is preserved.
#[must_use]
pub fn toggle<T: PartialEq + Clone>(set: &[T], value: T) -> Vec<T> {
    if set.contains(&value) {
        set.iter().filter(|item| **item != value).cloned().collect()
    } else {
        let mut next = Vec::with_capacity(set.len() + 1);
        next.extend_from_slice(set);
        next.push(value);
        next
    }
}

/// Ordered selection of identifiers edited through [`toggle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleSet<T> {
    items: Vec<T>,
}

impl<T> Default for ToggleSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq + Clone> ToggleSet<T> {
    /// Seeds the set, dropping duplicates but keeping first-seen order.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut set = Self::default();
        for item in items {
            if !set.items.contains(&item) {
                set.items.push(item);
            }
        }
        set
    }

    /// Toggles `value`; returns `true` if it is now selected.
    pub fn toggle(&mut self, value: T) -> bool {
        self.items = toggle(&self.items, value.clone());
        self.items.contains(&value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Selected merchant ids with their display names kept at the same index.
///
/// The names let the selection be shown again after the search results that
/// produced it have scrolled away.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerchantSelection {
    ids: Vec<String>,
    names: Vec<String>,
}

impl MerchantSelection {
    /// Rebuilds a selection from stored ids and names.
    ///
    /// Missing names fall back to the id itself so both lists stay aligned.
    pub fn from_parts(ids: Vec<String>, names: Vec<String>) -> Self {
        let mut selection = Self::default();
        for (idx, id) in ids.into_iter().enumerate() {
            if selection.ids.contains(&id) {
                continue;
            }
            let name = names.get(idx).cloned().unwrap_or_else(|| id.clone());
            selection.ids.push(id);
            selection.names.push(name);
        }
        selection
    }

    /// Toggles a merchant id, mirroring the change on the name list.
    ///
    /// Removing drops the name at the id's index; adding appends `name`.
    /// Returns `true` if the merchant is now selected.
    pub fn toggle(&mut self, id: &str, name: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(idx) => {
                self.ids.remove(idx);
                self.names.remove(idx);
                false
            }
            None => {
                self.ids.push(id.to_string());
                self.names.push(name.to_string());
                true
            }
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids
            .iter()
            .zip(self.names.iter())
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}
