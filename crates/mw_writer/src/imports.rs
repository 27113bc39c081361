use alloc::collections::BTreeSet;
use alloc::collections::btree_set;
use alloc::string::String;
use alloc::vec::Vec;

/// A deduplicated set of import statements, e.g. `import datetime`.
///
/// Composition is union: the imports of a container are the imports of
/// everything inside it.
///
/// # Examples
///
/// ```
/// # use mw_writer::ImportSet;
/// let mut imports = ImportSet::from_iter(["import datetime"]);
/// imports.union(ImportSet::from_iter(["from django.utils.timezone import utc", "import datetime"]));
///
/// assert_eq!(imports.len(), 2);
/// assert!(imports.contains("from django.utils.timezone import utc"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet(BTreeSet<String>);

impl ImportSet {
    #[inline]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds a statement, returning `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, statement: impl Into<String>) -> bool {
        self.0.insert(statement.into())
    }

    #[inline]
    pub fn remove(&mut self, statement: &str) -> bool {
        self.0.remove(statement)
    }

    /// Moves every statement of `other` into `self`.
    #[inline]
    pub fn union(&mut self, mut other: ImportSet) {
        self.0.append(&mut other.0);
    }

    #[inline]
    pub fn contains(&self, statement: &str) -> bool {
        self.0.contains(statement)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in lexicographic order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Statements ordered by the module they import from, the way they are
    /// written at the top of a migration file.
    ///
    /// ```
    /// # use mw_writer::ImportSet;
    /// let imports = ImportSet::from_iter(["import re", "from django.conf import settings", "import datetime"]);
    /// assert_eq!(
    ///     imports.sorted_by_module(),
    ///     ["import datetime", "from django.conf import settings", "import re"],
    /// );
    /// ```
    pub fn sorted_by_module(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.iter().collect();
        lines.sort_by(|a, b| module_of(a).cmp(module_of(b)).then_with(|| a.cmp(b)));
        lines
    }
}

// The second word of `import x` / `from x import y`.
fn module_of(statement: &str) -> &str {
    statement.split_whitespace().nth(1).unwrap_or(statement)
}

impl<S: Into<String>> FromIterator<S> for ImportSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for ImportSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ImportSet {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ImportSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
