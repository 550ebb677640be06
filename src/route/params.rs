use crate::lexer::ParamVec;

/// Captured values of one request, addressable by position or by declared name
///
/// Positions always work, which is how routes built from a raw regex are
/// consumed. Declared names come from the route pattern; when a name is
/// declared twice the first occurrence wins.
///
/// Two synthetic views carry the full context: [`request`](Self::request)
/// (also reachable through the `request_` key) and [`values`](Self::values),
/// the ordered list of every capture.
#[derive(Debug, Clone)]
pub struct ParamValues<'a> {
    request: &'a str,
    ids: &'a [String],
    values: ParamVec,
}

impl<'a> ParamValues<'a> {
    /// Key resolving to the full request string in [`get`](Self::get) and in rule tables
    pub const REQUEST_KEY: &'static str = "request_";

    pub(crate) fn new(request: &'a str, ids: &'a [String], values: ParamVec) -> Self {
        Self {
            request,
            ids,
            values,
        }
    }

    #[must_use]
    pub fn request(&self) -> &'a str {
        self.request
    }

    /// Every captured value in group order
    #[must_use]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Declared identifiers, empty for raw regex routes
    #[must_use]
    pub fn ids(&self) -> &'a [String] {
        self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.ids
            .iter()
            .position(|id| id == name)
            .and_then(|index| self.get_index(index))
    }

    /// Resolve `key` as `request_`, then a declared name, then a position
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == Self::REQUEST_KEY {
            return Some(self.request);
        }
        if self.ids.iter().any(|id| id == key) {
            return self.get_named(key);
        }
        key.parse::<usize>().ok().and_then(|index| self.get_index(index))
    }

    /// `(name, value)` pairs for the declared identifiers
    pub fn named(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.ids
            .iter()
            .zip(self.values.iter())
            .map(|(id, value)| (id.as_str(), value.as_deref()))
    }

    #[must_use]
    pub fn into_values(self) -> ParamVec {
        self.values
    }
}
