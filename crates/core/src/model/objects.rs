//! PDF object types.
//!
//! The value tree a document is built from. Values become indirect objects
//! by being registered with an xref table, which hands back their
//! [`ObjectRef`]; other values point at them with [`PdfObject::Reference`].

use bytes::Bytes;
use indexmap::IndexMap;

/// Identity of an indirect object: object number plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    pub number: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub const fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// PDF Object types - the fundamental value type in PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /Type, /Font), stored without the slash
    Name(String),
    /// Literal string, written as `(...)`
    String(Vec<u8>),
    /// Binary string, written as `<...>`
    HexString(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(Dictionary),
    /// Stream (dictionary + payload)
    Stream(PdfStream),
    /// Indirect object reference
    Reference(ObjectRef),
}

impl PdfObject {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn string(text: impl AsRef<[u8]>) -> Self {
        Self::String(text.as_ref().to_vec())
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::Stream(stream) => Some(&stream.dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::Stream(stream) => Some(&mut stream.dict),
            _ => None,
        }
    }

    /// Get type name for error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::HexString(_) => "hexstring",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Reference(_) => "ref",
        }
    }
}

impl From<bool> for PdfObject {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PdfObject {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PdfObject {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for PdfObject {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for PdfObject {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<ObjectRef> for PdfObject {
    fn from(value: ObjectRef) -> Self {
        Self::Reference(value)
    }
}

impl From<Dictionary> for PdfObject {
    fn from(value: Dictionary) -> Self {
        Self::Dict(value)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(value: PdfStream) -> Self {
        Self::Stream(value)
    }
}

impl From<Vec<PdfObject>> for PdfObject {
    fn from(value: Vec<PdfObject>) -> Self {
        Self::Array(value)
    }
}

/// Insertion-ordered PDF dictionary.
///
/// Keys are names without the leading slash. Entries are written in the
/// order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, PdfObject>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with `/Type /<type_name>` as its first entry.
    pub fn with_type(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.set("Type", PdfObject::name(type_name));
        dict
    }

    /// Insert or replace `key`. Replacing keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PdfObject> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PdfObject> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PdfObject)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<PdfObject>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

/// PDF stream: a dictionary plus an already-encoded payload.
///
/// `/Length` is maintained by the writer; it always reflects the number of
/// bytes actually emitted (after encryption).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfStream {
    pub dict: Dictionary,
    pub data: Bytes,
}

impl PdfStream {
    pub fn new(dict: Dictionary, data: impl Into<Bytes>) -> Self {
        Self {
            dict,
            data: data.into(),
        }
    }

    /// Stream with an empty dictionary.
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self::new(Dictionary::new(), data)
    }
}
