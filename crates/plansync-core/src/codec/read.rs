//! Tree-backed read side of the codec.
//!
//! The document is parsed once into a `serde_json::Value` tree; a
//! [`ReadContext`] is a view of one object node in that tree, so entity
//! constructors can pull their fields in any order.

use super::error::{CodecError, Result};
use super::registry::TypeRegistry;
use super::value::{WireEnum, WireValue};
use super::{Deserializable, TYPE_KEY};
use crate::context::SyncContext;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

/// Path shown for the document root.
pub(crate) const ROOT: &str = "$";

/// View of one object node, handed to [`Deserializable::from_context`].
pub struct ReadContext<'a> {
    node: &'a Map<String, Value>,
    path: String,
    sync: &'a SyncContext,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn root(node: &'a Value, sync: &'a SyncContext) -> Result<Self> {
        match node {
            Value::Object(map) => Ok(Self {
                node: map,
                path: String::new(),
                sync,
            }),
            other => Err(CodecError::mismatch(ROOT, "object", other)),
        }
    }

    /// Dotted path of this object, `$` at the root.
    pub fn path(&self) -> &str {
        if self.path.is_empty() { ROOT } else { &self.path }
    }

    /// Owner context that deserialized entities bind their properties to.
    pub fn sync_context(&self) -> &'a SyncContext {
        self.sync
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.node.contains_key(name)
    }

    /// Concrete type name written for this object, if any.
    pub fn discriminator(&self) -> Result<Option<&'a str>> {
        match self.node.get(TYPE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(name)) => Ok(Some(name.as_str())),
            Some(other) => Err(CodecError::mismatch(self.field_path(TYPE_KEY), "string", other)),
        }
    }

    pub fn read_value<V: WireValue>(&self, name: &str) -> Result<V> {
        let (node, path) = self.field(name)?;
        V::from_node(node, &path)
    }

    /// Like [`read_value`](Self::read_value), but a missing or null member reads as `None`.
    pub fn read_optional<V: WireValue>(&self, name: &str) -> Result<Option<V>> {
        match self.node.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(node) => V::from_node(node, &self.field_path(name)).map(Some),
        }
    }

    /// Read a base64 byte buffer. Line breaks and other whitespace are ignored.
    pub fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let (node, path) = self.field(name)?;
        let text = node
            .as_str()
            .ok_or_else(|| CodecError::mismatch(path.as_str(), "string", node))?;
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact)
            .map_err(|e| CodecError::invalid(path, format!("invalid base64: {}", e)))
    }

    pub fn read_optional_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.node.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.read_bytes(name).map(Some),
        }
    }

    pub fn read_enum<E: WireEnum>(&self, name: &str) -> Result<E> {
        let (node, path) = self.field(name)?;
        let text = node
            .as_str()
            .ok_or_else(|| CodecError::mismatch(path.as_str(), "string", node))?;
        E::from_name(text)
            .ok_or_else(|| CodecError::invalid(path, format!("unknown variant '{}'", text)))
    }

    pub fn read_object<T: Deserializable>(&self, name: &str) -> Result<T> {
        let (node, path) = self.field(name)?;
        T::from_context(&self.child(node, path)?)
    }

    /// Read a tagged object, resolving its concrete type through `registry`.
    pub fn read_polymorphic<T>(&self, name: &str, registry: &TypeRegistry<T>) -> Result<T> {
        let (node, path) = self.field(name)?;
        registry.resolve(&self.child(node, path)?)
    }

    pub fn read_list<T: Deserializable>(&self, name: &str) -> Result<Vec<T>> {
        self.elements(name, |ctx, node, path| T::from_context(&ctx.child(node, path)?))
    }

    pub fn read_polymorphic_list<T>(
        &self,
        name: &str,
        registry: &TypeRegistry<T>,
    ) -> Result<Vec<T>> {
        self.elements(name, |ctx, node, path| registry.resolve(&ctx.child(node, path)?))
    }

    pub fn read_value_list<V: WireValue>(&self, name: &str) -> Result<Vec<V>> {
        self.elements(name, |_, node, path| V::from_node(node, &path))
    }

    fn field(&self, name: &str) -> Result<(&'a Value, String)> {
        let path = self.field_path(name);
        match self.node.get(name) {
            Some(node) => Ok((node, path)),
            None => Err(CodecError::MissingField { path }),
        }
    }

    fn elements<T>(
        &self,
        name: &str,
        mut read: impl FnMut(&Self, &'a Value, String) -> Result<T>,
    ) -> Result<Vec<T>> {
        let (node, path) = self.field(name)?;
        let Value::Array(items) = node else {
            return Err(CodecError::mismatch(path, "array", node));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| read(self, item, format!("{}[{}]", path, index)))
            .collect()
    }

    fn child(&self, node: &'a Value, path: String) -> Result<ReadContext<'a>> {
        match node {
            Value::Object(map) => Ok(ReadContext {
                node: map,
                path,
                sync: self.sync,
            }),
            other => Err(CodecError::mismatch(path, "object", other)),
        }
    }

    /// Path of member `name` of this object, for error messages.
    pub fn field_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }
}
