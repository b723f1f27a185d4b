//! Dynamic object model produced by compilers.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use url::Url;

/// A compiled value: an attribute result or an element result.
#[derive(Debug, Clone, Default)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(Arc<str>),
	List(Vec<Value>),
	Object(Object),
	Constructor(Constructor),
	Resource(Resource),
}

impl Value {
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Object(_) => "object",
			Self::Constructor(_) => "constructor",
			Self::Resource(_) => "resource",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Numeric view of ints and floats alike.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(f) => Some(*f),
			Self::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(o) => Some(o),
			_ => None,
		}
	}

	pub fn as_resource(&self) -> Option<&Resource> {
		match self {
			Self::Resource(r) => Some(r),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a == b,
			(Self::Constructor(a), Self::Constructor(b)) => a == b,
			(Self::Resource(a), Self::Resource(b)) => a == b,
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Self::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.into())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s.into())
	}
}

impl From<Constructor> for Value {
	fn from(c: Constructor) -> Self {
		Self::Constructor(c)
	}
}

impl From<Resource> for Value {
	fn from(r: Resource) -> Self {
		Self::Resource(r)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::List(items)
	}
}

impl From<Object> for Value {
	fn from(o: Object) -> Self {
		Self::Object(o)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::Int(i) => serializer.serialize_i64(*i),
			Self::Float(f) => serializer.serialize_f64(*f),
			Self::String(s) => serializer.serialize_str(s),
			Self::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Object(o) => o.serialize(serializer),
			Self::Constructor(c) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry("constructor", c.path())?;
				map.end()
			}
			Self::Resource(r) => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("resource", r.url().as_str())?;
				map.serialize_entry("bytes", &r.bytes().len())?;
				map.end()
			}
		}
	}
}

#[derive(Debug, Default)]
struct ObjectData {
	class: Box<str>,
	properties: IndexMap<Box<str>, Value>,
	children: Vec<Value>,
}

/// A shared, mutable record: class name, ordered properties, ordered children.
///
/// Clones share the same record. Equality is structural.
#[derive(Clone, Default)]
pub struct Object {
	data: Arc<Mutex<ObjectData>>,
}

impl Object {
	pub fn new(class: impl Into<Box<str>>) -> Self {
		Self {
			data: Arc::new(Mutex::new(ObjectData {
				class: class.into(),
				..ObjectData::default()
			})),
		}
	}

	pub fn class(&self) -> String {
		self.data.lock().class.to_string()
	}

	pub fn set(&self, name: &str, value: impl Into<Value>) {
		self.data.lock().properties.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<Value> {
		self.data.lock().properties.get(name).cloned()
	}

	pub fn has(&self, name: &str) -> bool {
		self.data.lock().properties.contains_key(name)
	}

	/// Snapshot of the properties in insertion order.
	pub fn properties(&self) -> Vec<(String, Value)> {
		self.data
			.lock()
			.properties
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	pub fn push_child(&self, child: impl Into<Value>) {
		self.data.lock().children.push(child.into());
	}

	pub fn children(&self) -> Vec<Value> {
		self.data.lock().children.clone()
	}

	pub fn child_count(&self) -> usize {
		self.data.lock().children.len()
	}

	/// Whether both handles point at the same record.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.data, &other.data)
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		if self.ptr_eq(other) {
			return true;
		}
		let (a, b) = (self.data.lock(), other.data.lock());
		a.class == b.class && a.properties == b.properties && a.children == b.children
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let data = self.data.lock();
		f.debug_struct("Object")
			.field("class", &data.class)
			.field("properties", &data.properties)
			.field("children", &data.children)
			.finish()
	}
}

impl Serialize for Object {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let data = self.data.lock();
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("class", &*data.class)?;
		if !data.properties.is_empty() {
			map.serialize_entry("properties", &data.properties)?;
		}
		if !data.children.is_empty() {
			map.serialize_entry("children", &data.children)?;
		}
		map.end()
	}
}

type Factory = dyn Fn() -> Value + Send + Sync;

/// A named zero-argument constructor stored in the namespace.
#[derive(Clone)]
pub struct Constructor {
	path: Arc<str>,
	factory: Arc<Factory>,
}

impl Constructor {
	pub fn new(path: impl Into<Arc<str>>, factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
		Self {
			path: path.into(),
			factory: Arc::new(factory),
		}
	}

	/// Constructor producing an empty [`Object`] of the given class.
	pub fn object(path: impl Into<Arc<str>>, class: &str) -> Self {
		let class: Arc<str> = class.into();
		Self::new(path, move || Value::Object(Object::new(&*class)))
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn call(&self) -> Value {
		(self.factory)()
	}
}

impl PartialEq for Constructor {
	fn eq(&self, other: &Self) -> bool {
		self.path == other.path
	}
}

impl fmt::Debug for Constructor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Constructor").field(&self.path).finish()
	}
}

/// A loaded external resource, handed to consumers undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
	url: Url,
	bytes: Bytes,
}

impl Resource {
	pub fn new(url: Url, bytes: impl Into<Bytes>) -> Self {
		Self { url, bytes: bytes.into() }
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	pub fn bytes(&self) -> &Bytes {
		&self.bytes
	}
}
