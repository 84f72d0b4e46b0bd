//! Destination shapes
//!
//! Every decodable type implements [`Unmarshal`], which hands the dispatcher
//! one [`Dest`] variant describing how the value is filled: a record with
//! annotated fields, a fixed or growable sequence, a map, a scalar, a raw
//! node capture, or a custom decoder. Indirection (`Option`, `Box`) resolves
//! to the shape of the pointee, allocating it on demand.

use crate::error::{BoxError, UnmarshalResult};
use crate::selection::HtmlNode;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

/// A value the decoder can fill
pub trait Unmarshal<'doc> {
    /// Expose the value for dispatch
    fn destination(&mut self) -> Dest<'_, 'doc>;

    /// Whether the value, through any indirection, decodes raw nodes itself
    ///
    /// Record fields without an annotation are only decoded when this holds.
    fn accepts_raw_nodes() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Type name reported in errors
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Custom decoding from the matched nodes
///
/// Takes precedence over every built-in shape, including when the field also
/// carries an annotation with value selectors.
pub trait UnmarshalHtml<'doc> {
    fn unmarshal_html(&mut self, nodes: &[HtmlNode<'doc>]) -> Result<(), BoxError>;
}

/// Annotated fields of a record
pub trait Record<'doc> {
    fn fields(&mut self) -> Vec<Field<'_, 'doc>>;
}

/// Fixed length sequence
pub trait Array<'doc> {
    fn array_len(&self) -> usize;
    fn element_mut(&mut self, index: usize) -> &mut dyn Unmarshal<'doc>;
}

/// Growable sequence
pub trait Sequence<'doc> {
    /// Allocate an element, let `decode` fill it, then append it
    ///
    /// Nothing is appended when `decode` fails.
    fn push_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()>;
}

/// Key-value mapping
pub trait MapSink<'doc> {
    /// Allocate a key and a value, let `decode` fill them, then insert the pair
    ///
    /// Nothing is inserted when `decode` fails.
    fn insert_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>, &mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()>;
}

/// Value parsed from a single literal
pub trait Scalar {
    fn set_literal(&mut self, literal: &str) -> Result<(), BoxError>;
}

/// One annotated field of a record
pub struct Field<'a, 'doc> {
    pub name: &'a str,
    pub tag: &'a str,
    pub accepts_raw_nodes: bool,
    pub value: &'a mut dyn Unmarshal<'doc>,
}

impl<'a, 'doc> Field<'a, 'doc> {
    pub fn new<T: Unmarshal<'doc>>(name: &'a str, tag: &'a str, value: &'a mut T) -> Self {
        Self {
            name,
            tag,
            accepts_raw_nodes: T::accepts_raw_nodes(),
            value,
        }
    }
}

/// How a destination is filled
pub enum Dest<'a, 'doc> {
    Custom(&'a mut dyn UnmarshalHtml<'doc>),
    Nodes(&'a mut Vec<HtmlNode<'doc>>),
    Record(&'a mut dyn Record<'doc>),
    Array(&'a mut dyn Array<'doc>),
    Seq(&'a mut dyn Sequence<'doc>),
    Map(&'a mut dyn MapSink<'doc>),
    Scalar(&'a mut dyn Scalar),
}

impl Dest<'_, '_> {
    pub fn shape(&self) -> Shape {
        match self {
            Dest::Custom(_) => Shape::Custom,
            Dest::Nodes(_) => Shape::Nodes,
            Dest::Record(_) => Shape::Record,
            Dest::Array(_) => Shape::Array,
            Dest::Seq(_) => Shape::Seq,
            Dest::Map(_) => Shape::Map,
            Dest::Scalar(_) => Shape::Scalar,
        }
    }
}

/// Shape of a destination, without the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Custom,
    Nodes,
    Record,
    Array,
    Seq,
    Map,
    Scalar,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Custom => "custom",
            Shape::Nodes => "nodes",
            Shape::Record => "record",
            Shape::Array => "array",
            Shape::Seq => "sequence",
            Shape::Map => "map",
            Shape::Scalar => "scalar",
        })
    }
}

/// Matched nodes captured verbatim
#[derive(Debug, Clone, Default)]
pub struct Nodes<'doc>(pub Vec<HtmlNode<'doc>>);

impl<'doc> Nodes<'doc> {
    pub fn as_slice(&self) -> &[HtmlNode<'doc>] {
        &self.0
    }
}

impl<'doc> Unmarshal<'doc> for Nodes<'doc> {
    fn destination(&mut self) -> Dest<'_, 'doc> {
        Dest::Nodes(&mut self.0)
    }
}

impl<'doc, T> Unmarshal<'doc> for Option<T>
where
    T: Unmarshal<'doc> + Default,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        self.get_or_insert_with(T::default).destination()
    }

    fn accepts_raw_nodes() -> bool {
        T::accepts_raw_nodes()
    }
}

impl<'doc, T> Unmarshal<'doc> for Box<T>
where
    T: Unmarshal<'doc>,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        (**self).destination()
    }

    fn accepts_raw_nodes() -> bool {
        T::accepts_raw_nodes()
    }
}

impl<'doc, T> Unmarshal<'doc> for Vec<T>
where
    T: Unmarshal<'doc> + Default,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        Dest::Seq(self)
    }
}

impl<'doc, T> Sequence<'doc> for Vec<T>
where
    T: Unmarshal<'doc> + Default,
{
    fn push_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()> {
        let mut element = T::default();
        decode(&mut element)?;
        self.push(element);
        Ok(())
    }
}

impl<'doc, T, const N: usize> Unmarshal<'doc> for [T; N]
where
    T: Unmarshal<'doc>,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        Dest::Array(self)
    }
}

impl<'doc, T, const N: usize> Array<'doc> for [T; N]
where
    T: Unmarshal<'doc>,
{
    fn array_len(&self) -> usize {
        N
    }

    fn element_mut(&mut self, index: usize) -> &mut dyn Unmarshal<'doc> {
        &mut self[index]
    }
}

impl<'doc, K, V, S> Unmarshal<'doc> for HashMap<K, V, S>
where
    K: Unmarshal<'doc> + Default + Eq + Hash,
    V: Unmarshal<'doc> + Default,
    S: BuildHasher,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        Dest::Map(self)
    }
}

impl<'doc, K, V, S> MapSink<'doc> for HashMap<K, V, S>
where
    K: Unmarshal<'doc> + Default + Eq + Hash,
    V: Unmarshal<'doc> + Default,
    S: BuildHasher,
{
    fn insert_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>, &mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()> {
        let (mut key, mut value) = (K::default(), V::default());
        decode(&mut key, &mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<'doc, K, V> Unmarshal<'doc> for BTreeMap<K, V>
where
    K: Unmarshal<'doc> + Default + Ord,
    V: Unmarshal<'doc> + Default,
{
    fn destination(&mut self) -> Dest<'_, 'doc> {
        Dest::Map(self)
    }
}

impl<'doc, K, V> MapSink<'doc> for BTreeMap<K, V>
where
    K: Unmarshal<'doc> + Default + Ord,
    V: Unmarshal<'doc> + Default,
{
    fn insert_with(
        &mut self,
        decode: &mut dyn FnMut(&mut dyn Unmarshal<'doc>, &mut dyn Unmarshal<'doc>) -> UnmarshalResult<()>,
    ) -> UnmarshalResult<()> {
        let (mut key, mut value) = (K::default(), V::default());
        decode(&mut key, &mut value)?;
        self.insert(key, value);
        Ok(())
    }
}
