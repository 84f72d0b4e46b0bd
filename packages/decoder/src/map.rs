//! Map decoding
//!
//! Keys and values of a map live in the same subtree: slot 1 of the
//! annotation selects the key nodes, and each value is decoded from inside
//! its own key node with the annotation popped once. Siblings and ancestors of
//! a key node are never visible to its value.

use crate::destination::{MapSink, Shape, Unmarshal};
use crate::dispatch::unmarshal_by_type;
use crate::error::{Reason, UnmarshalError, UnmarshalResult};
use crate::selection::{compile, Selection};
use crate::tag::Tag;
use crate::value_fn::ValueFnCache;
use scraper::Selector;
use tracing::debug;

pub(crate) fn unmarshal_map<'doc>(
    selection: &Selection<'doc>,
    map: &mut dyn MapSink<'doc>,
    tag: &Tag,
    type_name: &'static str,
) -> UnmarshalResult<()> {
    let key_selector = tag.selector(1);

    // The key selector is required to find the keys
    if key_selector.is_empty() {
        return Err(UnmarshalError::new(
            Reason::MissingValueSelector,
            type_name,
            Shape::Map,
        ));
    }

    let matcher = compile(key_selector).map_err(|err| {
        UnmarshalError::new(Reason::InvalidSelector, type_name, Shape::Map)
            .with_value(key_selector)
            .with_cause(Box::new(err))
    })?;

    let keys = children_until_match(selection, &matcher);
    let value_tag = tag.pop_value();

    debug!(type_name, key_selector, keys = keys.len(), value_tag = %value_tag, "Unmarshaling map");

    for (index, key_node) in keys.iter().enumerate() {
        map.insert_with(&mut |key: &mut dyn Unmarshal<'doc>, value: &mut dyn Unmarshal<'doc>| {
            unmarshal_by_type(&key_node, key, tag).map_err(|err| {
                UnmarshalError::new(Reason::MapKeyUnmarshal, type_name, Shape::Map)
                    .with_value(ValueFnCache::global().resolve(&value_tag).extract(&key_node))
                    .wrapping(err)
            })?;
            unmarshal_by_type(&key_node, value, &value_tag)
        })
        .map_err(|err| {
            UnmarshalError::new(Reason::TypeConversion, type_name, Shape::Map)
                .at_index(index)
                .wrapping(err)
        })?;
    }

    Ok(())
}

/// Shallowest generation of descendants holding a node that matches `matcher`
///
/// Falls back to the selection itself when no generation matches.
pub(crate) fn children_until_match<'doc>(
    selection: &Selection<'doc>,
    matcher: &Selector,
) -> Selection<'doc> {
    let mut generation = selection.children();
    while !generation.is_empty() && generation.filter(matcher).is_empty() {
        generation = generation.children();
    }

    if generation.is_empty() {
        return selection.clone();
    }
    generation.filter(matcher)
}
