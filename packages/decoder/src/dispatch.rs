//! Recursive decode over destination shapes

use crate::destination::{Array, Dest, Record, Scalar, Sequence, Shape, Unmarshal};
use crate::error::{Reason, UnmarshalError, UnmarshalResult};
use crate::map::unmarshal_map;
use crate::narrow::narrow;
use crate::selection::Selection;
use crate::tag::Tag;
use crate::value_fn::ValueFnCache;
use tracing::{debug, trace};

/// Decode `selection` into `value`, consuming `tag` for nested levels
pub fn unmarshal_by_type<'doc>(
    selection: &Selection<'doc>,
    value: &mut dyn Unmarshal<'doc>,
    tag: &Tag,
) -> UnmarshalResult<()> {
    let type_name = value.type_name();
    let dest = value.destination();
    let shape = dest.shape();

    trace!(type_name, %shape, nodes = selection.len(), tag = %tag, "Unmarshaling by type");

    match dest {
        Dest::Custom(custom) => custom.unmarshal_html(selection.nodes()).map_err(|err| {
            UnmarshalError::new(Reason::CustomUnmarshal, type_name, shape).with_cause(err)
        }),
        Dest::Nodes(nodes) => {
            nodes.extend(selection.nodes().iter().copied());
            Ok(())
        }
        Dest::Record(record) => unmarshal_record(selection, record, type_name),
        Dest::Array(array) => unmarshal_array(selection, array, tag, type_name),
        Dest::Seq(seq) => unmarshal_seq(selection, seq, tag, type_name),
        Dest::Map(map) => unmarshal_map(selection, map, tag, type_name),
        Dest::Scalar(scalar) => unmarshal_scalar(selection, scalar, tag, type_name),
    }
}

fn unmarshal_record<'doc>(
    selection: &Selection<'doc>,
    record: &mut dyn Record<'doc>,
    type_name: &'static str,
) -> UnmarshalResult<()> {
    for field in record.fields() {
        let tag = Tag::parse(field.tag);

        if tag.is_ignored() {
            continue;
        }

        // Unannotated fields are left untouched unless they decode raw nodes
        if tag.is_empty() && !field.accepts_raw_nodes {
            continue;
        }

        let narrowed = narrow(selection, &tag).map_err(|err| {
            UnmarshalError::new(Reason::InvalidSelector, type_name, Shape::Record)
                .with_value(err.selector.clone())
                .at_field(field.name)
                .with_cause(Box::new(err))
        })?;

        debug!(type_name, field = field.name, tag = %tag, nodes = narrowed.len(), "Unmarshaling field");

        unmarshal_by_type(&narrowed, field.value, &tag).map_err(|err| {
            UnmarshalError::new(Reason::TypeConversion, type_name, Shape::Record)
                .at_field(field.name)
                .wrapping(err)
        })?;
    }
    Ok(())
}

fn unmarshal_array<'doc>(
    selection: &Selection<'doc>,
    array: &mut dyn Array<'doc>,
    tag: &Tag,
    type_name: &'static str,
) -> UnmarshalResult<()> {
    let expected = array.array_len();
    if expected != selection.len() {
        return Err(UnmarshalError::new(
            Reason::ArrayLengthMismatch {
                expected,
                found: selection.len(),
            },
            type_name,
            Shape::Array,
        ));
    }

    for (index, element) in selection.iter().enumerate() {
        unmarshal_by_type(&element, array.element_mut(index), tag).map_err(|err| {
            UnmarshalError::new(Reason::TypeConversion, type_name, Shape::Array)
                .at_index(index)
                .wrapping(err)
        })?;
    }
    Ok(())
}

fn unmarshal_seq<'doc>(
    selection: &Selection<'doc>,
    seq: &mut dyn Sequence<'doc>,
    tag: &Tag,
    type_name: &'static str,
) -> UnmarshalResult<()> {
    for (index, element) in selection.iter().enumerate() {
        seq.push_with(&mut |value: &mut dyn Unmarshal<'doc>| unmarshal_by_type(&element, value, tag))
            .map_err(|err| {
                UnmarshalError::new(Reason::TypeConversion, type_name, Shape::Seq)
                    .at_index(index)
                    .wrapping(err)
            })?;
    }
    Ok(())
}

fn unmarshal_scalar(
    selection: &Selection<'_>,
    scalar: &mut dyn Scalar,
    tag: &Tag,
    type_name: &'static str,
) -> UnmarshalResult<()> {
    let literal = ValueFnCache::global().resolve(tag).extract(selection);

    scalar.set_literal(&literal).map_err(|err| {
        UnmarshalError::new(Reason::TypeConversion, type_name, Shape::Scalar)
            .with_value(literal.clone())
            .with_cause(err)
    })
}
