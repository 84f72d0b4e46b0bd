//! Narrowing a selection with an annotation

use crate::error::SelectorResult;
use crate::selection::{compile, Selection};
use crate::tag::Tag;
use tracing::debug;

/// Zero-argument selection transforms usable as `!Name` directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Parent,
    Parents,
    Children,
    Contents,
    First,
    Last,
    Next,
    NextAll,
    Prev,
    PrevAll,
    Siblings,
}

impl Directive {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Parent" => Directive::Parent,
            "Parents" => Directive::Parents,
            "Children" => Directive::Children,
            "Contents" => Directive::Contents,
            "First" => Directive::First,
            "Last" => Directive::Last,
            "Next" => Directive::Next,
            "NextAll" => Directive::NextAll,
            "Prev" => Directive::Prev,
            "PrevAll" => Directive::PrevAll,
            "Siblings" => Directive::Siblings,
            _ => return None,
        })
    }

    pub fn apply<'doc>(self, selection: &Selection<'doc>) -> Selection<'doc> {
        match self {
            Directive::Parent => selection.parent(),
            Directive::Parents => selection.parents(),
            Directive::Children => selection.children(),
            Directive::Contents => selection.contents(),
            Directive::First => selection.first(),
            Directive::Last => selection.last(),
            Directive::Next => selection.next(),
            Directive::NextAll => selection.next_all(),
            Directive::Prev => selection.prev(),
            Directive::PrevAll => selection.prev_all(),
            Directive::Siblings => selection.siblings(),
        }
    }
}

/// Apply the directives of `tag`, then narrow to descendants matching slot 0
///
/// Unknown directives leave the selection unchanged. An empty slot 0 keeps
/// the selection as is.
pub fn narrow<'doc>(selection: &Selection<'doc>, tag: &Tag) -> SelectorResult<Selection<'doc>> {
    let mut current = selection.clone();

    for name in tag.directives() {
        match Directive::from_name(name) {
            Some(directive) => current = directive.apply(&current),
            None => debug!(directive = %name, tag = %tag, "Ignoring unknown directive"),
        }
    }

    let primary = tag.selector(0);
    if primary.is_empty() {
        return Ok(current);
    }

    Ok(current.find(&compile(primary)?))
}
