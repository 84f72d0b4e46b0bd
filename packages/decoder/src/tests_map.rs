use crate::{unmarshal_str, DecodeError, Reason, Shape, Unmarshal, UnmarshalError};
use std::collections::{BTreeMap, HashMap};

fn decode_err<T>(source: &str, value: &mut T) -> UnmarshalError
where
    T: for<'doc> Unmarshal<'doc>,
{
    match unmarshal_str(source, value) {
        Err(DecodeError::Unmarshal(err)) => err,
        other => panic!("expected an unmarshal error, got {:?}", other),
    }
}

#[derive(Debug, Default, Unmarshal)]
struct Glossary {
    #[scrape("dl,dt,[title]")]
    terms: Vec<HashMap<String, Vec<String>>>,
}

#[test]
fn test_nested_map_in_list() {
    let mut glossary = Glossary::default();
    unmarshal_str(
        r#"
        <dl>
          <dt title="a1">alpha</dt><dd>first</dd>
          <dt title="b1">beta</dt><dd>second</dd>
        </dl>
        <dl><dt title="c1">gamma</dt></dl>
        "#,
        &mut glossary,
    )
    .unwrap();

    assert_eq!(glossary.terms.len(), 2);
    assert_eq!(glossary.terms[0].len(), 2);
    assert_eq!(glossary.terms[0]["alpha"], vec!["a1"]);
    assert_eq!(glossary.terms[0]["beta"], vec!["b1"]);
    assert_eq!(glossary.terms[1]["gamma"], vec!["c1"]);
}

#[derive(Debug, Default, Unmarshal)]
struct Definition {
    #[scrape("dd")]
    text: String,
    #[scrape(",[title]")]
    title: String,
}

#[derive(Debug, Default, Unmarshal)]
struct Definitions {
    #[scrape("dl,dt")]
    defs: HashMap<String, Definition>,
}

#[test]
fn test_values_only_see_their_key_node() {
    let mut definitions = Definitions::default();
    unmarshal_str(
        r#"<dl><dt title="x">term</dt><dd>sibling definition</dd></dl>"#,
        &mut definitions,
    )
    .unwrap();

    let def = &definitions.defs["term"];
    assert_eq!(def.title, "x");
    assert_eq!(def.text, "");
}

#[derive(Debug, Default, Unmarshal)]
struct Unkeyed {
    #[scrape("dl")]
    map: HashMap<String, String>,
}

#[test]
fn test_map_without_key_selector() {
    let err = decode_err("<dl><dt>a</dt></dl>", &mut Unkeyed::default());
    assert_eq!(err.path_string(), ".map");

    let inner = err.innermost();
    assert_eq!(inner.reason, Reason::MissingValueSelector);
    assert_eq!(inner.shape, Shape::Map);
}

#[derive(Debug, Default, Unmarshal)]
struct Ordered {
    #[scrape("ul,li.k,[data-n]")]
    counts: BTreeMap<String, u32>,
}

#[test]
fn test_btree_map() {
    let mut ordered = Ordered::default();
    unmarshal_str(
        r#"<ul><li class="k" data-n="2">b</li><li class="k" data-n="1">a</li><li>skip</li></ul>"#,
        &mut ordered,
    )
    .unwrap();

    let pairs: Vec<_> = ordered.counts.into_iter().collect();
    assert_eq!(pairs, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

#[derive(Debug, Default, Unmarshal)]
struct Deep {
    #[scrape("div.box,b,[data-v]")]
    by_bold: HashMap<String, String>,
}

#[test]
fn test_keys_found_in_deeper_generation() {
    let mut deep = Deep::default();
    unmarshal_str(
        r#"<div class="box"><p><b data-v="1">k1</b> rest</p><p><b data-v="2">k2</b></p></div>"#,
        &mut deep,
    )
    .unwrap();

    assert_eq!(deep.by_bold.len(), 2);
    assert_eq!(deep.by_bold["k1"], "1");
    assert_eq!(deep.by_bold["k2"], "2");
}

#[derive(Debug, Default, Unmarshal)]
struct NumericKeys {
    #[scrape("ul,li")]
    map: HashMap<u32, String>,
}

#[test]
fn test_map_key_error() {
    let err = decode_err("<ul><li>one</li></ul>", &mut NumericKeys::default());
    assert_eq!(err.path_string(), ".map[0]");

    let pair = err.nested().and_then(UnmarshalError::nested).unwrap();
    assert_eq!(pair.reason, Reason::MapKeyUnmarshal);
    assert_eq!(pair.value.as_deref(), Some("one"));
    assert_eq!(err.innermost().reason, Reason::TypeConversion);
}

#[test]
fn test_pairs_before_a_failure_are_kept() {
    let mut value = NumericKeys::default();
    let err = decode_err("<ul><li>1</li><li>x</li><li>3</li></ul>", &mut value);

    assert_eq!(err.path_string(), ".map[1]");
    assert_eq!(value.map.len(), 1);
    assert_eq!(value.map[&1], "1");
}

#[derive(Debug, Default, Unmarshal)]
struct Duplicates {
    #[scrape("ul,li,[data-v]")]
    map: HashMap<String, String>,
}

#[test]
fn test_duplicate_keys_keep_last() {
    let mut value = Duplicates::default();
    unmarshal_str(
        r#"<ul><li data-v="1">k</li><li data-v="2">k</li></ul>"#,
        &mut value,
    )
    .unwrap();

    assert_eq!(value.map.len(), 1);
    assert_eq!(value.map["k"], "2");
}
