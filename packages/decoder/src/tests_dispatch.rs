use crate::{
    unmarshal_str, BoxError, DecodeError, Document, HtmlNode, Location, Nodes, Reason, Shape,
    Unmarshal, UnmarshalError, UnmarshalHtml,
};

fn decode_err<T>(source: &str, value: &mut T) -> UnmarshalError
where
    T: for<'doc> Unmarshal<'doc>,
{
    match unmarshal_str(source, value) {
        Err(DecodeError::Unmarshal(err)) => err,
        other => panic!("expected an unmarshal error, got {:?}", other),
    }
}

#[derive(Debug, Default, PartialEq, Unmarshal)]
struct Item {
    #[scrape(".title")]
    title: String,
    #[scrape(",[data-id]")]
    id: u32,
}

#[derive(Debug, Default, Unmarshal)]
struct Listing {
    #[scrape("li.item")]
    items: Vec<Item>,
}

const LISTING: &str = r#"
<ul>
  <li class="item" data-id="1"><span class="title">One</span></li>
  <li class="item" data-id="2"><span class="title"> Two </span></li>
</ul>
"#;

#[test]
fn test_list_of_records() {
    let mut listing = Listing::default();
    unmarshal_str(LISTING, &mut listing).unwrap();

    assert_eq!(
        listing.items,
        vec![
            Item {
                title: "One".to_string(),
                id: 1
            },
            Item {
                title: "Two".to_string(),
                id: 2
            },
        ]
    );
}

#[test]
fn test_document_as_scalar() {
    let mut text = String::new();
    unmarshal_str("<p> hello </p>", &mut text).unwrap();
    assert_eq!(text, "hello");
}

#[derive(Debug, Default, Unmarshal)]
struct Bare {
    name: String,
    count: u32,
}

#[test]
fn test_unannotated_fields_are_untouched() {
    let mut bare = Bare {
        name: "kept".to_string(),
        count: 7,
    };
    unmarshal_str("<p>3</p>", &mut bare).unwrap();
    assert_eq!(bare.name, "kept");
    assert_eq!(bare.count, 7);
}

#[derive(Debug, Default, Unmarshal)]
struct Pair {
    #[scrape("li")]
    items: [String; 2],
}

#[test]
fn test_array_exact_length() {
    let mut pair = Pair::default();
    unmarshal_str("<ul><li>a</li><li>b</li></ul>", &mut pair).unwrap();
    assert_eq!(pair.items, ["a".to_string(), "b".to_string()]);
}

#[test]
fn test_array_length_mismatch() {
    for source in ["<ul><li>a</li></ul>", "<ul><li>a</li><li>b</li><li>c</li></ul>"] {
        let err = decode_err(source, &mut Pair::default());
        let found = source.matches("<li>").count();

        assert_eq!(err.path(), vec![Location::Field("items".to_string())]);
        let inner = err.innermost();
        assert_eq!(inner.shape, Shape::Array);
        assert_eq!(
            inner.reason,
            Reason::ArrayLengthMismatch { expected: 2, found }
        );
    }
}

#[derive(Debug, Default, Unmarshal)]
struct Links {
    #[scrape("a,[href]")]
    hrefs: Vec<String>,
    #[scrape("a.first,[href]")]
    first: String,
    #[scrape("a.first,html")]
    markup: String,
    #[scrape("a.first,unknown")]
    fallback: String,
    #[scrape("a.first,[href")]
    unclosed: String,
}

#[test]
fn test_value_functions() {
    let mut links = Links::default();
    unmarshal_str(
        r#"<a class="first" href="/one"> <b>One</b> </a><a>no link</a>"#,
        &mut links,
    )
    .unwrap();

    assert_eq!(links.hrefs, vec!["/one".to_string(), String::new()]);
    assert_eq!(links.first, "/one");
    assert_eq!(links.markup, "<b>One</b>");
    assert_eq!(links.fallback, "One");
    assert_eq!(links.unclosed, "One");
}

#[derive(Debug, Default, Unmarshal)]
struct Scalars {
    #[scrape(".flag")]
    flag: bool,
    #[scrape(".price")]
    price: f64,
    #[scrape(".delta")]
    delta: i32,
    #[scrape(".initial")]
    initial: char,
}

#[test]
fn test_scalar_conversions() {
    let mut scalars = Scalars::default();
    unmarshal_str(
        r#"<i class="flag">TRUE</i><i class="price">3.5</i><i class="delta">-4</i><i class="initial">x</i>"#,
        &mut scalars,
    )
    .unwrap();

    assert!(scalars.flag);
    assert_eq!(scalars.price, 3.5);
    assert_eq!(scalars.delta, -4);
    assert_eq!(scalars.initial, 'x');
}

#[derive(Debug, Default, Unmarshal)]
struct Small {
    #[scrape(".n")]
    n: u8,
}

#[test]
fn test_integer_overflow_is_an_error() {
    let err = decode_err(r#"<i class="n">300</i>"#, &mut Small::default());
    let inner = err.innermost();
    assert_eq!(inner.reason, Reason::TypeConversion);
    assert_eq!(inner.shape, Shape::Scalar);
    assert_eq!(inner.value.as_deref(), Some("300"));
}

#[test]
fn test_conversion_error_path() {
    let source = r#"
        <li class="item" data-id="1"><span class="title">One</span></li>
        <li class="item" data-id="x"><span class="title">Two</span></li>
    "#;
    let err = decode_err(source, &mut Listing::default());

    assert_eq!(err.path_string(), ".items[1].id");
    assert_eq!(err.reason, Reason::TypeConversion);
    assert_eq!(err.shape, Shape::Record);

    let inner = err.innermost();
    assert_eq!(inner.type_name, "u32");
    assert_eq!(inner.value.as_deref(), Some("x"));
    assert!(inner.to_string().contains("(value \"x\")"));
}

/// Counts the nodes it is given
#[derive(Debug, Default, Unmarshal)]
#[scrape(custom)]
struct Count(usize);

impl<'doc> UnmarshalHtml<'doc> for Count {
    fn unmarshal_html(&mut self, nodes: &[HtmlNode<'doc>]) -> Result<(), BoxError> {
        self.0 = nodes.len();
        Ok(())
    }
}

#[derive(Debug, Default, Unmarshal)]
#[scrape(custom)]
struct Refuse;

impl<'doc> UnmarshalHtml<'doc> for Refuse {
    fn unmarshal_html(&mut self, _nodes: &[HtmlNode<'doc>]) -> Result<(), BoxError> {
        Err("refused".into())
    }
}

#[derive(Debug, Default, Unmarshal)]
struct Counted {
    #[scrape("li,[data-id]")]
    items: Count,
    whole: Count,
    maybe: Option<Count>,
}

#[test]
fn test_custom_decoder_takes_precedence() {
    let mut counted = Counted::default();
    unmarshal_str(
        r#"<ul><li data-id="1">a</li><li data-id="2">b</li><li>c</li></ul>"#,
        &mut counted,
    )
    .unwrap();

    assert_eq!(counted.items.0, 3);
    // Unannotated custom fields receive the record's own selection
    assert_eq!(counted.whole.0, 1);
    assert_eq!(counted.maybe.map(|count| count.0), Some(1));
}

#[derive(Debug, Default, Unmarshal)]
struct Refused {
    #[scrape("p")]
    inner: Refuse,
}

#[test]
fn test_custom_decoder_error() {
    let err = decode_err("<p>x</p>", &mut Refused::default());
    assert_eq!(err.path_string(), ".inner");

    let inner = err.innermost();
    assert_eq!(inner.reason, Reason::CustomUnmarshal);
    assert_eq!(inner.shape, Shape::Custom);
    assert_eq!(
        std::error::Error::source(inner).map(ToString::to_string),
        Some("refused".to_string())
    );
}

#[derive(Debug, Default, Unmarshal)]
struct Ignoring {
    #[scrape("!ignore")]
    skipped: String,
    #[scrape("p")]
    read: String,
}

#[test]
fn test_ignored_field() {
    let mut value = Ignoring {
        skipped: "kept".to_string(),
        read: String::new(),
    };
    unmarshal_str("<p>text</p>", &mut value).unwrap();
    assert_eq!(value.skipped, "kept");
    assert_eq!(value.read, "text");
}

#[derive(Debug, Default, Unmarshal)]
struct Indirect {
    #[scrape("h1")]
    title: Option<String>,
    #[scrape("h2")]
    missing: Option<String>,
    #[scrape("h1")]
    boxed: Box<String>,
    #[scrape("li")]
    nested: Option<Vec<Box<Item>>>,
}

#[test]
fn test_indirection_is_allocated() {
    let mut value = Indirect::default();
    unmarshal_str(
        r#"<h1>Title</h1><li data-id="9"><i class="title">nine</i></li>"#,
        &mut value,
    )
    .unwrap();

    assert_eq!(value.title.as_deref(), Some("Title"));
    assert_eq!(value.missing.as_deref(), Some(""));
    assert_eq!(*value.boxed, "Title");

    let nested = value.nested.unwrap();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].id, 9);
    assert_eq!(nested[0].title, "nine");
}

#[derive(Default, Unmarshal)]
struct Captured<'d> {
    #[scrape("li")]
    items: Nodes<'d>,
    #[scrape("h1")]
    title: String,
}

#[test]
fn test_raw_node_capture() {
    let document = Document::parse("<h1>Nodes</h1><ul><li>a</li><li>b</li></ul>");
    let mut captured = Captured::default();
    document.unmarshal(&mut captured).unwrap();

    assert_eq!(captured.title, "Nodes");
    assert_eq!(captured.items.as_slice().len(), 2);
    let names: Vec<_> = captured
        .items
        .as_slice()
        .iter()
        .filter_map(|node| node.value().as_element())
        .map(|element| element.name().to_string())
        .collect();
    assert_eq!(names, vec!["li", "li"]);
}

#[derive(Debug, Default, Unmarshal)]
struct BadSelector {
    #[scrape("li[")]
    bad: String,
}

#[test]
fn test_invalid_selector() {
    let err = decode_err("<li>a</li>", &mut BadSelector::default());
    assert_eq!(err.reason, Reason::InvalidSelector);
    assert_eq!(err.location, Some(Location::Field("bad".to_string())));
    assert_eq!(err.value.as_deref(), Some("li["));
}

#[derive(Debug, Default, Unmarshal)]
struct Heading {
    #[scrape("!Next,")]
    following: String,
    #[scrape("!Bogus,!Next,")]
    tolerant: String,
    #[scrape("!Parent,p")]
    paragraphs: Vec<String>,
    #[scrape("!NextAll,!Last,")]
    last: String,
}

#[derive(Debug, Default, Unmarshal)]
struct Article {
    #[scrape("h2")]
    heading: Heading,
}

#[test]
fn test_directives() {
    let mut article = Article::default();
    unmarshal_str(
        "<div><h2>Head</h2><p>first</p><p>second</p></div>",
        &mut article,
    )
    .unwrap();

    let heading = article.heading;
    assert_eq!(heading.following, "first");
    assert_eq!(heading.tolerant, "first");
    assert_eq!(heading.paragraphs, vec!["first", "second"]);
    assert_eq!(heading.last, "second");
}

#[derive(Debug, Default, Unmarshal)]
struct Tuple(#[scrape("h1")] String, #[scrape("p")] Vec<String>);

#[test]
fn test_tuple_struct() {
    let mut tuple = Tuple::default();
    unmarshal_str("<h1>T</h1><p>a</p><p>b</p>", &mut tuple).unwrap();
    assert_eq!(tuple.0, "T");
    assert_eq!(tuple.1, vec!["a", "b"]);
}
