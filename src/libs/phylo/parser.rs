use super::error::TreeError;
use super::node::Node;
use super::tree::Tree;
use crate::libs::date::Date;
use lazy_static::lazy_static;
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{cut, map, map_res, opt},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, preceded, terminated},
    IResult, Offset, Parser,
};
use regex::Regex;

// ================================================================================================
// Error Handling Structures
// ================================================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DetailedErrorKind {
    Context(&'static str),
    Nom(ErrorKind),
}

/// A custom error type for nom that accumulates context and error kinds.
/// The first entry is the innermost failure, contexts are appended outward.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailedError<'a> {
    pub errors: Vec<(&'a str, DetailedErrorKind)>,
}

impl<'a> ParseError<&'a str> for DetailedError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        DetailedError {
            errors: vec![(input, DetailedErrorKind::Nom(kind))],
        }
    }

    fn append(input: &'a str, kind: ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, DetailedErrorKind::Nom(kind)));
        other
    }
}

impl<'a> ContextError<&'a str> for DetailedError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, DetailedErrorKind::Context(ctx)));
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for DetailedError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        DetailedError {
            errors: vec![(input, DetailedErrorKind::Nom(kind))],
        }
    }
}

type PResult<'a, O> = IResult<&'a str, O, DetailedError<'a>>;

// ================================================================================================
// Parsers
// ================================================================================================

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!\"#$%&'*+-./<=>?@[\\]^_`{|}~".contains(c)
}

fn parse_name(input: &str) -> PResult<'_, &str> {
    take_while1(is_name_char).parse(input)
}

// `:` number, surrounding whitespace allowed
fn parse_edge(input: &str) -> PResult<'_, f64> {
    preceded(
        terminated(char(':'), multispace0),
        cut(context(
            "edge length expected",
            map_res(recognize_float, |s: &str| s.parse::<f64>()),
        )),
    )
    .parse(input)
}

fn parse_optional_edge(input: &str) -> PResult<'_, f64> {
    map(opt(terminated(parse_edge, multispace0)), |e| {
        e.unwrap_or(0.0)
    })
    .parse(input)
}

fn parse_name_elem(input: &str) -> PResult<'_, Node> {
    let (input, name) = terminated(parse_name, multispace0).parse(input)?;
    let (input, edge) = parse_optional_edge(input)?;
    Ok((input, make_leaf(name, edge)))
}

fn parse_subtree_elem(input: &str) -> PResult<'_, Node> {
    let (input, children) = terminated(parse_subtree, multispace0).parse(input)?;
    let (input, edge) = parse_optional_edge(input)?;
    Ok((input, Node::internal(children, edge)))
}

fn parse_subtree_or_name(input: &str) -> PResult<'_, Node> {
    match parse_subtree_elem(input) {
        Err(nom::Err::Error(_)) => parse_name_elem(input),
        other => other,
    }
}

fn parse_element(input: &str) -> PResult<'_, Node> {
    ws(context(
        "either name or subtree expected",
        parse_subtree_or_name,
    ))
    .parse(input)
}

// element (',' element)*
fn parse_content(input: &str) -> PResult<'_, Vec<Node>> {
    let (input, first) = parse_element(input)?;
    let (input, rest) = many0(preceded(char(','), cut(parse_element))).parse(input)?;
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(first);
    children.extend(rest);
    Ok((input, children))
}

// '(' content ')'
fn parse_subtree(input: &str) -> PResult<'_, Vec<Node>> {
    preceded(
        char('('),
        cut(terminated(
            parse_content,
            context("')' expected", char(')')),
        )),
    )
    .parse(input)
}

fn parse_tree(input: &str) -> PResult<'_, Node> {
    let (input, _) = multispace0(input)?;
    let (input, children) = context("'(' expected", parse_subtree).parse(input)?;
    let (input, _) = multispace0(input)?;
    let (input, edge) = parse_optional_edge(input)?;
    let (input, _) = cut(context("';' expected", char(';'))).parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, Node::internal(children, edge)))
}

// ================================================================================================
// Leaf names
// ================================================================================================

lazy_static! {
    static ref RE_DATE_SUFFIX: Regex =
        Regex::new(r"^.+-[12][09][0-9]{2}-[01][0-9]-[0-3][0-9]$").expect("valid regex");
}

/// Replaces `%xx` (two hex digits) with the byte it encodes.
///
/// ```
/// use tredraw::libs::phylo::parser::percent_decode;
/// assert_eq!(percent_decode("X%20Y"), "X Y");
/// assert_eq!(percent_decode("100%"), "100%");
/// assert_eq!(percent_decode("%2x"), "%2x");
/// ```
pub fn percent_decode(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            let hex = &name[i + 1..i + 3];
            // two hex digits always fit a byte
            out.push(u8::from_str_radix(hex, 16).unwrap_or(b'%'));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a trailing `-YYYY-MM-DD` off a strain name.
pub fn split_date(name: &str) -> (String, Date) {
    if RE_DATE_SUFFIX.is_match(name) {
        let cut_at = name.len() - 10;
        if let (Some(stem), Some(suffix)) = (name.get(..cut_at - 1), name.get(cut_at..)) {
            match Date::parse(suffix) {
                Ok(date) => return (stem.to_string(), date),
                Err(e) => log::warn!("{}: {}", name, e),
            }
        }
    }
    (name.to_string(), Date::default())
}

fn make_leaf(raw: &str, edge: f64) -> Node {
    let (name, date) = split_date(&percent_decode(raw));
    Node::leaf(name, edge).with_date(date)
}

// ================================================================================================
// Entry Points
// ================================================================================================

/// Parses a Newick tree and runs the analysis pass on it.
///
/// # Example
/// ```
/// use tredraw::libs::phylo::parser::parse_newick;
///
/// let tree = parse_newick("((A:1,B:2):3,C:4);").unwrap();
/// assert_eq!(tree.number_of_leaves(), 3);
///
/// let err = parse_newick("(A:1,:2);").unwrap_err();
/// assert!(err.to_string().contains("either name or subtree expected"));
/// ```
pub fn parse_newick(input: &str) -> Result<Tree, TreeError> {
    match parse_tree(input) {
        Ok((_, root)) => {
            let mut tree = Tree::new(root);
            tree.analyse();
            Ok(tree)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(make_tree_error(input, e)),
        Err(nom::Err::Incomplete(_)) => Err(TreeError::ParseError {
            message: "incomplete input".to_string(),
            offset: input.len(),
            preview: String::new(),
        }),
    }
}

// Convert nom errors into TreeError, reporting the innermost position
fn make_tree_error(input: &str, e: DetailedError) -> TreeError {
    let remaining = e.errors.first().map(|(r, _)| *r).unwrap_or(input);
    let offset = input.offset(remaining);

    let message = e
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            DetailedErrorKind::Context(ctx) => Some(ctx.to_string()),
            DetailedErrorKind::Nom(_) => None,
        })
        .or_else(|| {
            e.errors.first().map(|(_, kind)| match kind {
                DetailedErrorKind::Nom(k) => format!("parsing failed: {:?}", k),
                DetailedErrorKind::Context(ctx) => ctx.to_string(),
            })
        })
        .unwrap_or_else(|| "parsing failed".to_string());

    TreeError::ParseError {
        message,
        offset,
        preview: remaining.chars().take(40).collect(),
    }
}

impl Tree {
    pub fn from_newick(input: &str) -> Result<Self, TreeError> {
        parse_newick(input)
    }
}
