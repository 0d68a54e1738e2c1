//! Reader for the Graph Modelling Language.
//!
//! A GML document is a list of `key value` pairs where a value is an integer, a real,
//! a quoted string or a bracketed list of further pairs. The graph lives under the
//! single top-level `graph` key:
//!
//! ```text
//! graph [
//!   directed 0
//!   node [ id 0 label "a" ]
//!   node [ id 1 label "b" ]
//!   edge [ source 0 target 1 ]
//! ]
//! ```

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::graph::*;
use crate::util::unescape_entities;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<(String, Value)>),
}

impl Value {
    /// first value stored under `key`, if this is a list
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::List(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        let pairs: &[(String, Value)] = match self {
            Value::List(pairs) => pairs,
            _ => &[],
        };
        pairs.iter().filter(move |(k, _)| k == key).map(|(_, v)| v)
    }

    fn truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Real(r) => *r != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) if r.is_nan() => write!(f, "nan"),
            Value::Real(r) if r.is_infinite() => write!(f, "{}", if *r > 0.0 { "inf" } else { "-inf" }),
            Value::Real(r) => write!(f, "{}", format_real(*r)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(pairs) => {
                write!(f, "[")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// formats like `1.0`, `0.25`, `1e+20` and `1e-05`: a fractional part is always kept and
/// exponents carry a sign and at least two digits
fn format_real(r: f64) -> String {
    let s = format!("{:?}", r);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0, line: 1 }
    }

    fn error<T>(&self, msg: impl Into<String>) -> Result<T> {
        Err(Error::GmlSyntax { line: self.line, msg: msg.into() })
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'#' => {
                    while self.peek().map_or(false, |c| c != b'\n') {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().map_or(false, &pred) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn string(&mut self) -> Result<Token> {
        let start_line = self.line;
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => break,
                Some(b'\n') => self.line += 1,
                Some(_) => {}
                None => {
                    return Err(Error::GmlSyntax { line: start_line, msg: "unterminated string".to_string() });
                }
            }
            self.pos += 1;
        }
        let raw = &self.src[start..self.pos];
        self.pos += 1;
        Ok(Token::Str(unescape_entities(raw)))
    }

    fn number(&mut self) -> Result<Token> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        if self.src[self.pos..].starts_with("INF") {
            self.pos += 3;
            let inf = if self.src[start..].starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
            return Ok(Token::Real(inf));
        }
        let int_digits = self.take_while(|c| c.is_ascii_digit()).len();
        let mut real = false;
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            real = true;
            self.pos += 1;
            frac_digits = self.take_while(|c| c.is_ascii_digit()).len();
        }
        if int_digits + frac_digits == 0 {
            return self.error(format!("malformed number {:?}", &self.src[start..self.pos]));
        }
        // only reals take an exponent: "1e3" is the integer 1 followed by the key e3
        if real && matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                self.pos = mark;
            }
        }
        let text = &self.src[start..self.pos];
        if real {
            match text.parse::<f64>() {
                Ok(r) => Ok(Token::Real(r)),
                Err(_) => self.error(format!("malformed real {:?}", text)),
            }
        }
        else {
            match text.parse::<i64>() {
                Ok(i) => Ok(Token::Int(i)),
                Err(_) => self.error(format!("integer {} out of range", text)),
            }
        }
    }

    /// next token together with the line it starts on
    fn next_token(&mut self) -> Result<Option<(usize, Token)>> {
        self.skip_whitespace_and_comments();
        let line = self.line;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let token = match c {
            b'[' => {
                self.pos += 1;
                Token::Open
            }
            b']' => {
                self.pos += 1;
                Token::Close
            }
            b'"' => self.string()?,
            c if c.is_ascii_alphabetic() => {
                let key = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_');
                Token::Key(key.to_string())
            }
            c if c.is_ascii_digit() || c == b'+' || c == b'-' || c == b'.' => self.number()?,
            _ => {
                let ch = self.src[self.pos..].chars().next().unwrap_or('?');
                return self.error(format!("unexpected character {:?}", ch));
            }
        };
        Ok(Some((line, token)))
    }
}

/// parses the list of pairs up to the matching `]`, or to the end of input at top level
fn parse_list(lexer: &mut Lexer, nested: bool) -> Result<Vec<(String, Value)>> {
    let mut pairs = vec![];
    loop {
        let (line, token) = match lexer.next_token()? {
            Some(t) => t,
            None if nested => return lexer.error("unexpected end of input, expected ']'"),
            None => return Ok(pairs),
        };
        let key = match token {
            Token::Key(key) => key,
            Token::Close if nested => return Ok(pairs),
            other => {
                return Err(Error::GmlSyntax { line, msg: format!("expected a key, found {:?}", other) });
            }
        };
        let value = match lexer.next_token()? {
            Some((_, Token::Int(i))) => Value::Int(i),
            Some((_, Token::Real(r))) => Value::Real(r),
            Some((_, Token::Str(s))) => Value::Str(s),
            Some((_, Token::Open)) => Value::List(parse_list(lexer, true)?),
            Some((_, Token::Key(k))) if k == "INF" => Value::Real(f64::INFINITY),
            Some((_, Token::Key(k))) if k == "NAN" => Value::Real(f64::NAN),
            Some((line, other)) => {
                return Err(Error::GmlSyntax { line, msg: format!("expected a value for key {:?}, found {:?}", key, other) });
            }
            None => return lexer.error(format!("unexpected end of input, expected a value for key {:?}", key)),
        };
        pairs.push((key, value));
    }
}

/// parses a GML document into its top-level key/value pairs
/// ```
/// use graph2tsv::gml::*;
/// let doc = parse("Creator \"me\" graph [ node [ id 1 ] ]").unwrap();
/// assert_eq!(doc[0], ("Creator".to_string(), Value::Str("me".to_string())));
/// assert_eq!(doc[1].1.get("node").unwrap().get("id"), Some(&Value::Int(1)));
/// ```
pub fn parse(src: &str) -> Result<Vec<(String, Value)>> {
    parse_list(&mut Lexer::new(src), false)
}

/// node ids compare by type and value, so `1` and `"1"` are different nodes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum NodeId {
    Int(i64),
    Real(u64),
    Str(String),
}

impl NodeId {
    fn of(v: &Value) -> Option<NodeId> {
        match v {
            Value::Int(i) => Some(NodeId::Int(*i)),
            Value::Real(r) => Some(NodeId::Real(r.to_bits())),
            Value::Str(s) => Some(NodeId::Str(s.clone())),
            Value::List(_) => None,
        }
    }
}

fn invalid<T>(msg: String) -> Result<T> {
    Err(Error::Gml(msg))
}

/// builds a graph from GML text.
///
/// `label` names the node attribute whose value becomes the node name; `"id"` names nodes
/// by their id.
pub fn parse_graph(src: &str, label: &str) -> Result<LabeledGraph> {
    let doc = parse(src)?;
    let mut graphs = doc.iter().filter(|(k, _)| k == "graph").map(|(_, v)| v);
    let graph = match (graphs.next(), graphs.next()) {
        (None, _) => return invalid("input contains no graph".to_string()),
        (Some(_), Some(_)) => return invalid("input contains more than one graph".to_string()),
        (Some(g), None) if matches!(g, Value::List(_)) => g,
        (Some(other), None) => return invalid(format!("graph is not a list but {}", other)),
    };

    let directed = graph.get("directed").map_or(false, Value::truthy);
    let multigraph = graph.get("multigraph").map_or(false, Value::truthy);
    let mut g = LabeledGraph::new(directed);

    let mut ids = HashMap::<NodeId, Node>::new();
    for (i, node) in graph.get_all("node").enumerate() {
        if !matches!(node, Value::List(_)) {
            return invalid(format!("node #{} is not a list", i));
        }
        let id = match node.get("id") {
            Some(id) => id,
            None => return invalid(format!("node #{} has no 'id' attribute", i)),
        };
        let key = match NodeId::of(id) {
            Some(key) => key,
            None => return invalid(format!("node #{} has a list as id", i)),
        };
        if ids.contains_key(&key) {
            return invalid(format!("node id {} is duplicated", id));
        }
        let name = if label == "id" {
            id.to_string()
        }
        else {
            match node.get(label) {
                Some(name) => name.to_string(),
                None => return invalid(format!("node #{} has no '{}' attribute", i, label)),
            }
        };
        if g.node(&name).is_some() {
            return invalid(format!("node label {:?} is duplicated", name));
        }
        ids.insert(key, g.add_node(name));
    }

    for (i, edge) in graph.get_all("edge").enumerate() {
        let endpoint = |attr: &str| -> Result<Node> {
            let id = match edge.get(attr) {
                Some(id) => id,
                None => return invalid(format!("edge #{} has no '{}' attribute", i, attr)),
            };
            match NodeId::of(id).and_then(|key| ids.get(&key)) {
                Some(&v) => Ok(v),
                None => invalid(format!("edge #{} refers to undefined node {}", i, id)),
            }
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        if !multigraph && g.has_edge(source, target) {
            let arrow = if directed { "->" } else { "--" };
            return invalid(format!(
                "edge #{} ({}{}{}) is duplicated; set 'multigraph 1' to allow parallel edges",
                i, g.name(source), arrow, g.name(target)));
        }
        g.connect(source, target);
    }

    debug!("GML graph: {} nodes, {} arcs, directed: {}, multigraph: {}", g.nnodes(), g.edges().len(), directed, multigraph);
    return Ok(g);
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        # a triangle
        graph [
          node [ id 0 label "a" ]
          node [ id 1 label "b" ]
          node [ id 2 label "c" ]
          edge [ source 0 target 1 ]
          edge [ source 1 target 2 ]
          edge [ source 2 target 0 ]
        ]
    "#;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(src);
        let mut res = vec![];
        while let Some((_, t)) = lexer.next_token().unwrap() {
            res.push(t);
        }
        res
    }

    #[test]
    fn lex_scalars() {
        assert_eq!(tokens("a 1 -2 +3 1.5 .5 2. 1.5e3 2.E-2 -INF INF [ ] \"s t\" # comment"), vec![
            Token::Key("a".into()),
            Token::Int(1),
            Token::Int(-2),
            Token::Int(3),
            Token::Real(1.5),
            Token::Real(0.5),
            Token::Real(2.0),
            Token::Real(1500.0),
            Token::Real(0.02),
            Token::Real(f64::NEG_INFINITY),
            Token::Key("INF".into()),
            Token::Open,
            Token::Close,
            Token::Str("s t".into()),
        ]);
    }

    #[test]
    fn lex_tracks_lines() {
        let mut lexer = Lexer::new("a\n\"multi\nline\"\nb");
        assert_eq!(lexer.next_token().unwrap().unwrap().0, 1);
        assert_eq!(lexer.next_token().unwrap().unwrap().0, 2);
        assert_eq!(lexer.next_token().unwrap().unwrap(), (4, Token::Key("b".into())));
    }

    #[test]
    fn parse_nested_lists() {
        let doc = parse("graph [ node [ id 1 graphics [ x 1.0 y 2.0 ] ] label \"g\" ]").unwrap();
        assert_eq!(doc.len(), 1);
        let graph = &doc[0].1;
        assert_eq!(graph.get("label"), Some(&Value::Str("g".into())));
        let graphics = graph.get("node").unwrap().get("graphics").unwrap();
        assert_eq!(graphics.get("y"), Some(&Value::Real(2.0)));
        assert_eq!(parse("x NAN").unwrap()[0].1.to_string(), "nan");
    }

    #[test]
    fn exponents_need_a_fraction() {
        assert_eq!(tokens("1e3"), vec![Token::Int(1), Token::Key("e3".into())]);
        assert_eq!(tokens("1.e"), vec![Token::Real(1.0), Token::Key("e".into())]);
        assert!(matches!(parse_graph("graph [ node [ id 0 label 1e3 ] ]", "label"), Err(Error::GmlSyntax { .. })));
    }

    #[test]
    fn bare_inf_is_a_real() {
        assert_eq!(parse("x INF").unwrap()[0].1, Value::Real(f64::INFINITY));
        assert_eq!(parse("x INF").unwrap()[0].1.to_string(), "inf");
    }

    #[test]
    fn reals_print_like_python_floats() {
        let src = "graph [ node [ id 0 label 1.0E20 ] node [ id 1 label 0.00001 ] node [ id 2 label 2.0 ] node [ id 3 label 1.5e-7 ] node [ id 4 label 0.0001 ] ]";
        let g = parse_graph(src, "label").unwrap();
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["1e+20", "1e-05", "2.0", "1.5e-07", "0.0001"]);
        assert_eq!(format_real(1.25e123), "1.25e+123");
    }

    #[test]
    fn labels_that_print_alike_collide() {
        // names are the printed labels, so 1 and "1" would share a column
        let src = "graph [ node [ id 0 label 1 ] node [ id 1 label \"1\" ] ]";
        match parse_graph(src, "label") {
            Err(Error::Gml(msg)) => assert!(msg.contains("label \"1\" is duplicated"), "{}", msg),
            other => panic!("expected duplicate label, got {:?}", other),
        }
    }

    #[test]
    fn syntax_errors() {
        for (src, line) in [
            ("graph [ node [ id 1 ]", 1),
            ("graph [\n]\n]", 3),
            ("graph\n", 2),
            ("graph [ 1 2 ]", 1),
            ("graph [\n label \"open ]", 2),
            ("graph [ id 99999999999999999999 ]", 1),
            ("graph [ id @ ]", 1),
        ] {
            match parse(src) {
                Err(Error::GmlSyntax { line: l, .. }) => assert_eq!(l, line, "{}", src),
                other => panic!("{}: expected syntax error, got {:?}", src, other),
            }
        }
    }

    #[test]
    fn triangle() {
        let g = parse_graph(TRIANGLE, "label").unwrap();
        assert!(!g.is_directed());
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(g.edges(), vec![[0, 1], [0, 2], [1, 0], [1, 2], [2, 0], [2, 1]]);
    }

    #[test]
    fn directed_graph_keeps_arcs() {
        let src = "graph [ directed 1 node [ id 7 label \"x\" ] node [ id 3 label \"y\" ] edge [ source 7 target 3 ] edge [ source 3 target 7 ] ]";
        let g = parse_graph(src, "label").unwrap();
        assert!(g.is_directed());
        assert_eq!(g.edges(), vec![[0, 1], [1, 0]]);

        let src = "graph [ directed 1 node [ id 7 label \"x\" ] node [ id 3 label \"y\" ] edge [ source 7 target 3 ] ]";
        let g = parse_graph(src, "label").unwrap();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
    }

    #[test]
    fn names_from_ids_and_other_attributes() {
        let src = "graph [ node [ id 10 name \"ten\" weight 1.0 ] node [ id \"b\" name \"bee\" weight 2.5 ] ]";
        let by_id = parse_graph(src, "id").unwrap();
        assert_eq!(by_id.names().collect::<Vec<_>>(), vec!["10", "b"]);
        let by_name = parse_graph(src, "name").unwrap();
        assert_eq!(by_name.names().collect::<Vec<_>>(), vec!["ten", "bee"]);
        let by_weight = parse_graph(src, "weight").unwrap();
        assert_eq!(by_weight.names().collect::<Vec<_>>(), vec!["1.0", "2.5"]);
    }

    #[test]
    fn entities_in_labels() {
        let g = parse_graph("graph [ node [ id 0 label \"R&amp;D &#946;\" ] ]", "label").unwrap();
        assert_eq!(g.name(0), "R&D \u{3b2}");
    }

    #[test]
    fn multigraph_allows_parallel_edges() {
        let src = "graph [ multigraph 1 node [ id 0 label \"a\" ] node [ id 1 label \"b\" ] edge [ source 0 target 1 ] edge [ source 1 target 0 ] ]";
        let g = parse_graph(src, "label").unwrap();
        assert_eq!(g.edges(), vec![[0, 1], [1, 0]]);
    }

    #[test]
    fn invalid_graphs() {
        for (src, needle) in [
            ("Creator \"nobody\"", "no graph"),
            ("graph [ ] graph [ ]", "more than one graph"),
            ("graph 1", "not a list"),
            ("graph [ node [ label \"a\" ] ]", "no 'id'"),
            ("graph [ node [ id 0 ] ]", "no 'label'"),
            ("graph [ node [ id 0 label \"a\" ] node [ id 0 label \"b\" ] ]", "id 0 is duplicated"),
            ("graph [ node [ id 0 label \"a\" ] node [ id 1 label \"a\" ] ]", "label \"a\" is duplicated"),
            ("graph [ node [ id 0 label \"a\" ] edge [ target 0 ] ]", "no 'source'"),
            ("graph [ node [ id 0 label \"a\" ] edge [ source 0 target 5 ] ]", "undefined node 5"),
            ("graph [ node [ id 0 label \"a\" ] node [ id 1 label \"b\" ] edge [ source 0 target 1 ] edge [ source 1 target 0 ] ]", "duplicated"),
        ] {
            match parse_graph(src, "label") {
                Err(Error::Gml(msg)) => assert!(msg.contains(needle), "{}: {}", src, msg),
                other => panic!("{}: expected invalid graph, got {:?}", src, other),
            }
        }
    }

    #[test]
    fn int_and_string_ids_differ() {
        let src = "graph [ node [ id 1 label \"int\" ] node [ id \"1\" label \"str\" ] edge [ source \"1\" target \"1\" ] ]";
        let g = parse_graph(src, "label").unwrap();
        assert_eq!(g.edges(), vec![[1, 1]]);
    }
}
