//! Two-stage command parser.
//!
//! Stage one decides which grammar a line uses:
//!
//! ```text
//! canonical:  <verb> <ClassName> [<id>] [<attribute> <value> | {<object>}]
//! dotted:     <ClassName>.<verb>(<args>)
//! ```
//!
//! Stage two turns either form into the same structured [`Request`], so equivalent calls
//! reach the handlers with identical arguments. Dotted calls whose arguments do not start
//! with a quoted id are rewritten into canonical text and parsed again, exactly like a line
//! typed in that form.

/// Interpreter verbs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verb {
    Create,
    Show,
    Destroy,
    All,
    Count,
    Update,
    Help,
    Quit,
    Eof,
}

impl Verb {
    /// Verbs listed by `help`, in listing order.
    pub const DOCUMENTED: [Verb; 9] = [
        Verb::Eof,
        Verb::All,
        Verb::Count,
        Verb::Create,
        Verb::Destroy,
        Verb::Help,
        Verb::Quit,
        Verb::Show,
        Verb::Update,
    ];

    pub fn from_word(word: &str) -> Option<Self> {
        Self::DOCUMENTED.into_iter().find(|v| v.name() == word)
    }

    pub fn name(self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Show => "show",
            Verb::Destroy => "destroy",
            Verb::All => "all",
            Verb::Count => "count",
            Verb::Update => "update",
            Verb::Help => "help",
            Verb::Quit => "quit",
            Verb::Eof => "EOF",
        }
    }

    /// One-line description printed by `help <verb>`.
    pub fn summary(self) -> &'static str {
        match self {
            Verb::Create => "Create a new instance of a class, save it and print its id.",
            Verb::Show => "Print the string representation of an instance by class name and id.",
            Verb::Destroy => "Delete an instance by class name and id.",
            Verb::All => "Print all instances, optionally filtered by class name.",
            Verb::Count => "Print the number of instances of a class.",
            Verb::Update => {
                "Update an instance by class name and id: update <class> <id> <attribute> \"<value>\""
            }
            Verb::Help => "List available commands with \"help\" or detailed help with \"help cmd\".",
            Verb::Quit => "Exit the program.",
            Verb::Eof => "Exit the program at end of input.",
        }
    }
}

/// Value operand of an attribute update, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// `"..."`: always text.
    Quoted(String),
    /// Anything else: numeric inference applies.
    Bare(String),
}

impl RawValue {
    pub fn text(&self) -> &str {
        match self {
            RawValue::Quoted(s) | RawValue::Bare(s) => s,
        }
    }
}

/// Class + id operands shared by the instance-level verbs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub class_name: Option<String>,
    pub id: Option<String>,
}

/// What an `update` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Attribute {
        name: Option<String>,
        value: Option<RawValue>,
    },
    /// Brace-delimited object text, quotes not yet normalized.
    Object(String),
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Empty,
    Create { class_name: Option<String> },
    Show(Target),
    Destroy(Target),
    All { class_name: Option<String> },
    Count { class_name: Option<String> },
    Update { target: Target, change: Change },
    Help { topic: Option<String> },
    Quit,
    Eof,
    /// Not a command of this interpreter; carries the line as typed.
    Unknown(String),
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Request {
    let line = line.trim();
    if line.is_empty() {
        return Request::Empty;
    }
    match DottedCall::recognize(line) {
        Some(call) => call.into_request(line),
        None => parse_canonical(line),
    }
}

/// Parse a line in canonical `<verb> <args…>` form.
pub fn parse_canonical(line: &str) -> Request {
    let tokens = tokenize(line);
    let Some(first) = tokens.first() else {
        return Request::Empty;
    };
    let verb = match Verb::from_word(first.text).filter(|_| !first.quoted) {
        Some(verb) => verb,
        None => return Request::Unknown(line.trim().to_string()),
    };

    let operand = |idx: usize| tokens.get(idx).and_then(|t| non_empty(t.text));
    let target = || Target {
        class_name: operand(1),
        id: operand(2),
    };

    match verb {
        Verb::Create => Request::Create {
            class_name: operand(1),
        },
        Verb::Show => Request::Show(target()),
        Verb::Destroy => Request::Destroy(target()),
        Verb::All => Request::All {
            class_name: operand(1),
        },
        Verb::Count => Request::Count {
            class_name: operand(1),
        },
        Verb::Update => {
            let change = match tokens.get(3) {
                Some(tok) if !tok.quoted => match object_text(&line[tok.start..]) {
                    Some(object) => Change::Object(object.to_string()),
                    None => attribute_change(&tokens),
                },
                _ => attribute_change(&tokens),
            };
            Request::Update {
                target: target(),
                change,
            }
        }
        Verb::Help => Request::Help { topic: operand(1) },
        Verb::Quit => Request::Quit,
        Verb::Eof => Request::Eof,
    }
}

fn attribute_change(tokens: &[Token<'_>]) -> Change {
    Change::Attribute {
        name: tokens.get(3).and_then(|t| non_empty(t.text)),
        value: tokens.get(4).map(Token::raw_value),
    }
}

/// `Class.verb(args)`, recognized only when the whole line has that shape and the argument
/// list contains no closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DottedCall<'a> {
    pub class_name: &'a str,
    pub method: &'a str,
    pub args: &'a str,
}

impl<'a> DottedCall<'a> {
    pub fn recognize(line: &'a str) -> Option<Self> {
        let (class_name, rest) = line.split_once('.')?;
        if !class_name.chars().all(is_word_char) {
            return None;
        }
        let open = rest.find('(')?;
        let method = &rest[..open];
        if method.is_empty() || !method.chars().all(is_word_char) {
            return None;
        }
        let args = rest[open + 1..].strip_suffix(')')?;
        if args.contains(')') {
            return None;
        }
        Some(Self {
            class_name,
            method,
            args,
        })
    }

    /// Normalize into a [`Request`]. `line` is reported verbatim for unknown methods.
    pub fn into_request(self, line: &str) -> Request {
        let Some(verb) = Verb::from_word(self.method) else {
            return Request::Unknown(line.to_string());
        };

        let Some((id, rest)) = split_quoted_id(self.args) else {
            return parse_canonical(&format!("{} {} {}", self.method, self.class_name, self.args));
        };

        let class_name = non_empty(self.class_name);
        let target = Target {
            class_name: class_name.clone(),
            id: non_empty(id),
        };

        match verb {
            Verb::Create => Request::Create { class_name },
            Verb::Show => Request::Show(target),
            Verb::Destroy => Request::Destroy(target),
            Verb::All => Request::All { class_name },
            Verb::Count => Request::Count { class_name },
            Verb::Update => {
                let change = match rest {
                    Some(rest) if rest.starts_with('{') && rest.ends_with('}') => {
                        Change::Object(rest.to_string())
                    }
                    Some(rest) => dotted_attribute_change(rest),
                    None => Change::Attribute {
                        name: None,
                        value: None,
                    },
                };
                Request::Update { target, change }
            }
            Verb::Help => Request::Help { topic: class_name },
            Verb::Quit => Request::Quit,
            Verb::Eof => Request::Eof,
        }
    }
}

/// `"<id>"` optionally followed by `, <rest>`.
fn split_quoted_id(args: &str) -> Option<(&str, Option<&str>)> {
    let after = args.strip_prefix('"')?;
    let close = after.find('"')?;
    let id = &after[..close];
    let tail = &after[close + 1..];
    if tail.is_empty() {
        Some((id, None))
    } else {
        tail.strip_prefix(", ").map(|rest| (id, Some(rest)))
    }
}

/// `["<attribute>"][, <value>]`; anything else names no attribute.
fn dotted_attribute_change(rest: &str) -> Change {
    let missing = Change::Attribute {
        name: None,
        value: None,
    };

    let (name, tail) = match rest.strip_prefix('"').and_then(|after| {
        after
            .find('"')
            .map(|close| (&after[..close], &after[close + 1..]))
    }) {
        Some((name, tail)) => (non_empty(name), tail),
        None => (None, rest),
    };

    let value = if tail.is_empty() {
        None
    } else {
        match tail.strip_prefix(", ") {
            Some(value_text) => tokenize(value_text).first().map(Token::raw_value),
            None => return missing,
        }
    };

    Change::Attribute { name, value }
}

/// The trimmed remainder when it is a single brace-delimited object.
fn object_text(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    (rest.starts_with('{') && rest.ends_with('}')).then_some(rest)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Whitespace-separated word, or a double-quoted string that may contain whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    quoted: bool,
    /// Byte offset of the token (including any opening quote) in the tokenized text.
    start: usize,
}

impl Token<'_> {
    fn raw_value(&self) -> RawValue {
        if self.quoted {
            RawValue::Quoted(self.text.to_string())
        } else {
            RawValue::Bare(self.text.to_string())
        }
    }
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            if let Some(close) = input[start + 1..].find('"') {
                let end = start + 1 + close;
                tokens.push(Token {
                    text: &input[start + 1..end],
                    quoted: true,
                    start,
                });
                while chars.next_if(|&(i, _)| i <= end).is_some() {}
                continue;
            }
        }

        let mut end = input.len();
        while let Some(&(i, ch)) = chars.peek() {
            if ch.is_whitespace() {
                end = i;
                break;
            }
            chars.next();
        }
        tokens.push(Token {
            text: &input[start..end],
            quoted: false,
            start,
        });
    }

    tokens
}
