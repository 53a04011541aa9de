//! Contract identifiers and the trait binding Rust types to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ResolveError;

/// Identifier for an abstract or concrete type.
///
/// Two identifiers are equal iff they denote the same type. Generic
/// contracts distinguish their *open* form (no type arguments supplied,
/// written `Repository<_>`) from closed forms (`Repository<Customer>`).
///
/// The textual form round-trips through [`Display`](fmt::Display) and
/// [`FromStr`]; declarative wiring uses it as its binding syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractId {
    /// A non-generic type.
    Simple(String),
    /// A generic type; empty `args` is the open form.
    Generic {
        name: String,
        args: Vec<ContractId>,
    },
}

impl ContractId {
    /// Identifier for a non-generic type.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    /// Identifier for a closed generic type.
    pub fn generic(name: impl Into<String>, args: Vec<ContractId>) -> Self {
        Self::Generic {
            name: name.into(),
            args,
        }
    }

    /// The open (unparameterized) form of a generic type.
    pub fn open(name: impl Into<String>) -> Self {
        Self::Generic {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// The type name without any argument list.
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(name) | Self::Generic { name, .. } => name,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic { .. })
    }

    /// Whether this is an open generic (no type arguments supplied).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Generic { args, .. } if args.is_empty())
    }

    /// Whether this is a generic with its type arguments supplied.
    pub fn is_closed_generic(&self) -> bool {
        matches!(self, Self::Generic { args, .. } if !args.is_empty())
    }

    /// Type arguments; empty for simple and open identifiers.
    pub fn type_args(&self) -> &[ContractId] {
        match self {
            Self::Simple(_) => &[],
            Self::Generic { args, .. } => args,
        }
    }

    /// The open form of a generic identifier, or `None` for a simple one.
    pub fn open_form(&self) -> Option<ContractId> {
        match self {
            Self::Simple(_) => None,
            Self::Generic { name, .. } => Some(Self::open(name.clone())),
        }
    }

    /// Closes a generic identifier with the given type arguments.
    pub fn close_with(&self, args: &[ContractId]) -> Result<ContractId, ResolveError> {
        match self {
            Self::Simple(_) => Err(ResolveError::NotGeneric(self.clone())),
            Self::Generic { name, .. } => Ok(Self::generic(name.clone(), args.to_vec())),
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => write!(f, "{}", name),
            Self::Generic { name, args } if args.is_empty() => write!(f, "{}<_>", name),
            Self::Generic { name, args } => {
                write!(f, "{}<", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}

impl FromStr for ContractId {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let id = parser.contract()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.error("trailing input"));
        }
        Ok(id)
    }
}

impl Serialize for ContractId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContractId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Recursive-descent parser for the textual form:
/// `Name`, `Name<_>`, `Name<>` (both open), `Name<A, B<C>>`.
struct Parser<'a> {
    text: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, rest: text }
    }

    fn contract(&mut self) -> Result<ContractId, ResolveError> {
        let name = self.ident()?;
        self.skip_ws();
        if !self.eat('<') {
            return Ok(ContractId::simple(name));
        }
        self.skip_ws();
        if self.eat('_') {
            self.skip_ws();
            if !self.eat('>') {
                return Err(self.error("expected '>' after '_'"));
            }
            return Ok(ContractId::open(name));
        }
        if self.eat('>') {
            return Ok(ContractId::open(name));
        }
        let mut args = vec![self.contract()?];
        loop {
            self.skip_ws();
            if self.eat(',') {
                args.push(self.contract()?);
            } else if self.eat('>') {
                break;
            } else {
                return Err(self.error("expected ',' or '>'"));
            }
        }
        Ok(ContractId::generic(name, args))
    }

    fn ident(&mut self) -> Result<String, ResolveError> {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(self.error("expected identifier"));
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name.to_string())
    }

    fn eat(&mut self, c: char) -> bool {
        if let Some(stripped) = self.rest.strip_prefix(c) {
            self.rest = stripped;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn error(&self, reason: &str) -> ResolveError {
        ResolveError::InvalidContract {
            text: self.text.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Binds a Rust type to its contract identifier.
///
/// Derivable for structs. Trait-object contracts are implemented by hand
/// on the boxed form:
///
/// ```ignore
/// impl Contract for Box<dyn Logger> {
///     fn contract() -> ContractId {
///         ContractId::simple("Logger")
///     }
/// }
/// ```
pub trait Contract: 'static {
    fn contract() -> ContractId;
}
