//! Move type tags.
//!
//! A `TypeTag` describes the static shape of a Move value. It is the schema
//! that drives the BCS value decoder: the bytes of an argument carry no type
//! information of their own.
//!
//! Three representations are supported:
//! - the JSON shape returned by `contract.resolve_function`
//!   (`"U64"`, `{"Vector": ..}`, `{"Struct": {..}}`)
//! - canonical Move text (`vector<0x1::Token::Token<u8>>`) via `Display` / `FromStr`
//! - BCS, decoded by `movecodec-bcs`

use crate::error::TypeTagParseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nesting limit for the text parser. Deeper input is rejected rather than
/// risking stack exhaustion.
const MAX_PARSE_DEPTH: usize = 128;

/// Fixed-width Move primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Bool,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::U128,
        PrimitiveKind::U256,
        PrimitiveKind::Address,
        PrimitiveKind::Signer,
    ];

    /// Name used in the JSON representation ("U64", "Address", ...).
    pub fn json_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::U8 => "U8",
            PrimitiveKind::U16 => "U16",
            PrimitiveKind::U32 => "U32",
            PrimitiveKind::U64 => "U64",
            PrimitiveKind::U128 => "U128",
            PrimitiveKind::U256 => "U256",
            PrimitiveKind::Address => "Address",
            PrimitiveKind::Signer => "Signer",
        }
    }

    /// Name used in Move source text ("u64", "address", ...).
    pub fn move_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::U128 => "u128",
            PrimitiveKind::U256 => "u256",
            PrimitiveKind::Address => "address",
            PrimitiveKind::Signer => "signer",
        }
    }

    /// Look up a primitive by either its JSON or Move name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.json_name().eq_ignore_ascii_case(name))
    }

    /// Width in bytes of an unsigned integer primitive.
    pub fn int_width(self) -> Option<usize> {
        match self {
            PrimitiveKind::U8 => Some(1),
            PrimitiveKind::U16 => Some(2),
            PrimitiveKind::U32 => Some(4),
            PrimitiveKind::U64 => Some(8),
            PrimitiveKind::U128 => Some(16),
            PrimitiveKind::U256 => Some(32),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.move_name())
    }
}

/// A fully-qualified struct type with its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructTag {
    pub address: String,
    pub module: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
        type_params: Vec<TypeTag>,
    ) -> Self {
        Self {
            address: address.into(),
            module: module.into(),
            name: name.into(),
            type_params,
        }
    }

    /// `address::module::name` without generic arguments.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}::{}", self.address, self.module, self.name)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// The static type of a Move value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeTagRepr", into = "TypeTagRepr")]
pub enum TypeTag {
    Primitive(PrimitiveKind),
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    /// A primitive name outside the recognised set. Values of this type
    /// cannot be decoded; the raw argument is shown instead.
    Unsupported(String),
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn struct_tag(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }

    /// Name of the first unsupported primitive anywhere in this tag.
    pub fn unsupported_name(&self) -> Option<&str> {
        match self {
            TypeTag::Primitive(_) => None,
            TypeTag::Vector(inner) => inner.unsupported_name(),
            TypeTag::Struct(s) => s.type_params.iter().find_map(|p| p.unsupported_name()),
            TypeTag::Unsupported(name) => Some(name.as_str()),
        }
    }

    /// Maximum nesting depth; a primitive has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            TypeTag::Primitive(_) | TypeTag::Unsupported(_) => 1,
            TypeTag::Vector(inner) => 1 + inner.depth(),
            TypeTag::Struct(s) => 1 + s.type_params.iter().map(TypeTag::depth).max().unwrap_or(0),
        }
    }

    pub fn is_signer(&self) -> bool {
        matches!(self, TypeTag::Primitive(PrimitiveKind::Signer))
    }
}

impl From<PrimitiveKind> for TypeTag {
    fn from(kind: PrimitiveKind) -> Self {
        TypeTag::Primitive(kind)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Primitive(kind) => write!(f, "{kind}"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(s) => write!(f, "{s}"),
            TypeTag::Unsupported(name) => write!(f, "{}", name.to_lowercase()),
        }
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let tag = parser.type_tag(0)?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(tag)
    }
}

// ─── JSON representation ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
enum CompositeRepr {
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TypeTagRepr {
    Name(String),
    Composite(CompositeRepr),
}

impl From<TypeTagRepr> for TypeTag {
    fn from(repr: TypeTagRepr) -> Self {
        match repr {
            TypeTagRepr::Name(name) => match PrimitiveKind::from_name(&name) {
                Some(kind) => TypeTag::Primitive(kind),
                None => TypeTag::Unsupported(name),
            },
            TypeTagRepr::Composite(CompositeRepr::Vector(inner)) => TypeTag::Vector(inner),
            TypeTagRepr::Composite(CompositeRepr::Struct(s)) => TypeTag::Struct(s),
        }
    }
}

impl From<TypeTag> for TypeTagRepr {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Primitive(kind) => TypeTagRepr::Name(kind.json_name().to_string()),
            TypeTag::Unsupported(name) => TypeTagRepr::Name(name),
            TypeTag::Vector(inner) => TypeTagRepr::Composite(CompositeRepr::Vector(inner)),
            TypeTag::Struct(s) => TypeTagRepr::Composite(CompositeRepr::Struct(s)),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TypeTag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TypeTag>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Text grammar ─────────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> TypeTagParseError {
        TypeTagParseError {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), TypeTagParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{token}'")))
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeTagParseError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(i, c)| {
                !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
            })
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn address(&mut self) -> Result<&'a str, TypeTagParseError> {
        self.skip_ws();
        let start = self.pos;
        self.expect("0x")?;
        let digits = self
            .rest()
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(self.rest().len());
        if digits == 0 {
            return Err(self.error("expected hex digits after '0x'"));
        }
        self.pos += digits;
        Ok(&self.src[start..self.pos])
    }

    fn type_tag(&mut self, depth: usize) -> Result<TypeTag, TypeTagParseError> {
        if depth >= MAX_PARSE_DEPTH {
            return Err(self.error("type tag nested too deeply"));
        }
        self.skip_ws();
        if self.rest().starts_with("0x") {
            return self.struct_tag(depth).map(TypeTag::struct_tag);
        }

        let ident = self.ident()?;
        if ident == "vector" {
            self.expect("<")?;
            let inner = self.type_tag(depth + 1)?;
            self.expect(">")?;
            return Ok(TypeTag::vector(inner));
        }
        if self.rest().trim_start().starts_with("::") {
            return Err(self.error("struct address must be 0x-prefixed hex"));
        }
        Ok(match PrimitiveKind::ALL.into_iter().find(|k| k.move_name() == ident) {
            Some(kind) => TypeTag::Primitive(kind),
            None => TypeTag::Unsupported(ident.to_string()),
        })
    }

    fn struct_tag(&mut self, depth: usize) -> Result<StructTag, TypeTagParseError> {
        let address = self.address()?;
        self.expect("::")?;
        let module = self.ident()?;
        self.expect("::")?;
        let name = self.ident()?;

        let mut type_params = Vec::new();
        if self.eat("<") {
            loop {
                type_params.push(self.type_tag(depth + 1)?);
                if self.eat(">") {
                    break;
                }
                self.expect(",")?;
            }
        }
        Ok(StructTag::new(address, module, name, type_params))
    }
}
