//! A pooled, cheap-to-compare string type for atom and identifier names.

use std::fmt::{Debug, Display};
use std::ops::{Add, Deref};

use interner::global::{GlobalString, StaticPooledString, StringPool};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

static SYMBOLS: StringPool = StringPool::new();

/// An interned string. All instances of the same underlying string share one
/// pooled copy, so comparison and hashing never inspect the contents.
#[derive(Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Symbol(GlobalString);

static EMPTY: StaticPooledString = SYMBOLS.get_static("");

impl Symbol {
    /// Returns the empty symbol.
    #[must_use]
    pub fn empty() -> Self {
        Self(EMPTY.clone())
    }
}

macro_rules! static_symbols {
    ($($name:ident => $string:literal),+ $(,)?) => {
        impl Symbol {
            $(
                #[doc = concat!("Returns the symbol for \"", $string, "\".")]
                #[must_use]
                pub fn $name() -> Self {
                    static S: StaticPooledString = SYMBOLS.get_static($string);
                    Self(S.clone())
                }
            )+
        }
    };
}

static_symbols!(
    bit_string_symbol => "BitString",
    bitstring_comprehension_symbol => "bitstring_comprehension",
    bitstring_generator_symbol => "bitstring_generator",
    capture_symbol => "capture",
    clause_symbol => "clause",
    concat_symbol => "concat",
    defmatch_symbol => "defmatch",
    defmatchgen_symbol => "defmatchgen",
    false_symbol => "false",
    for_symbol => "for",
    head_tail_symbol => "headTail",
    list_comprehension_symbol => "list_comprehension",
    list_generator_symbol => "list_generator",
    match_symbol => "match",
    module_symbol => "module",
    nil_symbol => "nil",
    null_symbol => "null",
    patterns_symbol => "Patterns",
    size_symbol => "size",
    symbol_symbol => "Symbol",
    true_symbol => "true",
    tuple_symbol => "Tuple",
    underscore_symbol => "_",
    unit_symbol => "unit",
    variable_symbol => "variable",
    wildcard_symbol => "wildcard",
);

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(SYMBOLS.get(value))
    }
}

impl From<&'_ String> for Symbol {
    fn from(value: &'_ String) -> Self {
        Symbol(SYMBOLS.get(value))
    }
}

impl From<&'_ str> for Symbol {
    fn from(value: &'_ str) -> Self {
        Symbol(SYMBOLS.get(value))
    }
}

impl From<&'_ Symbol> for Symbol {
    fn from(value: &'_ Symbol) -> Self {
        value.clone()
    }
}

impl PartialEq<&'_ str> for Symbol {
    fn eq(&self, other: &&'_ str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'a, 'b> Add<&'a Symbol> for &'b Symbol {
    type Output = Symbol;

    fn add(self, rhs: &'a Symbol) -> Self::Output {
        let mut out = String::with_capacity(self.len() + rhs.len());
        out.push_str(self);
        out.push_str(rhs);
        Symbol::from(out)
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(SymbolVisitor)
    }
}

struct SymbolVisitor;

impl Visitor<'_> for SymbolVisitor {
    type Value = Symbol;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "a Symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Symbol::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Symbol::from(v))
    }
}
