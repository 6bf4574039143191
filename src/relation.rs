use serde::{Serialize, Serializer};
use std::fmt;

/// One cell of a relation matrix: how the row entity compares to the column entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Equal,
    Greater,
    Less,
    Unknown,
}

impl Relation {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Relation::Equal),
            '>' => Some(Relation::Greater),
            '<' => Some(Relation::Less),
            '-' => Some(Relation::Unknown),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Relation::Equal => '=',
            Relation::Greater => '>',
            Relation::Less => '<',
            Relation::Unknown => '-',
        }
    }

    /// The same relation seen from the column entity's side.
    pub fn mirrored(self) -> Self {
        match self {
            Relation::Greater => Relation::Less,
            Relation::Less => Relation::Greater,
            other => other,
        }
    }

    pub fn is_inequality(self) -> bool {
        matches!(self, Relation::Greater | Relation::Less)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}
