//! Object identifiers in dotted-decimal form.

use std::fmt;
use std::str::FromStr;

/// Why a dotted-decimal OID string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty OID")]
    Empty,
    #[error("invalid OID '{input}': empty component at position {position}")]
    EmptyComponent { input: String, position: usize },
    #[error("invalid OID '{input}': '{component}' is not a decimal number")]
    InvalidComponent { input: String, component: String },
    #[error("invalid OID '{input}': '{component}' does not fit in 32 bits")]
    Overflow { input: String, component: String },
}

/// An SNMP object identifier: at least one arc, each a `u32`.
///
/// ```
/// use snmp_query::ObjectIdentifier;
///
/// let sys_name: ObjectIdentifier = "1.3.6.1.2.1.1.5.0".parse().unwrap();
/// assert_eq!(sys_name.arcs(), &[1, 3, 6, 1, 2, 1, 1, 5, 0]);
/// assert_eq!(sys_name.to_string(), "1.3.6.1.2.1.1.5.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    arcs: Vec<u32>,
}

impl ObjectIdentifier {
    /// Builds an OID from arcs. Returns `None` for an empty slice.
    pub fn from_arcs(arcs: &[u32]) -> Option<Self> {
        if arcs.is_empty() {
            return None;
        }
        Some(Self {
            arcs: arcs.to_vec(),
        })
    }

    /// Parses dotted-decimal notation. A single leading dot is accepted, the
    /// way net-snmp prints fully qualified numeric OIDs.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Err(ParseError::Empty);
        }

        let arcs = body
            .split('.')
            .enumerate()
            .map(|(position, component)| parse_arc(s, position, component))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { arcs })
    }

    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Never true for a parsed or constructed OID.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

fn parse_arc(input: &str, position: usize, component: &str) -> Result<u32, ParseError> {
    if component.is_empty() {
        return Err(ParseError::EmptyComponent {
            input: input.to_string(),
            position,
        });
    }
    // u32::from_str accepts a leading '+', dotted-decimal does not.
    if !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidComponent {
            input: input.to_string(),
            component: component.to_string(),
        });
    }
    component.parse().map_err(|_| ParseError::Overflow {
        input: input.to_string(),
        component: component.to_string(),
    })
}

impl FromStr for ObjectIdentifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ObjectIdentifier {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectIdentifier {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// Anything a GET request accepts as an OID: parsed identifiers or
/// dotted-decimal strings that are parsed on the way in.
pub trait IntoOid {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError>;
}

impl IntoOid for ObjectIdentifier {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError> {
        Ok(self)
    }
}

impl IntoOid for &ObjectIdentifier {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError> {
        Ok(self.clone())
    }
}

impl IntoOid for &str {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError> {
        ObjectIdentifier::parse(self)
    }
}

impl IntoOid for String {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError> {
        ObjectIdentifier::parse(&self)
    }
}

impl IntoOid for &String {
    fn into_oid(self) -> Result<ObjectIdentifier, ParseError> {
        ObjectIdentifier::parse(self)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}
