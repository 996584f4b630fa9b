use std::fmt;

use halt_proto::PredicateKind;

/// Indentation added per nesting level by [`Predicate::display`].
const INDENT: &str = "  ";

/// A committed predicate tree.
///
/// `Flat` leaves carry an opaque literal that only the engine interprets;
/// `Compound` nodes combine their children, whose order is significant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    Flat { name: String, content: String },
    Compound { name: String, children: Vec<Predicate> },
}

impl Predicate {
    pub fn flat(name: impl Into<String>, content: impl Into<String>) -> Self {
        Predicate::Flat {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn compound(name: impl Into<String>, children: Vec<Predicate>) -> Self {
        Predicate::Compound {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Predicate::Flat { name, .. } | Predicate::Compound { name, .. } => name,
        }
    }

    pub fn kind(&self) -> PredicateKind {
        match self {
            Predicate::Flat { .. } => PredicateKind::Flat,
            Predicate::Compound { .. } => PredicateKind::Compound,
        }
    }

    /// The literal of a flat predicate.
    pub fn content(&self) -> Option<&str> {
        match self {
            Predicate::Flat { content, .. } => Some(content),
            Predicate::Compound { .. } => None,
        }
    }

    /// Children of a compound predicate; always empty for a flat one.
    pub fn children(&self) -> &[Predicate] {
        match self {
            Predicate::Flat { .. } => &[],
            Predicate::Compound { children, .. } => children,
        }
    }

    /// Human readable rendering, one node per line, children indented by two
    /// spaces relative to their parent.
    ///
    /// ```text
    /// AND(
    ///   GT(x, 5)
    ///   LT(y, 10)
    /// )
    /// ```
    pub fn display(&self) -> String {
        self.to_string()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str(INDENT)?;
        }
        match self {
            Predicate::Flat { name, content } => write!(f, "{name}({content})"),
            Predicate::Compound { name, children } => {
                writeln!(f, "{name}(")?;
                for child in children {
                    child.render(f, depth + 1)?;
                    f.write_str("\n")?;
                }
                for _ in 0..depth {
                    f.write_str(INDENT)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
