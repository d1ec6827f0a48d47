use std::collections::BTreeSet;

/// An ordered set of NUMA node (or device) indices, parsed from a list
/// string such as `"0,2,5"` or `"0-3"` or a mix of both.
///
/// Parsing is strict about syntax but not about range: whether an index
/// actually exists on the host is checked at allocation time, where unknown
/// nodes are skipped best-effort.
///
/// # Example
/// ```
/// use xferbench::NodeSet;
///
/// let nodes = NodeSet::parse("0,2-4").unwrap();
/// assert_eq!(nodes.iter().collect::<Vec<_>>(), [0, 2, 3, 4]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NodeSet(BTreeSet<u16>);

impl NodeSet {
    pub fn parse(list: &str) -> core::result::Result<Self, ParseError> {
        if list.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut nodes = BTreeSet::new();
        for token in list.split(',') {
            match token.split_once('-') {
                Some((lo, hi)) => {
                    let lo: u16 = lo.parse().map_err(|_| ParseError::InvalidToken)?;
                    let hi: u16 = hi.parse().map_err(|_| ParseError::InvalidToken)?;
                    if lo > hi {
                        return Err(ParseError::ReversedRange);
                    }
                    nodes.extend(lo..=hi);
                }
                None => {
                    nodes.insert(token.parse().map_err(|_| ParseError::InvalidToken)?);
                }
            }
        }
        Ok(NodeSet(nodes))
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, node: u16) -> bool {
        self.0.contains(&node)
    }

    pub fn max(&self) -> Option<u16> {
        self.0.last().copied()
    }

    /// The nodes present in both sets, used to drop requested nodes that are
    /// not online.
    pub fn intersection(&self, other: &NodeSet) -> NodeSet {
        NodeSet(self.0.intersection(&other.0).copied().collect())
    }
}

impl core::fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum ParseError {
    Empty,
    InvalidToken,
    ReversedRange,
}

impl ParseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseError::Empty => "node list is empty",
            ParseError::InvalidToken => "node list contains a non-numeric entry",
            ParseError::ReversedRange => "node range upper bound is below its lower bound",
        }
    }
}

impl core::fmt::Debug for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ParseError {}
