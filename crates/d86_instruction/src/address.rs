/// Represents a location in a segmented memory model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
    pub segment: u16,
    pub offset: u16,
}

impl Address {
    /// Create a new segment/offset pair.
    pub fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}:{:#x}", self.segment, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Address::new(0xF000, 0xFFF0).to_string(), "0xf000:0xfff0");
    }
}
