/// A forward-only source of instruction bytes.
pub trait ByteSource {
    /// Position of the next byte, counted from the start of the stream.
    fn position(&self) -> usize;

    /// Returns the next byte, or `None` when the source is exhausted.
    fn read_byte(&mut self) -> Option<u8>;

    /// Returns the next `count` bytes, or `None` (consuming nothing) if fewer remain.
    fn read_exact(&mut self, count: usize) -> Option<&[u8]>;
}

/// A [ByteSource] over an in-memory buffer. Copying a cursor is cheap, and several cursors can
/// walk disjoint parts of the same buffer independently.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// A cursor that starts at `position` of `data`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }
}

impl ByteSource for ByteCursor<'_> {
    fn position(&self) -> usize {
        self.position
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    fn read_exact(&mut self, count: usize) -> Option<&[u8]> {
        let bytes = self.data.get(self.position..self.position.checked_add(count)?)?;
        self.position += count;
        Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bytes_in_order() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_byte(), Some(0x01));
        assert_eq!(cursor.read_exact(2), Some(&data[1..]));
        assert_eq!(cursor.position(), 3);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.read_byte(), None);
    }

    #[test]
    fn short_read_consumes_nothing() {
        let data = [0x01, 0x02];
        let mut cursor = ByteCursor::at(&data, 1);

        assert_eq!(cursor.read_exact(2), None);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_exact(0), Some(&[][..]));
        assert_eq!(cursor.read_byte(), Some(0x02));
    }

    #[test]
    fn start_past_the_end_is_clamped() {
        let data = [0x90];
        let cursor = ByteCursor::at(&data, 5);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.remaining(), 0);
    }
}
