use crate::error::{CharStringError, CharStringResult};

/// Generic trait for reading big-endian binary formats from a byte slice.
pub(crate) trait BinaryParser {
    fn buffer(&self) -> &[u8];
    fn cursor(&self) -> usize;
    fn cursor_mut(&mut self) -> &mut usize;

    fn next(&mut self) -> CharStringResult<u8> {
        let b = self.buffer().get(self.cursor()).copied();
        if b.is_some() {
            *self.cursor_mut() += 1;
        }
        b.ok_or_else(|| anyhow::anyhow!(CharStringError::MalformedProgram))
    }

    fn peek(&self) -> Option<u8> {
        self.buffer().get(self.cursor()).copied()
    }

    fn parse_i16(&mut self) -> CharStringResult<i16> {
        let b1 = self.next()?;
        let b2 = self.next()?;

        Ok(i16::from_be_bytes([b1, b2]))
    }

    fn parse_i32(&mut self) -> CharStringResult<i32> {
        let b1 = self.next()?;
        let b2 = self.next()?;
        let b3 = self.next()?;
        let b4 = self.next()?;

        Ok(i32::from_be_bytes([b1, b2, b3, b4]))
    }
}

#[cfg(test)]
mod test {
    use super::BinaryParser;
    use crate::error::CharStringError;

    struct TestParser<'a> {
        buffer: &'a [u8],
        cursor: usize,
    }

    impl BinaryParser for TestParser<'_> {
        fn buffer(&self) -> &[u8] {
            self.buffer
        }
        fn cursor(&self) -> usize {
            self.cursor
        }
        fn cursor_mut(&mut self) -> &mut usize {
            &mut self.cursor
        }
    }

    #[test]
    fn reads_big_endian_integers() {
        let mut parser = TestParser {
            buffer: &[0x12, 0x34, 0xff, 0xff, 0xff, 0xfe],
            cursor: 0,
        };

        assert_eq!(parser.parse_i16().unwrap(), 0x1234);
        assert_eq!(parser.parse_i32().unwrap(), -2);
        assert!(parser.peek().is_none());
    }

    #[test]
    fn eof_is_malformed_program() {
        let mut parser = TestParser {
            buffer: &[0x01],
            cursor: 0,
        };

        let err = parser.parse_i16().unwrap_err();

        assert_eq!(
            err.downcast_ref::<CharStringError>(),
            Some(&CharStringError::MalformedProgram)
        );
    }
}
