//! Bounded views over a parent stream

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::OutOfBounds;

/// A read/write/seek window over `[start, start + len)` of a parent stream.
///
/// The view holds the parent mutably for its whole lifetime, so a parent cannot be used
/// while one of its windows is alive. When the view is dropped the parent cursor is moved
/// to the end of the window, so the parent resumes right after the embedded data no matter
/// how the inner parser finished.
///
/// ```
/// use std::io::{Cursor, Read};
/// use rdx_io::SubStream;
///
/// let mut parent = Cursor::new(b"headerPAYLOADtrailer".to_vec());
/// let mut payload = Vec::new();
/// {
///     let mut window = SubStream::new(&mut parent, 6, 7)?;
///     window.read_to_end(&mut payload)?;
/// }
/// assert_eq!(payload, b"PAYLOAD");
/// assert_eq!(parent.position(), 13);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct SubStream<'a, S: Seek> {
    inner: &'a mut S,
    start: u64,
    len: u64,
    position: u64,
}

impl<'a, S: Seek> SubStream<'a, S> {
    /// Open a window of `len` bytes at absolute offset `start` of the parent.
    pub fn new(inner: &'a mut S, start: u64, len: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(start))?;
        Ok(SubStream {
            inner,
            start,
            len,
            position: 0,
        })
    }

    /// Open a window of `len` bytes at the parent's current position.
    pub fn here(inner: &'a mut S, len: u64) -> io::Result<Self> {
        let start = inner.stream_position()?;
        Self::new(inner, start, len)
    }

    /// Absolute offset of the window in the parent
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Size of the window
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the window is zero bytes long
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor position relative to the window start
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left between the cursor and the end of the window
    pub fn remaining(&self) -> u64 {
        self.len - self.position
    }

    /// Whether the cursor sits on the end of the window
    pub fn is_at_end(&self) -> bool {
        self.position >= self.len
    }

    fn out_of_bounds(&self, offset: u64) -> io::Error {
        OutOfBounds {
            start: self.start,
            len: self.len,
            offset,
        }
        .into()
    }
}

impl<S: Read + Seek> Read for SubStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let max = buf.len().min(self.remaining().try_into().unwrap_or(usize::MAX));
        if max == 0 {
            return Ok(0);
        }

        let read = self.inner.read(&mut buf[..max])?;
        self.position += read as u64;
        Ok(read)
    }

    /// Fixed-size reads past the end of the window fail with [`OutOfBounds`].
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() as u64 > self.remaining() {
            return Err(self.out_of_bounds(self.position + buf.len() as u64));
        }

        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }
}

impl<S: Write + Seek> Write for SubStream<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() as u64 > self.remaining() {
            return Err(self.out_of_bounds(self.position + buf.len() as u64));
        }

        let written = self.inner.write(buf)?;
        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S: Seek> Seek for SubStream<'_, S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(delta) => i128::from(self.position) + i128::from(delta),
            SeekFrom::End(delta) => i128::from(self.len) + i128::from(delta),
        };

        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative position",
            ));
        }
        if target > i128::from(self.len) {
            return Err(self.out_of_bounds(u64::try_from(target).unwrap_or(u64::MAX)));
        }

        let target = target as u64;
        self.inner.seek(SeekFrom::Start(self.start + target))?;
        self.position = target;
        Ok(target)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

impl<S: Seek> Drop for SubStream<'_, S> {
    fn drop(&mut self) {
        let _ = self.inner.seek(SeekFrom::Start(self.start + self.len));
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, Read, Seek, SeekFrom, Write};

    use pretty_assertions::assert_eq;

    use crate::{error::OutOfBounds, SubStream};

    #[test]
    fn reads_are_clipped_to_the_window() -> std::io::Result<()> {
        let mut parent = Cursor::new((0u8..16).collect::<Vec<_>>());
        let mut window = SubStream::new(&mut parent, 4, 4)?;

        let mut buffer = [0u8; 8];
        assert_eq!(window.read(&mut buffer)?, 4);
        assert_eq!(&buffer[..4], &[4, 5, 6, 7]);
        assert_eq!(window.read(&mut buffer)?, 0);
        assert!(window.is_at_end());

        Ok(())
    }

    #[test]
    fn read_exact_past_the_end_is_out_of_bounds() -> std::io::Result<()> {
        let mut parent = Cursor::new(vec![0u8; 16]);
        let mut window = SubStream::new(&mut parent, 10, 2)?;

        let mut buffer = [0u8; 4];
        let error = window.read_exact(&mut buffer).unwrap_err();
        assert_eq!(
            OutOfBounds::from_io(&error),
            Some(OutOfBounds {
                start: 10,
                len: 2,
                offset: 4
            })
        );
        assert_eq!(window.position(), 0);

        window.read_exact(&mut buffer[..2])?;
        assert!(window.is_at_end());
        let error = window.read_exact(&mut buffer[..1]).unwrap_err();
        assert!(OutOfBounds::from_io(&error).is_some());

        Ok(())
    }

    #[test]
    fn seek_past_the_end_is_out_of_bounds() -> std::io::Result<()> {
        let mut parent = Cursor::new(vec![0u8; 16]);
        let mut window = SubStream::new(&mut parent, 2, 8)?;

        assert_eq!(window.seek(SeekFrom::End(0))?, 8);
        let error = window.seek(SeekFrom::Start(9)).unwrap_err();
        assert_eq!(
            OutOfBounds::from_io(&error),
            Some(OutOfBounds {
                start: 2,
                len: 8,
                offset: 9
            })
        );

        Ok(())
    }

    #[test]
    fn write_past_the_end_is_out_of_bounds() -> std::io::Result<()> {
        let mut parent = Cursor::new(vec![0u8; 8]);
        {
            let mut window = SubStream::new(&mut parent, 2, 3)?;
            window.write_all(&[0xAA, 0xBB])?;

            let error = window.write_all(&[0xCC, 0xDD]).unwrap_err();
            assert!(OutOfBounds::from_io(&error).is_some());
        }

        assert_eq!(parent.get_ref(), &vec![0, 0, 0xAA, 0xBB, 0, 0, 0, 0]);

        Ok(())
    }

    #[test]
    fn dropping_advances_the_parent() -> std::io::Result<()> {
        let mut parent = Cursor::new(vec![0u8; 32]);
        {
            let mut window = SubStream::new(&mut parent, 8, 16)?;
            window.seek(SeekFrom::Start(1))?;
        }
        assert_eq!(parent.position(), 24);

        Ok(())
    }

    #[test]
    fn windows_nest() -> std::io::Result<()> {
        let mut parent = Cursor::new((0u8..32).collect::<Vec<_>>());
        let mut outer = SubStream::new(&mut parent, 8, 16)?;
        outer.seek(SeekFrom::Start(2))?;

        let mut bytes = Vec::new();
        {
            let mut inner = SubStream::here(&mut outer, 3)?;
            assert_eq!(inner.start(), 2);
            inner.read_to_end(&mut bytes)?;
        }

        assert_eq!(bytes, vec![10, 11, 12]);
        assert_eq!(outer.position(), 5);

        Ok(())
    }
}
