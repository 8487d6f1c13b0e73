use std::io::{self, ErrorKind, Read};

/// Reads fixed length chunks from a reader.
///
/// A chunk that cannot be completely filled marks the end of the data; any partial
/// trailing bytes are discarded and not reported as an error.
pub struct Chunks<R>
where
    R: io::Read,
{
    reader: R,
    num_read: usize,
    buf: Vec<u8>,
}

impl<R> Chunks<R>
where
    R: io::Read,
{
    pub fn new(reader: R, chunk_len: usize) -> Self {
        Chunks {
            reader,
            num_read: 0,
            buf: vec![0u8; chunk_len],
        }
    }

    /// Read the next chunk. Returns `Ok(None)` when there is not a full chunk left.
    pub fn next_chunk(&mut self) -> Result<Option<&[u8]>, io::Error> {
        if let Err(err) = self.reader.read_exact(&mut self.buf) {
            if err.kind() == ErrorKind::UnexpectedEof {
                return Ok(None);
            }
            return Err(err);
        }
        self.num_read += self.buf.len();
        Ok(Some(&self.buf))
    }

    /// Number of bytes consumed by complete chunks so far.
    pub fn offset(&self) -> usize {
        self.num_read
    }
}

/// Read exactly `len` bytes if available, otherwise as many as there are.
pub(crate) fn read_up_to<R: io::Read>(reader: R, len: usize) -> Result<Vec<u8>, io::Error> {
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
