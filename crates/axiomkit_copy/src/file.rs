//! Byte-exact regular file copy.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::spec::{CopyError, EnumOperandKind};
use crate::util::is_same_operand;

/// Copy the content of `path_file_src` into `path_file_dst`.
///
/// The destination is created or truncated. Content is streamed in chunks of
/// `size_buffer` bytes; a zero-length read marks end of stream, so any byte
/// value is copied verbatim. Returns the number of bytes written.
///
/// A failure after the destination was opened leaves it truncated or partially
/// written.
pub fn copy_file(
    path_file_src: &Path,
    path_file_dst: &Path,
    size_buffer: usize,
) -> Result<u64, CopyError> {
    if is_same_operand(path_file_src, path_file_dst) {
        return Err(CopyError::IdenticalOperands {
            kind: EnumOperandKind::File,
            path_src: path_file_src.to_path_buf(),
            path_dst: path_file_dst.to_path_buf(),
        });
    }

    let mut file_src = File::open(path_file_src).map_err(|e| CopyError::SourceMissing {
        kind: EnumOperandKind::File,
        path: path_file_src.to_path_buf(),
        source: e,
    })?;
    let mut file_dst = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path_file_dst)
        .map_err(|e| CopyError::DestinationCreateFailed {
            kind: EnumOperandKind::File,
            path: path_file_dst.to_path_buf(),
            source: e,
        })?;

    let n_bytes = stream_bytes(
        &mut file_src,
        &mut file_dst,
        size_buffer,
        path_file_src,
        path_file_dst,
    )?;
    debug!(
        src = %path_file_src.display(),
        dst = %path_file_dst.display(),
        n_bytes,
        "copied file"
    );
    Ok(n_bytes)
}

fn stream_bytes<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    size_buffer: usize,
    path_src: &Path,
    path_dst: &Path,
) -> Result<u64, CopyError> {
    let mut buf = vec![0_u8; size_buffer.max(1)];
    let mut n_total: u64 = 0;
    loop {
        let n_read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CopyError::ReadFailure {
                    path: path_src.to_path_buf(),
                    source: e,
                });
            }
        };
        writer
            .write_all(&buf[..n_read])
            .map_err(|e| CopyError::WriteFailure {
                path: path_dst.to_path_buf(),
                source: e,
            })?;
        n_total += n_read as u64;
    }
    writer.flush().map_err(|e| CopyError::WriteFailure {
        path: path_dst.to_path_buf(),
        source: e,
    })?;
    Ok(n_total)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{self, Read, Write};
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{copy_file, stream_bytes};
    use crate::spec::{CopyError, EnumCopyOutcome};

    #[test]
    fn copy_file_hello() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("a.txt");
        let path_dst = tmp.path().join("b.txt");
        fs::write(&path_src, "hello").expect("write");

        let n_bytes = copy_file(&path_src, &path_dst, 4).expect("copy");
        assert_eq!(n_bytes, 5);
        assert_eq!(fs::read_to_string(&path_dst).expect("read"), "hello");
    }

    #[test]
    fn copy_file_truncates_longer_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("a.txt");
        let path_dst = tmp.path().join("b.txt");
        fs::write(&path_src, "short").expect("write");
        fs::write(&path_dst, "much longer content").expect("write");

        copy_file(&path_src, &path_dst, 1024).expect("copy");
        assert_eq!(fs::read_to_string(&path_dst).expect("read"), "short");
    }

    #[test]
    fn copy_file_keeps_sentinel_like_bytes() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("bin");
        let path_dst = tmp.path().join("bin.copy");
        let raw = vec![0xFF_u8, 0x00, 0xFF, 0x1A, 0x04, 0x00];
        fs::write(&path_src, &raw).expect("write");

        copy_file(&path_src, &path_dst, 0).expect("copy");
        assert_eq!(fs::read(&path_dst).expect("read"), raw);
    }

    #[test]
    fn copy_file_same_literal_path_is_refused() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("a.txt");
        fs::write(&path_src, "keep").expect("write");

        let err = copy_file(&path_src, &path_src, 16).expect_err("must fail");
        assert_eq!(err.outcome(), EnumCopyOutcome::IdenticalOperands);
        assert_eq!(fs::read_to_string(&path_src).expect("read"), "keep");
    }

    #[test]
    fn copy_file_missing_source_leaves_destination_alone() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dst = tmp.path().join("b.txt");

        let err = copy_file(&tmp.path().join("nope"), &path_dst, 16).expect_err("must fail");
        assert!(matches!(err, CopyError::SourceMissing { .. }));
        assert!(!path_dst.exists());
    }

    #[test]
    fn copy_file_unwritable_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("a.txt");
        fs::write(&path_src, "a").expect("write");

        let err = copy_file(&path_src, &tmp.path().join("no/such/dir/b.txt"), 16)
            .expect_err("must fail");
        assert_eq!(err.outcome(), EnumCopyOutcome::DestinationCreateFailed);
    }

    struct ReaderFlaky {
        n_calls: usize,
    }

    impl Read for ReaderFlaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.n_calls += 1;
            match self.n_calls {
                1 => Err(io::Error::from(io::ErrorKind::Interrupted)),
                2 => {
                    buf[0] = b'x';
                    Ok(1)
                }
                _ => Err(io::Error::other("disk gone")),
            }
        }
    }

    struct WriterFull;

    impl Write for WriterFull {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_retries_interrupted_then_reports_read_failure() {
        let mut sink = Vec::new();
        let err = stream_bytes(
            &mut ReaderFlaky { n_calls: 0 },
            &mut sink,
            8,
            Path::new("src"),
            Path::new("dst"),
        )
        .expect_err("must fail");
        assert_eq!(err.outcome(), EnumCopyOutcome::ReadFailure);
        assert_eq!(sink, b"x");
    }

    #[test]
    fn stream_reports_write_failure() {
        let mut source: &[u8] = b"payload";
        let err = stream_bytes(
            &mut source,
            &mut WriterFull,
            8,
            Path::new("src"),
            Path::new("dst"),
        )
        .expect_err("must fail");
        assert!(matches!(err, CopyError::WriteFailure { .. }));
        assert_eq!(err.to_string(), "failed to write 'dst'");
    }
}
