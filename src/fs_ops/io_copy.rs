//! Streaming copy with a caller-chosen buffer size.
//!
//! Features:
//! - Without `force`, the destination is created with O_EXCL semantics, so an
//!   existing file is never opened, let alone truncated.
//! - Data moves in chunks of exactly `buffer_size` bytes (the last chunk may be
//!   shorter); each fully written chunk is reported to the progress sink.
//! - A short write is fatal. EINTR is retried; every other I/O error is fatal.
//! - The destination is closed explicitly so a close-time error fails the copy.
//! - Optional full fsync for strong durability guarantees.
//!
//! Snapshot semantics: the source file is read once from start to EOF; if it grows
//! concurrently, the additional bytes are included up to the EOF we observe.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::config::Options;
use crate::errors::CopyError;
use crate::platform::{close_file, open_destination};
use crate::progress::ProgressSink;

/// Durability mode controlling what happens when a destination file is finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Close without syncing. A failure the kernel reports at close is still
    /// an error; one deferred past close goes unreported.
    #[default]
    Data,
    /// Force data and metadata to stable storage (`sync_all`) before closing,
    /// so deferred write errors surface as copy failures.
    Full,
}

/// Result of a streaming copy operation.
#[derive(Debug, Clone, Copy)]
pub struct CopyResult {
    /// Total bytes copied from source to destination.
    pub bytes: u64,
    /// Size of the buffer used for copying.
    pub buf_size: usize,
    /// Durability mode applied.
    pub mode: DurabilityMode,
}

/// Copy `src` -> `dst`, creating or (with `force`) truncating `dst`.
/// `mode` is the permission set given to a newly created destination.
pub(crate) fn copy_streaming(
    src: &Path,
    dst: &Path,
    mode: u32,
    options: &Options,
    sink: &dyn ProgressSink,
) -> Result<CopyResult, CopyError> {
    let mut src_f = File::open(src).map_err(|e| CopyError::io("open source file", src, e))?;

    let mut dst_f = match open_destination(dst, options.force, mode) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && !options.force => {
            return Err(CopyError::DestinationExists(dst.to_path_buf()));
        }
        Err(e) => return Err(CopyError::io("open destination file", dst, e)),
    };

    let bytes = pump(&mut src_f, &mut dst_f, options.buffer_size, src, dst, sink)?;

    if options.durability == DurabilityMode::Full {
        dst_f
            .sync_all()
            .map_err(|e| CopyError::io("sync destination file", dst, e))?;
    }
    close_file(dst_f).map_err(|e| CopyError::io("close destination file", dst, e))?;

    Ok(CopyResult {
        bytes,
        buf_size: options.buffer_size,
        mode: options.durability,
    })
}

/// Move bytes from `reader` to `writer` one `buf_size` chunk at a time.
/// Uses a single `write` per chunk so short writes are observable.
fn pump<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buf_size: usize,
    src: &Path,
    dst: &Path,
    sink: &dyn ProgressSink,
) -> Result<u64, CopyError> {
    let mut buf = vec![0u8; buf_size];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::io("read source file", src, e)),
        };

        let written = loop {
            match writer.write(&buf[..n]) {
                Ok(w) => break w,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CopyError::io("write destination file", dst, e)),
            }
        };
        if written != n {
            return Err(CopyError::ShortWrite {
                path: dst.to_path_buf(),
                written,
                expected: n,
            });
        }

        total += written as u64;
        sink.add(written as u64);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::tempdir;

    #[derive(Default)]
    struct CountingSink {
        bytes: AtomicU64,
        calls: AtomicU64,
    }

    impl ProgressSink for CountingSink {
        fn add(&self, n: u64) {
            self.bytes.fetch_add(n, Ordering::Relaxed);
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn opts(buffer_size: usize) -> Options {
        Options {
            buffer_size,
            ..Default::default()
        }
    }

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.txt");
        let dst_path = dir.path().join("dst.txt");
        let data = b"hello world";
        fs::write(&src_path, data).unwrap();

        let sink = CountingSink::default();
        let res = copy_streaming(&src_path, &dst_path, 0o644, &opts(4), &sink).unwrap();
        assert_eq!(res.bytes, data.len() as u64);
        assert_eq!(res.buf_size, 4);
        assert_eq!(fs::read(&dst_path).unwrap(), data);
        // 4 + 4 + 3
        assert_eq!(sink.calls.load(Ordering::Relaxed), 3);
        assert_eq!(sink.bytes.load(Ordering::Relaxed), data.len() as u64);
    }

    #[test]
    fn copy_zero_length_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("empty");
        let dst_path = dir.path().join("out");
        File::create(&src_path).unwrap();

        let sink = CountingSink::default();
        let res = copy_streaming(&src_path, &dst_path, 0o644, &opts(8), &sink).unwrap();
        assert_eq!(res.bytes, 0);
        assert_eq!(fs::metadata(&dst_path).unwrap().len(), 0);
        assert_eq!(sink.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn fails_if_dest_exists_and_leaves_it_intact() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        fs::write(&src_path, b"data").unwrap();
        fs::write(&dst_path, b"precious").unwrap();

        let err = copy_streaming(&src_path, &dst_path, 0o644, &opts(2), &CountingSink::default())
            .unwrap_err();
        assert!(matches!(err, CopyError::DestinationExists(ref p) if p == &dst_path));
        assert!(err.to_string().contains("destination file exists"));
        assert_eq!(fs::read(&dst_path).unwrap(), b"precious");
    }

    #[test]
    fn force_replaces_longer_destination() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        fs::write(&src_path, b"new").unwrap();
        fs::write(&dst_path, b"much longer old content").unwrap();

        let options = Options {
            force: true,
            ..opts(2)
        };
        copy_streaming(&src_path, &dst_path, 0o644, &options, &CountingSink::default()).unwrap();
        assert_eq!(fs::read(&dst_path).unwrap(), b"new");
    }

    #[test]
    fn copy_is_buffer_size_invariant() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let mut data = vec![0u8; 64 * 1024 + 123];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 251) as u8; // pseudo pattern
        }
        fs::write(&src, &data).unwrap();

        for (i, buf) in [1usize, 17, 4096, 1024 * 1024].into_iter().enumerate() {
            let dst = dir.path().join(format!("out{i}.bin"));
            let res = copy_streaming(&src, &dst, 0o644, &opts(buf), &CountingSink::default()).unwrap();
            assert_eq!(res.bytes as usize, data.len());
            assert_eq!(fs::read(&dst).unwrap(), data, "buffer size {buf}");
        }
    }

    #[test]
    fn full_durability_syncs() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("d.txt");
        let dst = dir.path().join("d.out");
        fs::write(&src, b"abcdef").unwrap();
        let options = Options {
            durability: DurabilityMode::Full,
            ..opts(3)
        };
        let res = copy_streaming(&src, &dst, 0o644, &options, &CountingSink::default()).unwrap();
        assert_eq!(res.bytes, 6);
        assert_eq!(res.mode, DurabilityMode::Full);
        assert_eq!(fs::read(&dst).unwrap(), b"abcdef");
    }

    struct HalfWriter;

    impl Write for HalfWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len() / 2)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_write_is_fatal() {
        let mut reader: &[u8] = b"0123456789";
        let sink = CountingSink::default();
        let err = pump(
            &mut reader,
            &mut HalfWriter,
            4,
            Path::new("src"),
            Path::new("dst"),
            &sink,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CopyError::ShortWrite {
                written: 2,
                expected: 4,
                ..
            }
        ));
        assert_eq!(sink.bytes.load(Ordering::Relaxed), 0);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_error_names_source() {
        let err = pump(
            &mut FailingReader,
            &mut Vec::new(),
            4,
            Path::new("/src/file"),
            Path::new("/dst/file"),
            &CountingSink::default(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("read source file '/src/file'"), "got: {msg}");
        assert!(msg.contains("disk on fire"));
    }
}
