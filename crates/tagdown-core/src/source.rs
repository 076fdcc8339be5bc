use crate::diagnostic::SourceError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Limits applied when pulling a document into memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadOptions {
    /// Hard ceiling on bytes consumed by one read; the rest is ignored.
    pub max_bytes: usize,
    pub chunk_size: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            chunk_size: 512,
        }
    }
}

pub fn read_source(path: &Path, options: &ReadOptions) -> Result<String, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "reading document");
    read_source_from(file, options).map_err(|err| match err {
        SourceError::Read(source) => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Reads chunk by chunk until end of input or the byte ceiling.
///
/// Nothing past the ceiling is consumed from `reader`, so input of exactly
/// `max_bytes` bytes is also reported as possibly truncated.
pub fn read_source_from(mut reader: impl Read, options: &ReadOptions) -> Result<String, SourceError> {
    let chunk_size = options.chunk_size.max(1);
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; chunk_size];

    while buf.len() < options.max_bytes {
        let want = chunk_size.min(options.max_bytes - buf.len());
        let read = match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(SourceError::Read(err)),
        };
        buf.extend_from_slice(&chunk[..read]);
    }

    let at_ceiling = buf.len() >= options.max_bytes;
    if at_ceiling {
        warn!(
            max_bytes = options.max_bytes,
            "input reached the size ceiling and may be truncated"
        );
    }

    match String::from_utf8(buf) {
        Ok(text) => Ok(text),
        // The ceiling split a multi-byte character; keep the complete prefix.
        Err(err) if at_ceiling && err.utf8_error().error_len().is_none() => {
            let valid_up_to = err.utf8_error().valid_up_to();
            let mut bytes = err.into_bytes();
            bytes.truncate(valid_up_to);
            String::from_utf8(bytes).map_err(|err| SourceError::InvalidUtf8 {
                valid_up_to: err.utf8_error().valid_up_to(),
            })
        }
        Err(err) => Err(SourceError::InvalidUtf8 {
            valid_up_to: err.utf8_error().valid_up_to(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadOptions, read_source, read_source_from};
    use crate::diagnostic::SourceError;
    use std::path::Path;

    #[test]
    fn reads_everything_under_the_ceiling() {
        let options = ReadOptions {
            max_bytes: 64,
            chunk_size: 3,
        };
        let text = read_source_from("@main{hello}".as_bytes(), &options).expect("read");
        assert_eq!(text, "@main{hello}");
    }

    #[test]
    fn stops_at_the_ceiling() {
        let options = ReadOptions {
            max_bytes: 5,
            chunk_size: 2,
        };
        let text = read_source_from("@main{hello}".as_bytes(), &options).expect("read");
        assert_eq!(text, "@main");
    }

    #[test]
    fn ceiling_inside_a_character_keeps_the_complete_prefix() {
        let options = ReadOptions {
            max_bytes: 7,
            chunk_size: 512,
        };
        let text = read_source_from("@main{é}".as_bytes(), &options).expect("read");
        assert_eq!(text, "@main{");
    }

    #[test]
    fn ceiling_does_not_consume_excess_input() {
        let options = ReadOptions {
            max_bytes: 5,
            chunk_size: 512,
        };
        let mut reader = "@main{hello}".as_bytes();
        let text = read_source_from(&mut reader, &options).expect("read");
        assert_eq!(text, "@main");
        assert_eq!(reader, b"{hello}");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'a', 0xff, b'b'];
        match read_source_from(bytes, &ReadOptions::default()) {
            Err(SourceError::InvalidUtf8 { valid_up_to }) => assert_eq!(valid_up_to, 1),
            other => panic!("expected utf-8 error, got {:?}", other),
        }
    }

    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("pipe closed"))
        }
    }

    #[test]
    fn reader_failure_is_a_read_error() {
        let err = read_source_from(Broken, &ReadOptions::default()).expect_err("broken reader");
        assert!(matches!(err, SourceError::Read(_)));
        assert_eq!(err.to_string(), "failed to read input: pipe closed");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_source(Path::new("/nonexistent/doc.tgd"), &ReadOptions::default())
            .expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/doc.tgd"));
    }
}
