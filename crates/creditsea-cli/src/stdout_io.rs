use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), &[text.as_bytes()])
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), &[text.as_bytes(), b"\n"])
}

/// A reader that hangs up early (`creditsea report list | head -1`) is not an
/// error; anything else is.
fn write_tolerating_closed_pipe(writer: &mut dyn Write, chunks: &[&[u8]]) -> io::Result<()> {
    let result = chunks
        .iter()
        .try_for_each(|chunk| writer.write_all(chunk))
        .and_then(|()| writer.flush());
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::write_tolerating_closed_pipe;

    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_is_swallowed() {
        let mut writer = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(write_tolerating_closed_pipe(&mut writer, &[b"report"]).is_ok());
    }

    #[test]
    fn other_errors_propagate() {
        let mut writer = FailingWriter(io::ErrorKind::PermissionDenied);
        assert!(write_tolerating_closed_pipe(&mut writer, &[b"report"]).is_err());
    }

    #[test]
    fn chunks_are_written_in_order() {
        let mut buffer: Vec<u8> = Vec::new();
        assert!(write_tolerating_closed_pipe(&mut buffer, &[b"a", b"\n"]).is_ok());
        assert_eq!(buffer, b"a\n".to_vec());
    }
}
