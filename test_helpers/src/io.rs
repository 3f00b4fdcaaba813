//! In-memory writers for capturing command output.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Cloneable writer whose clones share one buffer.
///
/// Hand one clone to the code under test and read the captured text through
/// another.
///
/// # Examples
/// ```
/// use std::io::Write;
/// use flagbind_test_helpers::io::Capture;
///
/// let capture = Capture::default();
/// let mut writer = capture.clone();
/// write!(writer, "hello").unwrap();
/// assert_eq!(capture.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    /// Captured bytes as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
