// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Support for in-firmware debugging.
//!
//! Two macros are provided:
//!
//! - `debug!` formats its arguments and sends them, followed by a newline, to
//!   the registered debug writer.
//! - `debug_verbose!` does the same but prefixes the message with the source
//!   file and line of the call site.
//!
//! The platform installs a writer once with [`set_debug_writer`], typically a
//! UART or a shared-memory log buffer. Until a writer is installed, messages
//! are discarded.
//!
//! ```ignore
//! debug!("Yes the code gets here with value {}", i);
//! debug_verbose!("got here"); // includes message count, file, and line
//! ```

use core::cell::Cell;
use core::fmt::{write, Arguments, Result, Write};
use core::ptr::addr_of;

/// A sink for debug output.
pub trait IoWrite {
    /// Write `buf` to the output, returning the number of bytes consumed.
    fn write(&self, buf: &[u8]) -> usize;
}

struct DebugWriter {
    writer: Option<&'static dyn IoWrite>,
    count: Cell<usize>,
}

// Firmware runs single-threaded; the writer is installed before interrupts
// are enabled and never replaced.
static mut DEBUG_WRITER: DebugWriter = DebugWriter {
    writer: None,
    count: Cell::new(0),
};

/// Install the writer used by `debug!`.
///
/// # Safety
///
/// Must be called once, before any interrupt that may log is enabled.
pub unsafe fn set_debug_writer(writer: &'static dyn IoWrite) {
    let dw = &mut *core::ptr::addr_of_mut!(DEBUG_WRITER);
    dw.writer = Some(writer);
}

fn debug_writer() -> &'static DebugWriter {
    // SAFETY: only read after installation, no concurrent writers.
    unsafe { &*addr_of!(DEBUG_WRITER) }
}

struct Forward(&'static dyn IoWrite);

impl Write for Forward {
    fn write_str(&mut self, s: &str) -> Result {
        self.0.write(s.as_bytes());
        Ok(())
    }
}

pub fn debug_println(args: Arguments) {
    let dw = debug_writer();
    if let Some(w) = dw.writer {
        let mut out = Forward(w);
        let _ = write(&mut out, args);
        let _ = out.write_str("\r\n");
    }
}

pub fn debug_verbose_println(args: Arguments, file_line: &(&'static str, u32)) {
    let dw = debug_writer();
    let count = dw.count.get();
    dw.count.set(count + 1);

    if let Some(w) = dw.writer {
        let (file, line) = *file_line;
        let mut out = Forward(w);
        let _ = out.write_fmt(format_args!("TOCK_DEBUG({}): {}:{}: ", count, file, line));
        let _ = write(&mut out, args);
        let _ = out.write_str("\r\n");
    }
}

/// In-firmware `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg));
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+));
    });
}

/// In-firmware `println()` debugging with file and line numbers.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        // Allow an empty debug_verbose!() to print the location when hit
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_verbose_println(format_args!($msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_verbose_println(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;
    use std::sync::Mutex;
    use std::vec::Vec;

    struct Sink(Mutex<Vec<u8>>);

    impl IoWrite for Sink {
        fn write(&self, buf: &[u8]) -> usize {
            if let Ok(mut out) = self.0.lock() {
                out.extend_from_slice(buf);
            }
            buf.len()
        }
    }

    static SINK: Sink = Sink(Mutex::new(Vec::new()));

    #[test]
    fn messages_reach_installed_writer() {
        unsafe { set_debug_writer(&SINK) };
        debug!("ack timeout after {} us", 10);
        debug_verbose!("retry");

        let out = SINK.0.lock().map(|b| String::from_utf8_lossy(&b).into_owned());
        let out = out.unwrap_or_default();
        assert!(out.contains("ack timeout after 10 us\r\n"));
        assert!(out.contains("TOCK_DEBUG("));
        assert!(out.contains("debug.rs:"));
        assert!(out.ends_with("retry\r\n"));
    }
}
