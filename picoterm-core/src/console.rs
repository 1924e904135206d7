//! Text output to the display
//!
//! Pairs a [`DisplaySink`] with the callbacks it may need while rendering,
//! and adds formatted printing for menus and status lines.

use core::fmt::{self, Write};

use heapless::String;
use picoterm_hal::{DisplaySink, TerminalCallbacks};

/// Longest formatted line the console will print in one call
pub const PRINT_BUFFER_LEN: usize = 128;

/// Display handle used for everything the terminal itself draws
pub struct Console<'a, D: DisplaySink> {
    display: &'a mut D,
    callbacks: &'a mut dyn TerminalCallbacks,
}

impl<'a, D: DisplaySink> Console<'a, D> {
    pub fn new(display: &'a mut D, callbacks: &'a mut dyn TerminalCallbacks) -> Self {
        Self { display, callbacks }
    }

    /// Hand one byte to the display
    pub fn emit(&mut self, byte: u8) {
        self.display.emit(byte, self.callbacks);
    }

    pub fn emit_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.emit(byte);
        }
    }

    /// Format and print
    ///
    /// The text is formatted into a fixed buffer first. If it does not fit
    /// nothing is printed and false is returned.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> bool {
        let mut line: String<PRINT_BUFFER_LEN> = String::new();
        if line.write_fmt(args).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("console line overflow, skipped");
            return false;
        }
        self.emit_str(&line);
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use picoterm_hal::display::NoCallbacks;

    /// Display that records what it was given
    #[derive(Default)]
    pub struct RecordingDisplay {
        pub bytes: std::vec::Vec<u8>,
    }

    impl RecordingDisplay {
        pub fn text(&self) -> std::string::String {
            std::string::String::from_utf8_lossy(&self.bytes).into_owned()
        }
    }

    impl DisplaySink for RecordingDisplay {
        fn emit(&mut self, byte: u8, _callbacks: &mut dyn TerminalCallbacks) {
            self.bytes.push(byte);
        }
    }

    #[test]
    fn test_print_formats() {
        let mut display = RecordingDisplay::default();
        let mut callbacks = NoCallbacks;
        let mut console = Console::new(&mut display, &mut callbacks);

        assert!(console.print(format_args!("\x1b[{};{}H{:>6}", 8, 24, "GPIO")));
        assert_eq!(display.text(), "\x1b[8;24H  GPIO");
    }

    #[test]
    fn test_overlong_print_is_skipped() {
        let mut display = RecordingDisplay::default();
        let mut callbacks = NoCallbacks;
        let mut console = Console::new(&mut display, &mut callbacks);

        let long = [b'x'; PRINT_BUFFER_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert!(!console.print(format_args!("{}", long)));
        assert!(display.bytes.is_empty());
    }
}
