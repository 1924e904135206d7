//! Display and audio abstractions
//!
//! The display collaborator owns all rendering, including whatever escape
//! sequences it chooses to honour. The terminal core only hands it bytes.

/// Hooks the display calls back into while rendering
///
/// Some sequences the display interprets need an answer on the wire
/// (cursor position reports, device attributes) or an audible alert.
pub trait TerminalCallbacks {
    /// Send `text` back to the remote end
    fn report(&mut self, text: &str);

    /// Sound the bell
    fn bell(&mut self);
}

/// Byte sink that renders to the screen
pub trait DisplaySink {
    /// Render one byte
    fn emit(&mut self, byte: u8, callbacks: &mut dyn TerminalCallbacks);
}

/// Audible alert
pub trait Bell {
    /// Play the alert tone, returning once it has finished
    fn ring(&mut self);
}

/// Callbacks that ignore everything, for output that needs no answers
pub struct NoCallbacks;

impl TerminalCallbacks for NoCallbacks {
    fn report(&mut self, _text: &str) {}

    fn bell(&mut self) {}
}
