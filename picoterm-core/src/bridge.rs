//! The terminal bridge
//!
//! One connection cycle is: banner, menu, bring up the wire, relay until
//! the user presses Break, tear down. The run phase busy-polls both
//! directions and never waits on either, so it can keep up with the wire
//! while the keyboard is idle and vice versa.
//!
//! ```text
//!  wire ──► producer ──► ByteRing ──► Bridge ──► display
//!  keys ──► ModifierTracker ──► KeyTranslator ──► Bridge ──► wire
//! ```

use picoterm_hal::keyboard::keycode;
use picoterm_hal::{
    Bell, DisplaySink, KeyEvent, KeyState, Keyboard, TerminalCallbacks, UartControl, UartError,
    UartRx, UartTx,
};

use crate::config::ConnectionConfig;
use crate::console::Console;
use crate::keys::{KeyTranslator, ModifierTracker};
use crate::menu::ConfigMenu;
use crate::ring::Consumer;

/// Most bytes moved to the display per run-loop iteration
///
/// Bounds how long a flood from the wire can delay the keyboard poll.
pub const DRAIN_BUDGET: usize = 64;

/// Source of received bytes for the run phase
pub trait Inbound {
    /// Next received byte, if one is waiting
    fn next_byte(&mut self) -> Option<u8>;
}

impl<const N: usize> Inbound for Consumer<'_, N> {
    fn next_byte(&mut self) -> Option<u8> {
        self.try_read()
    }
}

/// Reads straight from the UART when no producer context is used
pub struct Direct<R>(pub R);

impl<R: UartRx> Inbound for Direct<R> {
    fn next_byte(&mut self) -> Option<u8> {
        self.0.try_read().ok().flatten()
    }
}

/// Where the bridge is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Menu on screen, wire down
    Configuring,
    /// Relaying between keyboard, display and wire
    Connected,
    /// Break seen, waiting for teardown
    Interrupted,
}

/// Events that move the bridge between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent {
    /// Wire configured successfully
    Connect,
    /// User pressed Break
    Break,
    /// Start a new cycle
    Restart,
}

impl Phase {
    pub fn transition(self, event: BridgeEvent) -> Self {
        use BridgeEvent::*;
        use Phase::*;

        match (self, event) {
            (Configuring, Connect) => Connected,
            (Connected, Break) => Interrupted,
            (_, Restart) => Configuring,
            _ => self,
        }
    }
}

/// Cycle state shared by the menu and run phases
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeState {
    phase: Phase,
    /// Set by Break, cleared at the top of each cycle
    interrupt: bool,
    /// NUL bytes dropped before the display
    filtered: u32,
    /// Key presses the wire refused
    tx_errors: u32,
    /// Why the last connection attempt failed
    last_error: Option<UartError>,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeState {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Configuring,
            interrupt: false,
            filtered: 0,
            tx_errors: 0,
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt
    }

    pub fn filtered(&self) -> u32 {
        self.filtered
    }

    pub fn tx_errors(&self) -> u32 {
        self.tx_errors
    }

    pub fn last_error(&self) -> Option<UartError> {
        self.last_error
    }

    fn apply(&mut self, event: BridgeEvent) {
        self.phase = self.phase.transition(event);
        match event {
            BridgeEvent::Restart => self.interrupt = false,
            BridgeEvent::Break => self.interrupt = true,
            BridgeEvent::Connect => self.last_error = None,
        }
    }
}

/// Answers the display's callbacks over the wire and the speaker
pub struct Responder<'a, W, B> {
    wire: &'a mut W,
    bell: &'a mut B,
}

impl<'a, W: UartTx, B: Bell> Responder<'a, W, B> {
    pub fn new(wire: &'a mut W, bell: &'a mut B) -> Self {
        Self { wire, bell }
    }
}

impl<W: UartTx, B: Bell> TerminalCallbacks for Responder<'_, W, B> {
    fn report(&mut self, text: &str) {
        if let Err(_e) = self.wire.write_all(text.as_bytes()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("report dropped: {:?}", _e);
        }
    }

    fn bell(&mut self) {
        self.bell.ring();
    }
}

/// Keyboard, display and wire glued together
pub struct Bridge<W, K, D, B, S> {
    wire: W,
    keyboard: K,
    display: D,
    bell: B,
    inbound: S,
    modifiers: ModifierTracker,
    state: BridgeState,
}

impl<W, K, D, B, S> Bridge<W, K, D, B, S>
where
    W: UartTx + UartControl,
    K: Keyboard,
    D: DisplaySink,
    B: Bell,
    S: Inbound,
{
    pub fn new(wire: W, keyboard: K, display: D, bell: B, inbound: S) -> Self {
        Self {
            wire,
            keyboard,
            display,
            bell,
            inbound,
            modifiers: ModifierTracker::new(),
            state: BridgeState::new(),
        }
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// Run connection cycles forever
    pub fn run(&mut self, menu: &mut ConfigMenu) -> ! {
        loop {
            self.cycle(menu);
        }
    }

    /// One full cycle: menu, connect, relay until Break, disconnect
    pub fn cycle(&mut self, menu: &mut ConfigMenu) {
        self.state.apply(BridgeEvent::Restart);
        self.print_banner();

        let config = self.configure(menu);
        if self.connect(&config).is_ok() {
            self.run_phase();
        }
        self.disconnect();
    }

    /// Run the menu until the user confirms, returning the chosen settings
    pub fn configure(&mut self, menu: &mut ConfigMenu) -> ConnectionConfig {
        let mut config = ConnectionConfig::default();
        let Self {
            wire,
            keyboard,
            display,
            bell,
            modifiers,
            ..
        } = self;

        let mut responder = Responder::new(wire, bell);
        let mut console = Console::new(display, &mut responder);
        menu.run(&mut config, &mut console, || {
            let event = poll_key(keyboard)?;
            let pressed = is_pressed(event)?;
            if modifiers.on_event(event.code, pressed) || !pressed {
                return None;
            }
            Some(event.code)
        });

        #[cfg(feature = "defmt")]
        defmt::info!("menu done: {}", config);
        config
    }

    /// Apply `config` to the wire and announce the connection
    pub fn connect(&mut self, config: &ConnectionConfig) -> Result<(), UartError> {
        if let Err(e) = self.wire.configure(config.port, &config.uart_config()) {
            #[cfg(feature = "defmt")]
            defmt::warn!("cannot open {}: {:?}", config.port, e);
            self.state.last_error = Some(e);
            return Err(e);
        }

        self.state.apply(BridgeEvent::Connect);
        #[cfg(feature = "defmt")]
        defmt::info!("connected: {}", config);

        let Self {
            wire,
            display,
            bell,
            ..
        } = self;
        let mut responder = Responder::new(wire, bell);
        let mut console = Console::new(display, &mut responder);
        console.print(format_args!(
            "\x1b[2J\x1b[H\x1b[mConnected at {}\r\nPress [Brk] to change.\r\n\r\n",
            config
        ));
        Ok(())
    }

    /// Relay until the interrupt flag is set
    pub fn run_phase(&mut self) {
        while !self.state.is_interrupted() {
            self.step();
        }
    }

    /// One run-loop iteration: drain the wire, then handle at most one key
    pub fn step(&mut self) {
        self.drain_inbound();

        if let Some(event) = poll_key(&mut self.keyboard) {
            self.handle_key(event);
        }
    }

    /// Move waiting bytes to the display, dropping NULs
    ///
    /// Returns the number of bytes emitted.
    pub fn drain_inbound(&mut self) -> usize {
        let Self {
            wire,
            display,
            bell,
            inbound,
            state,
            ..
        } = self;
        let mut responder = Responder::new(wire, bell);
        let mut emitted = 0;

        for _ in 0..DRAIN_BUDGET {
            let Some(byte) = inbound.next_byte() else {
                break;
            };
            if byte == 0 {
                state.filtered = state.filtered.wrapping_add(1);
                continue;
            }
            display.emit(byte, &mut responder);
            emitted += 1;
        }

        emitted
    }

    /// Route one key event during the run phase
    pub fn handle_key(&mut self, event: KeyEvent) {
        let Some(pressed) = is_pressed(event) else {
            return;
        };

        if pressed && event.code == keycode::BREAK {
            #[cfg(feature = "defmt")]
            defmt::info!("break, back to menu");
            self.state.apply(BridgeEvent::Break);
            return;
        }

        if self.modifiers.on_event(event.code, pressed) || !pressed {
            return;
        }

        let out = KeyTranslator::translate(event.code, self.modifiers.snapshot());
        let bytes = out.as_bytes();
        if let Err(_e) = self.wire.write_all(bytes) {
            #[cfg(feature = "defmt")]
            defmt::warn!("key dropped: {:?}", _e);
            self.state.tx_errors = self.state.tx_errors.wrapping_add(1);
        }
    }

    /// Shut the wire down at the end of a cycle
    pub fn disconnect(&mut self) {
        self.wire.deinit();
    }

    fn print_banner(&mut self) {
        let Self {
            wire,
            display,
            bell,
            state,
            ..
        } = self;
        let mut responder = Responder::new(wire, bell);
        let mut console = Console::new(display, &mut responder);

        console.print(format_args!(
            "\x1b[2J\x1b[H\x1b[mTerminal {}\r\n",
            env!("CARGO_PKG_VERSION")
        ));
        console.emit_str("Connect with USB-C port or GPIO pins, 3.3V only!\r\n");
        if let Some(e) = state.last_error {
            console.print(format_args!("Connection failed: {:?}\r\n", e));
        }
    }
}

/// Poll the keyboard, treating errors as "no key"
fn poll_key<K: Keyboard>(keyboard: &mut K) -> Option<KeyEvent> {
    match keyboard.poll() {
        Ok(event) => event,
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("keyboard poll failed: {:?}", _e);
            None
        }
    }
}

/// Press or release; `None` for auto-repeat hold reports
fn is_pressed(event: KeyEvent) -> Option<bool> {
    match event.state {
        KeyState::Pressed => Some(true),
        KeyState::Released => Some(false),
        KeyState::Held => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::{pump, ByteRing};
    use picoterm_hal::{Port, UartConfig};
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockWire {
        sent: Vec<u8>,
        configured: Option<(Port, UartConfig)>,
        deinit_count: usize,
        fail_configure: bool,
    }

    impl UartTx for MockWire {
        fn write_byte(&mut self, byte: u8) -> Result<(), UartError> {
            if self.configured.is_none() {
                return Err(UartError::NotConfigured);
            }
            self.sent.push(byte);
            Ok(())
        }
    }

    impl UartControl for MockWire {
        fn configure(&mut self, port: Port, config: &UartConfig) -> Result<(), UartError> {
            if self.fail_configure {
                return Err(UartError::UnsupportedBaudrate);
            }
            self.configured = Some((port, *config));
            Ok(())
        }

        fn deinit(&mut self) {
            self.configured = None;
            self.deinit_count += 1;
        }
    }

    #[derive(Default)]
    struct ScriptedKeyboard {
        events: VecDeque<Result<KeyEvent, picoterm_hal::KeyboardError>>,
    }

    impl ScriptedKeyboard {
        fn press(mut self, code: u8) -> Self {
            self.events.push_back(Ok(KeyEvent::pressed(code)));
            self.events.push_back(Ok(KeyEvent::released(code)));
            self
        }

        fn event(mut self, event: KeyEvent) -> Self {
            self.events.push_back(Ok(event));
            self
        }
    }

    impl Keyboard for ScriptedKeyboard {
        fn poll(&mut self) -> Result<Option<KeyEvent>, picoterm_hal::KeyboardError> {
            self.events.pop_front().transpose()
        }
    }

    /// Records bytes; ENQ asks for a report, BEL rings
    #[derive(Default)]
    struct AnsweringDisplay {
        bytes: Vec<u8>,
    }

    impl AnsweringDisplay {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.bytes).into_owned()
        }
    }

    impl DisplaySink for AnsweringDisplay {
        fn emit(&mut self, byte: u8, callbacks: &mut dyn TerminalCallbacks) {
            match byte {
                0x05 => callbacks.report("\x1b[?1;0c"),
                0x07 => callbacks.bell(),
                _ => self.bytes.push(byte),
            }
        }
    }

    #[derive(Default)]
    struct CountingBell(usize);

    impl Bell for CountingBell {
        fn ring(&mut self) {
            self.0 += 1;
        }
    }

    /// Hands out a fixed list of bytes
    struct Bytes(VecDeque<u8>);

    impl Inbound for Bytes {
        fn next_byte(&mut self) -> Option<u8> {
            self.0.pop_front()
        }
    }

    type TestBridge<S> = Bridge<MockWire, ScriptedKeyboard, AnsweringDisplay, CountingBell, S>;

    fn bridge<S: Inbound>(keyboard: ScriptedKeyboard, inbound: S) -> TestBridge<S> {
        Bridge::new(
            MockWire::default(),
            keyboard,
            AnsweringDisplay::default(),
            CountingBell::default(),
            inbound,
        )
    }

    fn connected<S: Inbound>(keyboard: ScriptedKeyboard, inbound: S) -> TestBridge<S> {
        let mut bridge = bridge(keyboard, inbound);
        bridge.connect(&ConnectionConfig::default()).unwrap();
        bridge.display.bytes.clear();
        bridge
    }

    #[test]
    fn test_nul_bytes_never_reach_the_display() {
        let inbound = Bytes(VecDeque::from(std::vec![b'H', b'i', 0, b'!']));
        let mut bridge = connected(ScriptedKeyboard::default(), inbound);

        bridge.step();
        assert_eq!(bridge.display.bytes, b"Hi!");
        assert_eq!(bridge.state().filtered(), 1);
    }

    #[test]
    fn test_ring_to_display_end_to_end() {
        let mut ring: ByteRing<16> = ByteRing::new();
        let (mut producer, consumer) = ring.split();
        for &b in b"Hi\0!" {
            if b != 0 {
                producer.write(b);
            }
        }
        let mut bridge = connected(ScriptedKeyboard::default(), consumer);

        assert_eq!(bridge.drain_inbound(), 3);
        assert_eq!(bridge.display.text(), "Hi!");
        assert_eq!(bridge.drain_inbound(), 0);
    }

    #[test]
    fn test_pump_and_drain_through_direct_rx() {
        struct Rx(VecDeque<u8>);

        impl UartRx for Rx {
            fn byte_available(&mut self) -> bool {
                !self.0.is_empty()
            }

            fn read_byte(&mut self) -> Result<u8, UartError> {
                self.0.pop_front().ok_or(UartError::Overrun)
            }
        }

        let mut bridge = connected(
            ScriptedKeyboard::default(),
            Direct(Rx(VecDeque::from(std::vec![b'o', 0, b'k']))),
        );
        bridge.step();
        assert_eq!(bridge.display.text(), "ok");

        let mut ring: ByteRing<4> = ByteRing::new();
        let (mut producer, _consumer) = ring.split();
        let stats = pump(&mut Rx(VecDeque::from(std::vec![1, 2, 3, 4])), &mut producer);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_drain_is_bounded_per_step() {
        let inbound = Bytes((0..200).map(|_| b'x').collect());
        let mut bridge = connected(ScriptedKeyboard::default(), inbound);

        assert_eq!(bridge.drain_inbound(), DRAIN_BUDGET);
        assert_eq!(bridge.inbound.0.len(), 200 - DRAIN_BUDGET);
    }

    #[test]
    fn test_keys_are_translated_onto_the_wire() {
        let keyboard = ScriptedKeyboard::default()
            .event(KeyEvent::pressed(keycode::MOD_CTRL))
            .press(b'a')
            .event(KeyEvent::released(keycode::MOD_CTRL))
            .press(keycode::LEFT)
            .press(keycode::ENTER)
            .press(keycode::CAPS_LOCK);
        let mut bridge = connected(keyboard, Bytes(VecDeque::new()));

        for _ in 0..12 {
            bridge.step();
        }
        assert_eq!(bridge.wire.sent, b"\x01\x1b[D\r");
    }

    #[test]
    fn test_held_and_released_keys_send_nothing() {
        let keyboard = ScriptedKeyboard::default()
            .event(KeyEvent {
                code: b'q',
                state: KeyState::Held,
            })
            .event(KeyEvent::released(b'q'));
        let mut bridge = connected(keyboard, Bytes(VecDeque::new()));

        bridge.step();
        bridge.step();
        assert!(bridge.wire.sent.is_empty());
    }

    #[test]
    fn test_break_interrupts_without_sending() {
        let keyboard = ScriptedKeyboard::default()
            .press(b'x')
            .press(keycode::BREAK)
            .press(b'y');
        let mut bridge = connected(keyboard, Bytes(VecDeque::new()));

        bridge.run_phase();
        assert!(bridge.state().is_interrupted());
        assert_eq!(bridge.state().phase(), Phase::Interrupted);
        assert_eq!(bridge.wire.sent, b"x");
    }

    #[test]
    fn test_full_cycle() {
        let keyboard = ScriptedKeyboard::default()
            // Menu: baud rate one step down, connect
            .press(keycode::DOWN)
            .press(keycode::LEFT)
            .press(keycode::ENTER)
            // Run phase
            .press(b'l')
            .press(b's')
            .press(keycode::ENTER)
            .press(keycode::BREAK);
        let mut bridge = bridge(keyboard, Bytes(VecDeque::new()));
        let mut menu = ConfigMenu::with_defaults();

        bridge.cycle(&mut menu);

        assert_eq!(bridge.wire.sent, b"ls\r");
        assert_eq!(bridge.wire.deinit_count, 1);
        assert!(bridge.wire.configured.is_none());
        assert_eq!(bridge.state().phase(), Phase::Interrupted);

        let text = bridge.display.text();
        assert!(text.contains("Terminal "));
        assert!(text.contains("Connected at GPIO 57600 8N1\r\nPress [Brk] to change."));
    }

    #[test]
    fn test_failed_connect_returns_to_menu() {
        let keyboard = ScriptedKeyboard::default()
            .press(keycode::ENTER)
            .press(keycode::BREAK)
            .press(keycode::ENTER)
            .press(keycode::ENTER)
            .press(keycode::BREAK);
        let mut bridge = bridge(keyboard, Bytes(VecDeque::new()));
        let mut menu = ConfigMenu::with_defaults();

        bridge.cycle(&mut menu);
        assert!(bridge.state().is_interrupted());

        bridge.wire.fail_configure = true;
        bridge.cycle(&mut menu);
        assert!(!bridge.state().is_interrupted());
        assert_eq!(
            bridge.state().last_error(),
            Some(UartError::UnsupportedBaudrate)
        );
        assert_eq!(bridge.state().phase(), Phase::Configuring);

        bridge.wire.fail_configure = false;
        bridge.display.bytes.clear();
        bridge.cycle(&mut menu);
        assert!(bridge
            .display
            .text()
            .contains("Connection failed: UnsupportedBaudrate"));
    }

    #[test]
    fn test_display_callbacks_answer_on_wire() {
        let inbound = Bytes(VecDeque::from(std::vec![b'a', 0x05, 0x07, b'b']));
        let mut bridge = connected(ScriptedKeyboard::default(), inbound);

        bridge.step();
        assert_eq!(bridge.display.text(), "ab");
        assert_eq!(bridge.wire.sent, b"\x1b[?1;0c");
        assert_eq!(bridge.bell.0, 1);
    }

    #[test]
    fn test_keyboard_errors_are_ignored() {
        let mut keyboard = ScriptedKeyboard::default();
        keyboard
            .events
            .push_back(Err(picoterm_hal::KeyboardError::Bus));
        let keyboard = keyboard.press(b'z');
        let mut bridge = connected(keyboard, Bytes(VecDeque::new()));

        bridge.step();
        bridge.step();
        assert_eq!(bridge.wire.sent, b"z");
    }

    #[test]
    fn test_phase_transitions() {
        use BridgeEvent::*;

        assert_eq!(Phase::Configuring.transition(Connect), Phase::Connected);
        assert_eq!(Phase::Connected.transition(Break), Phase::Interrupted);
        assert_eq!(Phase::Interrupted.transition(Restart), Phase::Configuring);
        assert_eq!(Phase::Configuring.transition(Break), Phase::Configuring);
        assert_eq!(Phase::Interrupted.transition(Connect), Phase::Interrupted);
    }

    #[test]
    fn test_shift_held_across_break_carries_into_next_session() {
        let keyboard = ScriptedKeyboard::default()
            .press(keycode::ENTER)
            .event(KeyEvent::pressed(keycode::MOD_SHIFT_LEFT))
            .press(keycode::BREAK)
            .press(keycode::ENTER)
            .press(b'a')
            .press(keycode::BREAK);
        let mut bridge = bridge(keyboard, Bytes(VecDeque::new()));
        let mut menu = ConfigMenu::with_defaults();

        bridge.cycle(&mut menu);
        assert!(bridge.wire.sent.is_empty());

        bridge.cycle(&mut menu);
        assert_eq!(bridge.wire.sent, b"A");
    }

    #[test]
    fn test_refused_key_counts_once() {
        let keyboard = ScriptedKeyboard::default()
            .press(keycode::LEFT)
            .press(b'x');
        // Never connected: every write is refused
        let mut bridge = bridge(keyboard, Bytes(VecDeque::new()));

        for _ in 0..4 {
            bridge.step();
        }
        assert!(bridge.wire.sent.is_empty());
        assert_eq!(bridge.state().tx_errors(), 2);
    }
}
