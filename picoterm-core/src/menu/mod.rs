//! Connection menu
//!
//! A vertical list of settings. Up/Down move the focus between items,
//! Left/Right change the focused item's value, Enter connects.
//!
//! Every change is written into the [`ConnectionConfig`] straight away, so
//! the config is complete whenever the menu exits. Only the value fields
//! that changed are redrawn.

pub mod item;

pub use item::{MenuItem, MenuValue, DEFAULT_ITEMS};

use heapless::Vec;
use picoterm_hal::keyboard::keycode;
use picoterm_hal::DisplaySink;

use crate::config::ConnectionConfig;
use crate::console::Console;

/// Maximum number of items in a menu
pub const MAX_MENU_ITEMS: usize = 8;

/// Screen row of the first item
const FIRST_ROW: usize = 8;
/// Rows between items
const ROW_STEP: usize = 2;
const LABEL_COL: usize = 10;
const VALUE_COL: usize = 24;

/// What the menu does with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Previous value of the focused item
    Decrease,
    /// Next value of the focused item
    Increase,
    /// Focus the item above
    Previous,
    /// Focus the item below
    Next,
    /// Leave the menu
    Confirm,
}

impl MenuAction {
    /// Map a keycode to an action; other keys are ignored
    pub fn from_key(code: u8) -> Option<Self> {
        match code {
            keycode::LEFT => Some(MenuAction::Decrease),
            keycode::RIGHT => Some(MenuAction::Increase),
            keycode::UP => Some(MenuAction::Previous),
            keycode::DOWN => Some(MenuAction::Next),
            keycode::ENTER | keycode::RETURN => Some(MenuAction::Confirm),
            _ => None,
        }
    }
}

/// Whether the menu wants more keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuStatus {
    Continue,
    Done,
}

/// Menu state: the items and which one has focus
#[derive(Debug, Clone)]
pub struct ConfigMenu {
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
    focused: usize,
}

impl Default for ConfigMenu {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConfigMenu {
    /// Create a menu over `items`, focused on the first one
    ///
    /// Items without candidates are dropped.
    pub fn new(mut items: Vec<MenuItem, MAX_MENU_ITEMS>) -> Self {
        items.retain(|item| item.selected().is_some());
        Self { items, focused: 0 }
    }

    /// Port, baud rate, data bits, parity and stop bits
    pub fn with_defaults() -> Self {
        Self::new(Vec::from_slice(&DEFAULT_ITEMS).unwrap_or_default())
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Index of the focused item
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Draw every item and store its current value in `config`
    ///
    /// Focus goes back to the first item; selections are kept from the
    /// previous run.
    pub fn draw<D: DisplaySink>(
        &mut self,
        config: &mut ConnectionConfig,
        console: &mut Console<'_, D>,
    ) {
        self.focused = 0;

        for (index, item) in self.items.iter().enumerate() {
            let row = row_of(index);
            let value = item.selected().map_or("", |v| v.label);
            let attr = if index == self.focused { 4 } else { 0 };
            console.print(format_args!(
                "\x1b[{row};{LABEL_COL}H{}: \x1b[{row};{VALUE_COL}H\x1b[{attr}m{value:>6}\x1b[m",
                item.label()
            ));

            if let Some(v) = item.selected() {
                config.set(item.setting(), v.value);
            }
        }
    }

    /// Handle one key press
    pub fn handle_key<D: DisplaySink>(
        &mut self,
        code: u8,
        config: &mut ConnectionConfig,
        console: &mut Console<'_, D>,
    ) -> MenuStatus {
        let Some(action) = MenuAction::from_key(code) else {
            return MenuStatus::Continue;
        };

        match action {
            MenuAction::Decrease | MenuAction::Increase => {
                let Some(item) = self.items.get_mut(self.focused) else {
                    return MenuStatus::Continue;
                };
                let changed = if action == MenuAction::Decrease {
                    item.select_previous()
                } else {
                    item.select_next()
                };
                if changed {
                    if let Some(v) = item.selected() {
                        config.set(item.setting(), v.value);
                    }
                    self.draw_value(self.focused, true, console);
                }
            }
            MenuAction::Previous => {
                if self.focused > 0 {
                    self.move_focus(self.focused - 1, console);
                }
            }
            MenuAction::Next => {
                if self.focused + 1 < self.items.len() {
                    self.move_focus(self.focused + 1, console);
                }
            }
            MenuAction::Confirm => return MenuStatus::Done,
        }

        MenuStatus::Continue
    }

    /// Draw the menu and feed it keys until it is confirmed
    ///
    /// `next_key` is polled without waiting; `None` means no key yet.
    pub fn run<D, F>(
        &mut self,
        config: &mut ConnectionConfig,
        console: &mut Console<'_, D>,
        mut next_key: F,
    ) where
        D: DisplaySink,
        F: FnMut() -> Option<u8>,
    {
        self.draw(config, console);

        loop {
            if let Some(code) = next_key() {
                if self.handle_key(code, config, console) == MenuStatus::Done {
                    return;
                }
            }
        }
    }

    fn move_focus<D: DisplaySink>(&mut self, to: usize, console: &mut Console<'_, D>) {
        self.draw_value(self.focused, false, console);
        self.focused = to;
        self.draw_value(self.focused, true, console);
    }

    fn draw_value<D: DisplaySink>(
        &self,
        index: usize,
        focused: bool,
        console: &mut Console<'_, D>,
    ) {
        let Some(value) = self.items.get(index).and_then(MenuItem::selected) else {
            return;
        };
        let row = row_of(index);
        let label = value.label;

        if focused {
            console.print(format_args!("\x1b[{row};{VALUE_COL}H\x1b[4m{label:>6}\x1b[m"));
        } else {
            console.print(format_args!("\x1b[{row};{VALUE_COL}H{label:>6}"));
        }
    }
}

fn row_of(index: usize) -> usize {
    FIRST_ROW + index * ROW_STEP
}
