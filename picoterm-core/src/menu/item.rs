//! Menu items and the built-in option tables

use crate::config::Setting;

/// One selectable value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuValue {
    /// Text shown in the value field
    pub label: &'static str,
    /// Value written into the bound setting
    pub value: i32,
}

impl MenuValue {
    pub const fn new(label: &'static str, value: i32) -> Self {
        Self { label, value }
    }
}

/// A setting with its candidate values and current choice
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuItem {
    label: &'static str,
    setting: Setting,
    values: &'static [MenuValue],
    selected: usize,
}

impl MenuItem {
    /// Create an item
    ///
    /// `selected` is clamped to the last candidate. An item without
    /// candidates keeps index 0 and has no selection;
    /// [`ConfigMenu::new`](super::ConfigMenu::new) leaves such items out.
    pub const fn new(
        label: &'static str,
        setting: Setting,
        values: &'static [MenuValue],
        selected: usize,
    ) -> Self {
        let last = values.len().saturating_sub(1);
        Self {
            label,
            setting,
            values,
            selected: if selected > last { last } else { selected },
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn setting(&self) -> Setting {
        self.setting
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Currently chosen value, `None` only for an item without candidates
    pub fn selected(&self) -> Option<&'static MenuValue> {
        self.values.get(self.selected)
    }

    /// Step back one candidate; false if already at the first
    pub fn select_previous(&mut self) -> bool {
        if self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one candidate; false if already at the last
    pub fn select_next(&mut self) -> bool {
        if self.selected + 1 < self.values.len() {
            self.selected += 1;
            true
        } else {
            false
        }
    }
}

pub const PORTS: &[MenuValue] = &[MenuValue::new("USB-C", 0), MenuValue::new("GPIO", 1)];

pub const BAUDRATES: &[MenuValue] = &[
    MenuValue::new("1200", 1200),
    MenuValue::new("2400", 2400),
    MenuValue::new("4800", 4800),
    MenuValue::new("9600", 9600),
    MenuValue::new("19200", 19200),
    MenuValue::new("38400", 38400),
    MenuValue::new("57600", 57600),
    MenuValue::new("115200", 115200),
    MenuValue::new("230400", 230400),
];

pub const DATA_BITS: &[MenuValue] = &[MenuValue::new("7", 7), MenuValue::new("8", 8)];

pub const PARITIES: &[MenuValue] = &[
    MenuValue::new("N", 0),
    MenuValue::new("E", 1),
    MenuValue::new("O", 2),
];

pub const STOP_BITS: &[MenuValue] = &[MenuValue::new("1", 1), MenuValue::new("2", 2)];

/// The connection menu: GPIO, 115200, 8N1 preselected
pub const DEFAULT_ITEMS: [MenuItem; 5] = [
    MenuItem::new("Port", Setting::Port, PORTS, 1),
    MenuItem::new("Baud Rate", Setting::Baudrate, BAUDRATES, 7),
    MenuItem::new("Data Bits", Setting::DataBits, DATA_BITS, 1),
    MenuItem::new("Parity", Setting::Parity, PARITIES, 0),
    MenuItem::new("Stop Bits", Setting::StopBits, STOP_BITS, 0),
];
