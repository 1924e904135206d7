//! PWM bell
//!
//! Plays a short fixed tone by driving one or more PWM outputs at 50% duty
//! for the tone's duration, then silencing them. The PWM slice must already
//! be running at the tone frequency; this driver only gates it.
//!
//! On the PicoCalc the left and right audio channels are the two outputs
//! of one PWM slice, so the bell is normally built with both.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use picoterm_hal::Bell;

/// Bell tone parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BellConfig {
    /// Tone frequency in Hz, used when setting up the PWM slice
    pub pitch_hz: u32,
    /// Tone length in milliseconds
    pub duration_ms: u32,
    /// Duty cycle while sounding (0-100)
    pub duty_percent: u8,
}

impl Default for BellConfig {
    /// A4, one sixteenth note at 120 bpm
    fn default() -> Self {
        Self {
            pitch_hz: 440,
            duration_ms: 125,
            duty_percent: 50,
        }
    }
}

/// Bell on `N` PWM outputs sharing one tone
pub struct PwmBell<P, D, const N: usize> {
    outputs: [P; N],
    delay: D,
    config: BellConfig,
    faults: u32,
}

impl<P: SetDutyCycle, D: DelayNs, const N: usize> PwmBell<P, D, N> {
    /// Create a bell; the outputs are silenced immediately
    pub fn new(outputs: [P; N], delay: D, config: BellConfig) -> Self {
        let mut bell = Self {
            outputs,
            delay,
            config,
            faults: 0,
        };
        bell.silence();
        bell
    }

    pub fn config(&self) -> &BellConfig {
        &self.config
    }

    /// Number of PWM writes that failed
    pub fn faults(&self) -> u32 {
        self.faults
    }

    fn silence(&mut self) {
        for output in self.outputs.iter_mut() {
            if output.set_duty_cycle_fully_off().is_err() {
                self.faults = self.faults.saturating_add(1);
            }
        }
    }
}

impl<P: SetDutyCycle, D: DelayNs, const N: usize> Bell for PwmBell<P, D, N> {
    fn ring(&mut self) {
        #[cfg(feature = "defmt")]
        let before = self.faults;
        let duty = self.config.duty_percent.min(100);
        for output in self.outputs.iter_mut() {
            if output.set_duty_cycle_percent(duty).is_err() {
                self.faults = self.faults.saturating_add(1);
            }
        }
        self.delay.delay_ms(self.config.duration_ms);
        self.silence();

        #[cfg(feature = "defmt")]
        if self.faults > before {
            defmt::warn!("bell: {} PWM write failures", self.faults - before);
        }
    }
}
