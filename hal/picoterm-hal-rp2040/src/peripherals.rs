//! Keyboard and speaker bring-up
//!
//! The south bridge sits on I2C1 (GPIO6 = SDA, GPIO7 = SCL). The two audio
//! channels are the A/B outputs of PWM slice 5 on GPIO26/GPIO27.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, PIN_26, PIN_27, PIN_6, PIN_7, PWM_SLICE5};
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use embassy_rp::Peri;
use embassy_time::Delay;
use picoterm_drivers::{BellConfig, EmbeddedI2c, PwmBell, SouthBridge};
use picoterm_hal::i2c::I2cConfig;

/// South-bridge keyboard on I2C1
pub type Keyboard = SouthBridge<EmbeddedI2c<I2c<'static, I2C1, i2c::Blocking>>>;

/// Bell on both audio channels
pub type Speaker = PwmBell<PwmOutput<'static>, Delay, 2>;

/// Errors during peripheral bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// Tone frequency can't be produced by a PWM slice
    UnsupportedPitch,
    /// PWM slice did not hand out both channels
    MissingChannel,
}

pub fn keyboard(
    i2c1: Peri<'static, I2C1>,
    scl: Peri<'static, PIN_7>,
    sda: Peri<'static, PIN_6>,
    config: &I2cConfig,
) -> Keyboard {
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.frequency;
    let bus = I2c::new_blocking(i2c1, scl, sda, i2c_config);
    SouthBridge::new(EmbeddedI2c(bus))
}

/// Divider and TOP for a square wave at `pitch_hz` from `clk_sys` Hz
///
/// Picks the smallest integer divider that keeps TOP within 16 bits.
pub fn tone_timing(clk_sys: u32, pitch_hz: u32) -> Result<(u8, u16), SetupError> {
    if pitch_hz == 0 {
        return Err(SetupError::UnsupportedPitch);
    }
    let cycles = clk_sys / pitch_hz;
    let divider = cycles.div_ceil(1 << 16).max(1);
    if divider > u32::from(u8::MAX) {
        return Err(SetupError::UnsupportedPitch);
    }
    let top = (cycles / divider).saturating_sub(1);
    let top = u16::try_from(top).map_err(|_| SetupError::UnsupportedPitch)?;
    Ok((divider as u8, top))
}

pub fn speaker(
    slice: Peri<'static, PWM_SLICE5>,
    left: Peri<'static, PIN_26>,
    right: Peri<'static, PIN_27>,
    config: BellConfig,
) -> Result<Speaker, SetupError> {
    let (divider, top) = tone_timing(clk_sys_freq(), config.pitch_hz)?;

    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = divider.into();
    pwm_config.top = top;
    pwm_config.compare_a = 0;
    pwm_config.compare_b = 0;

    let pwm = Pwm::new_output_ab(slice, left, right, pwm_config);
    let (a, b) = pwm.split();
    let (Some(a), Some(b)) = (a, b) else {
        return Err(SetupError::MissingChannel);
    };

    #[cfg(feature = "defmt")]
    defmt::debug!("bell: {} Hz, div={}, top={}", config.pitch_hz, divider, top);

    Ok(PwmBell::new([a, b], Delay, config))
}
