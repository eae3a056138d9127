//! Potentiometer input on the ADC, oversampled.
//!
//! The selector needs a reasonably quiet signal; averaging a burst of
//! raw conversions filters most of the wiper noise before the value
//! reaches the hysteresis logic.

use crate::config::ROTARY_OVERSAMPLE;
use crate::input::RotaryInput;
use esp_hal::analog::adc::{Adc, AdcChannel, AdcPin};
use esp_hal::peripherals::ADC1;

/// Filtered potentiometer source on ADC1.
pub struct PotInput<'d, PIN: AdcChannel> {
    adc: Adc<'d, ADC1>,
    pin: AdcPin<PIN, ADC1>,
}

impl<'d, PIN: AdcChannel> PotInput<'d, PIN> {
    pub fn new(adc: Adc<'d, ADC1>, pin: AdcPin<PIN, ADC1>) -> Self {
        Self { adc, pin }
    }
}

impl<PIN: AdcChannel> RotaryInput for PotInput<'_, PIN> {
    /// Mean of a burst of conversions, in `[0, ADC_MAX]`.
    fn poll(&mut self) -> u16 {
        let mut sum: u32 = 0;
        for _ in 0..ROTARY_OVERSAMPLE {
            let sample = nb::block!(self.adc.read_oneshot(&mut self.pin)).unwrap_or(0);
            sum += sample as u32;
        }
        (sum / ROTARY_OVERSAMPLE as u32) as u16
    }
}
