//! Embedded entry point for the pagerlink handset (ESP32-S3).
//!
//! Wires the hardware collaborators - SH1106 OLED, 4×4 keypad,
//! potentiometer, ESP-NOW radio, internal flash - to the logic core
//! and runs the cooperative polling loop. If the radio fails to come
//! up the device stays usable offline: composing and history keep
//! working and the Typing view shows an `offline` badge.

#![no_std]
#![no_main]

use defmt::{error, info};
use esp_backtrace as _;
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Level, Output, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::main;
use esp_hal::time;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use esp_wifi::esp_now::EspNow;
use esp_wifi::EspWifiController;
use pagerlink::config::LOOP_PERIOD_MS;
use pagerlink::error::LinkError;
use pagerlink::input::keypad::MatrixKeypad;
use pagerlink::input::rotary::PotInput;
use pagerlink::link::espnow::{self, EspNowInbox, EspNowLink};
use pagerlink::link::{OfflineLink, PeerLink};
use pagerlink::storage::FlashStore;
use pagerlink::ui::{DisplaySurface, OledDisplay};
use pagerlink::{Dispatcher, Session};
use static_cell::StaticCell;

static WIFI_CONTROLLER: StaticCell<EspWifiController<'static>> = StaticCell::new();

/// Link as wired at boot: the ESP-NOW sender half, or the offline
/// stand-in when radio init failed.
enum RadioLink {
    Online(EspNowLink<'static>),
    Offline(OfflineLink),
}

impl PeerLink for RadioLink {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        match self {
            RadioLink::Online(link) => link.send(frame),
            RadioLink::Offline(link) => link.send(frame),
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, RadioLink::Online(_))
    }
}

/// Bring up the ESP-NOW radio. Any failure here degrades to offline
/// mode instead of halting the device.
fn init_radio(
    timg0: TimerGroup<esp_hal::peripherals::TIMG0>,
    rng: esp_hal::rng::Rng,
    radio_clk: esp_hal::peripherals::RADIO_CLK,
    wifi: esp_hal::peripherals::WIFI,
) -> Option<(EspNowLink<'static>, EspNowInbox<'static>)> {
    let controller = match esp_wifi::init(timg0.timer0, rng, radio_clk) {
        Ok(c) => WIFI_CONTROLLER.init(c),
        Err(e) => {
            error!("wifi init failed: {:?}", e);
            return None;
        }
    };
    let esp_now = match EspNow::new(controller, wifi) {
        Ok(e) => e,
        Err(e) => {
            error!("esp-now init failed: {:?}", e);
            return None;
        }
    };
    match espnow::split(esp_now) {
        Ok(halves) => Some(halves),
        Err(e) => {
            error!("esp-now peer setup failed: {:?}", e);
            None
        }
    }
}

fn now_ms() -> u64 {
    time::now().duration_since_epoch().to_millis()
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    let delay = Delay::new();

    // Display first, so the boot splash is visible while the radio
    // comes up.
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9);
    let mut display = match OledDisplay::new(i2c) {
        Ok(d) => d,
        Err(_) => {
            error!("display init failed");
            loop {
                delay.delay_millis(1000);
            }
        }
    };
    display.clear();
    display.draw_line(0, 10, "Booting...");
    let _ = display.commit();

    // Radio; failure leaves the device in offline mode.
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let rng = esp_hal::rng::Rng::new(peripherals.RNG);
    let (link, mut inbox) =
        match init_radio(timg0, rng, peripherals.RADIO_CLK, peripherals.WIFI) {
            Some((link, inbox)) => (RadioLink::Online(link), Some(inbox)),
            None => (RadioLink::Offline(OfflineLink), None),
        };
    info!("radio ready: {}", link.is_ready());

    // Keypad matrix per the pin map in config.rs.
    let keypad = MatrixKeypad::new(
        [
            Output::new(peripherals.GPIO42, Level::High),
            Output::new(peripherals.GPIO41, Level::High),
            Output::new(peripherals.GPIO40, Level::High),
            Output::new(peripherals.GPIO39, Level::High),
        ],
        [
            Input::new(peripherals.GPIO38, Pull::Up),
            Input::new(peripherals.GPIO37, Pull::Up),
            Input::new(peripherals.GPIO36, Pull::Up),
            Input::new(peripherals.GPIO35, Pull::Up),
        ],
    );

    // Potentiometer on ADC1.
    let mut adc_config = AdcConfig::new();
    let pot_pin = adc_config.enable_pin(peripherals.GPIO1, Attenuation::Attenuation11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);
    let rotary = PotInput::new(adc, pot_pin);

    let session = Session::new(FlashStore::open(), link);
    let mut dispatcher = Dispatcher::new(session, display, keypad, rotary);

    loop {
        if let Some(inbox) = inbox.as_mut() {
            while let Some(frame) = inbox.receive() {
                if !dispatcher.push_incoming(&frame) {
                    break; // inbox full, drop the rest of the burst
                }
            }
        }
        if dispatcher.run_cycle(now_ms()).is_err() {
            error!("display refresh failed");
        }
        delay.delay_millis(LOOP_PERIOD_MS);
    }
}
