use esp_idf_hal::delay::FreeRtos;
use log::info;

use esp32_adc::{Adc, Attenuation, Config};

fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let mut adc = Adc::with_config(&Config::default());
    adc.enable(2)?;
    adc.set_attenuation(2, Attenuation::Db11)?;

    loop {
        let raw = adc.read(2)?;
        let mv = adc.read_voltage(2)?;
        info!("pin 2: raw {raw} ({mv} mV)");
        FreeRtos::delay_ms(1000);
    }
}
