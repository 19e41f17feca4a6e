use std::sync::Arc;

use anyhow::{anyhow, Context};
use esp_idf_sys::{adc_channel_t, adc_unit_t_ADC_UNIT_1};
use log::warn;

use crate::channel::{default_table, lookup, ChannelInfo, MAX_CHANNELS};
use crate::config::{Attenuation, Config, Width, DEFAULT_VREF_MV};
use crate::oneshot::{CalScheme, OneshotUnit};

/// Single-shot sampling on ADC1, addressed by GPIO number.
///
/// Pins must be enabled before they can be read. Width and reference
/// voltage are shared by all channels; attenuation is per pin.
pub struct Adc {
    chans: [Option<ChannelInfo>; MAX_CHANNELS],
    unit: Option<Arc<OneshotUnit>>,
    width: Width,
    vref_mv: u32,
}

impl Adc {
    pub fn new() -> Self {
        Self {
            chans: default_table(),
            unit: None,
            width: Width::default(),
            vref_mv: DEFAULT_VREF_MV,
        }
    }

    /// [Adc::new] with the vref/width overrides from the system config
    /// applied. Zero fields keep the defaults, like the C sys config.
    pub fn with_config(config: &Config) -> Self {
        let mut adc = Self::new();
        if config.vref_mv > 0 {
            adc.vref_mv = config.vref_mv;
        }
        if config.width > 0 {
            match Width::from_bits(config.width) {
                // nothing is enabled yet, so no channel needs reconfiguring
                Some(width) => adc.width = width,
                None => warn!("ignoring unsupported ADC width of {} bits", config.width),
            }
        }
        adc
    }

    /// Configure `pin` for sampling with its current attenuation. The
    /// driver unit is created on the first enable and shared afterwards.
    pub fn enable(&mut self, pin: i32) -> anyhow::Result<()> {
        // resolve the pin before any driver call
        self.chan(pin)?;
        let unit = self.unit()?;
        let width = self.width;
        let ci = lookup(&mut self.chans, pin)
            .ok_or_else(|| anyhow!("no ADC channel on pin {pin}"))?;
        configure(ci, &unit, width)
    }

    /// single raw sample
    pub fn read(&mut self, pin: i32) -> anyhow::Result<u16> {
        let ci = self.chan(pin)?;
        let unit = ci.unit.as_ref().ok_or_else(|| anyhow!("pin {pin} not enabled"))?;
        let raw = unit
            .read(ci.channel as adc_channel_t)
            .with_context(|| format!("ADC read on pin {pin}"))?;
        Ok(raw as u16)
    }

    /// Single sample converted to millivolts, through the calibration
    /// scheme when the channel has one and linearly otherwise.
    pub fn read_voltage(&mut self, pin: i32) -> anyhow::Result<u16> {
        let width = self.width;
        let vref_mv = self.vref_mv;
        let ci = self.chan(pin)?;
        let unit = ci.unit.as_ref().ok_or_else(|| anyhow!("pin {pin} not enabled"))?;
        let raw = unit
            .read(ci.channel as adc_channel_t)
            .with_context(|| format!("ADC read on pin {pin}"))?;
        let mv = match &ci.cal {
            Some(cal) => cal
                .raw_to_voltage(raw)
                .with_context(|| format!("ADC calibration on pin {pin}"))? as u32,
            None => fallback_mv(raw as u32, ci.atten, width, vref_mv),
        };
        Ok(mv as u16)
    }

    /// Change the input range of `pin`. Reconfigures the channel right
    /// away, enabling the pin if it was not enabled yet.
    pub fn set_attenuation(&mut self, pin: i32, atten: Attenuation) -> anyhow::Result<()> {
        let ci = lookup(&mut self.chans, pin)
            .ok_or_else(|| anyhow!("no ADC channel on pin {pin}"))?;
        ci.atten = atten;
        self.enable(pin)
    }

    /// Change the sample width and reconfigure every enabled channel with
    /// it, rebuilding their calibration schemes. The new width is stored
    /// only once every channel took it; if a channel fails partway, the
    /// ones before it are already on the new width in hardware and calling
    /// again after fixing the cause is safe.
    pub fn set_width(&mut self, width: Width) -> anyhow::Result<()> {
        if let Some(unit) = self.unit.clone() {
            for ci in self.chans.iter_mut().flatten() {
                if ci.unit.is_some() {
                    configure(ci, &unit, width)?;
                }
            }
        }
        self.width = width;
        Ok(())
    }

    /// reference voltage for the uncalibrated fallback conversion only;
    /// the efuse-backed calibration schemes ignore it
    pub fn set_vref(&mut self, vref_mv: u32) {
        self.vref_mv = vref_mv;
    }

    fn chan(&mut self, pin: i32) -> anyhow::Result<&mut ChannelInfo> {
        lookup(&mut self.chans, pin).ok_or_else(|| anyhow!("no ADC channel on pin {pin}"))
    }

    fn unit(&mut self) -> anyhow::Result<Arc<OneshotUnit>> {
        match &self.unit {
            Some(unit) => Ok(unit.clone()),
            None => {
                let unit = Arc::new(
                    OneshotUnit::new(adc_unit_t_ADC_UNIT_1).context("ADC unit init")?,
                );
                self.unit = Some(unit.clone());
                Ok(unit)
            }
        }
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}

/// (Re)apply the channel settings and rebuild the calibration scheme.
/// Assigning over the old handles drops them, which deletes the driver
/// objects behind them.
fn configure(ci: &mut ChannelInfo, unit: &Arc<OneshotUnit>, width: Width) -> anyhow::Result<()> {
    unit.config_channel(ci.channel as adc_channel_t, ci.atten.into(), width.into())
        .with_context(|| format!("config ADC channel {} (pin {})", ci.channel, ci.pin))?;

    // not every chip revision carries the efuse data the scheme needs
    ci.cal = match CalScheme::curve_fitting(
        adc_unit_t_ADC_UNIT_1,
        ci.channel as adc_channel_t,
        ci.atten.into(),
        width.into(),
    ) {
        Ok(cal) => Some(cal),
        Err(e) => {
            warn!("no ADC calibration on pin {}: {e}, using linear conversion", ci.pin);
            None
        }
    };

    ci.unit = Some(unit.clone());
    Ok(())
}

/// Linear conversion used when no calibration scheme exists. The
/// full-scale voltage assumes the nominal reference, so it is scaled by
/// the configured one.
fn fallback_mv(raw: u32, atten: Attenuation, width: Width, vref_mv: u32) -> u32 {
    (raw as u64 * atten.full_scale_mv() as u64 * vref_mv as u64
        / (DEFAULT_VREF_MV as u64 * width.max_reading() as u64)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_full_scale() {
        // a full-scale reading at the nominal reference is the attenuation's
        // full-scale voltage exactly
        assert_eq!(fallback_mv(4095, Attenuation::Db11, Width::Bit12, 1100), 2500);
        assert_eq!(fallback_mv(4095, Attenuation::Db0, Width::Bit12, 1100), 750);
        assert_eq!(fallback_mv(8191, Attenuation::Db6, Width::Bit13, 1100), 1300);
    }

    #[test]
    fn fallback_scales_with_vref() {
        let nominal = fallback_mv(2048, Attenuation::Db11, Width::Bit12, 1100);
        let doubled = fallback_mv(2048, Attenuation::Db11, Width::Bit12, 2200);
        assert_eq!(doubled, nominal * 2);
        assert_eq!(fallback_mv(0, Attenuation::Db11, Width::Bit12, 1100), 0);
    }

    #[test]
    fn config_overrides() {
        let adc = Adc::with_config(&Config { vref_mv: 900, width: 10 });
        assert_eq!(adc.vref_mv, 900);
        assert_eq!(adc.width, Width::Bit10);

        // zero and out-of-range values keep the defaults
        let adc = Adc::with_config(&Config { vref_mv: 0, width: 7 });
        assert_eq!(adc.vref_mv, DEFAULT_VREF_MV);
        assert_eq!(adc.width, Width::Bit12);
    }

    #[test]
    fn unknown_pin_leaves_the_unit_untouched() {
        // a bad pin number must fail before the driver unit is created
        let mut adc = Adc::new();
        assert!(adc.enable(999).is_err());
        assert!(adc.set_attenuation(999, Attenuation::Db0).is_err());
        assert!(adc.unit.is_none());
    }

    #[test]
    fn set_width_without_enabled_channels() {
        let mut adc = Adc::new();
        adc.set_width(Width::Bit11).unwrap();
        assert_eq!(adc.width, Width::Bit11);
    }

    #[test]
    fn read_before_enable_is_an_error() {
        let mut adc = Adc::new();
        assert!(adc.read(2).is_err());
        assert!(adc.read_voltage(2).is_err());
        assert!(adc.read(40).is_err());
    }
}
