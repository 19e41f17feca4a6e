use esp_idf_sys::*;
use serde::{Deserialize, Serialize};

/// nominal reference voltage of the ADC, mV
pub(crate) const DEFAULT_VREF_MV: u32 = 1100;

/// Input attenuation applied in front of the ADC. More attenuation
/// extends the measurable input range at the cost of accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attenuation {
    Db0,
    Db2p5,
    Db6,
    #[default]
    Db11,
}

impl Attenuation {
    /// full-scale input in mV at the nominal 1100 mV reference,
    /// from the ESP32-C3 datasheet recommended ranges
    pub(crate) fn full_scale_mv(self) -> u32 {
        match self {
            Attenuation::Db0 => 750,
            Attenuation::Db2p5 => 1050,
            Attenuation::Db6 => 1300,
            Attenuation::Db11 => 2500,
        }
    }
}

impl From<Attenuation> for adc_atten_t {
    fn from(atten: Attenuation) -> Self {
        match atten {
            Attenuation::Db0 => adc_atten_t_ADC_ATTEN_DB_0,
            Attenuation::Db2p5 => adc_atten_t_ADC_ATTEN_DB_2_5,
            Attenuation::Db6 => adc_atten_t_ADC_ATTEN_DB_6,
            Attenuation::Db11 => adc_atten_t_ADC_ATTEN_DB_11,
        }
    }
}

/// Sample width. Not every chip supports every width; the driver rejects
/// unsupported ones when the channel is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    Bit9,
    Bit10,
    Bit11,
    #[default]
    Bit12,
    Bit13,
}

impl Width {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            9 => Some(Width::Bit9),
            10 => Some(Width::Bit10),
            11 => Some(Width::Bit11),
            12 => Some(Width::Bit12),
            13 => Some(Width::Bit13),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Width::Bit9 => 9,
            Width::Bit10 => 10,
            Width::Bit11 => 11,
            Width::Bit12 => 12,
            Width::Bit13 => 13,
        }
    }

    /// largest raw sample at this width
    pub(crate) fn max_reading(self) -> u32 {
        (1 << self.bits()) - 1
    }
}

impl From<Width> for adc_bitwidth_t {
    fn from(width: Width) -> Self {
        match width {
            Width::Bit9 => adc_bitwidth_t_ADC_BITWIDTH_9,
            Width::Bit10 => adc_bitwidth_t_ADC_BITWIDTH_10,
            Width::Bit11 => adc_bitwidth_t_ADC_BITWIDTH_11,
            Width::Bit12 => adc_bitwidth_t_ADC_BITWIDTH_12,
            Width::Bit13 => adc_bitwidth_t_ADC_BITWIDTH_13,
        }
    }
}

/// ADC settings as they appear in the system config. Zero means
/// "keep the built-in default" for both fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Config {
    /// reference voltage in mV for the uncalibrated fallback conversion
    #[serde(default)]
    pub vref_mv: u32,

    /// sample width in bits; out-of-range values are ignored with a warning
    #[serde(default)]
    pub width: u8,
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_from_bits_bounds() {
        assert_eq!(Width::from_bits(8), None);
        assert_eq!(Width::from_bits(9), Some(Width::Bit9));
        assert_eq!(Width::from_bits(13), Some(Width::Bit13));
        assert_eq!(Width::from_bits(14), None);
        assert_eq!(Width::from_bits(0), None);
    }

    #[test]
    fn max_reading_matches_width() {
        assert_eq!(Width::Bit12.max_reading(), 4095);
        assert_eq!(Width::Bit13.max_reading(), 8191);
        assert_eq!(Width::Bit9.max_reading(), 511);
    }

    #[test]
    fn config_json_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.vref_mv, 0);
        assert_eq!(cfg.width, 0);

        let cfg = Config::from_json(r#"{"vref_mv": 1050}"#).unwrap();
        assert_eq!(cfg.vref_mv, 1050);
        assert_eq!(cfg.width, 0);
    }
}
