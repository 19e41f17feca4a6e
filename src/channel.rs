use std::sync::Arc;

use crate::config::Attenuation;
use crate::oneshot::{CalScheme, OneshotUnit};

/// capacity of the channel table
pub(crate) const MAX_CHANNELS: usize = 8;

/// number of entries in the default pin map
const MAPPED_PINS: usize = 5;

/// Per-pin descriptor: the pin → channel mapping, the current attenuation,
/// and the driver handles once the pin has been enabled.
pub(crate) struct ChannelInfo {
    pub pin: i32,
    /// channel index on ADC1, cast to `adc_channel_t` at the driver boundary
    pub channel: u8,
    pub atten: Attenuation,
    pub unit: Option<Arc<OneshotUnit>>,
    pub cal: Option<CalScheme>,
}

impl ChannelInfo {
    fn unconfigured(pin: i32, channel: u8) -> Self {
        Self {
            pin,
            channel,
            atten: Attenuation::default(),
            unit: None,
            cal: None,
        }
    }
}

/// GPIO0..4 sit on ADC1 channel 0..4 (the ESP32-C3 arrangement)
pub(crate) fn default_table() -> [Option<ChannelInfo>; MAX_CHANNELS] {
    std::array::from_fn(|i| {
        (i < MAPPED_PINS).then(|| ChannelInfo::unconfigured(i as i32, i as u8))
    })
}

pub(crate) fn lookup(
    table: &mut [Option<ChannelInfo>],
    pin: i32,
) -> Option<&mut ChannelInfo> {
    table.iter_mut().flatten().find(|ci| ci.pin == pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_maps_gpio_to_same_channel() {
        let mut table = default_table();
        assert_eq!(table.iter().flatten().count(), MAPPED_PINS);
        for pin in 0..MAPPED_PINS as i32 {
            let ci = lookup(&mut table, pin).unwrap();
            assert_eq!(ci.channel as i32, pin);
            assert!(ci.unit.is_none());
            assert!(ci.cal.is_none());
        }
    }

    #[test]
    fn lookup_unmapped_pin() {
        let mut table = default_table();
        assert!(lookup(&mut table, 5).is_none());
        assert!(lookup(&mut table, -1).is_none());
    }
}
