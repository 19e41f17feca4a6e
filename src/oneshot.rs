use std::ptr::null_mut;

use esp_idf_sys::*;

/// Owned handle to the oneshot ADC driver for one unit. The driver allows
/// a single live handle per unit, so [crate::Adc] hands out clones of an
/// `Arc<OneshotUnit>` instead of creating one per channel.
pub(crate) struct OneshotUnit {
    handle: adc_oneshot_unit_handle_t,
}

impl OneshotUnit {
    pub fn new(unit_id: adc_unit_t) -> Result<Self, EspError> {
        let config = adc_oneshot_unit_init_cfg_t {
            unit_id,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = null_mut();
        esp!(unsafe { adc_oneshot_new_unit(&config, &mut handle) })?;
        Ok(Self { handle })
    }

    pub fn config_channel(
        &self,
        chan: adc_channel_t,
        atten: adc_atten_t,
        bitwidth: adc_bitwidth_t,
    ) -> Result<(), EspError> {
        let config = adc_oneshot_chan_cfg_t { atten, bitwidth };
        esp!(unsafe { adc_oneshot_config_channel(self.handle, chan, &config) })
    }

    /// single blocking conversion
    pub fn read(&self, chan: adc_channel_t) -> Result<i32, EspError> {
        let mut raw: i32 = 0;
        esp!(unsafe { adc_oneshot_read(self.handle, chan, &mut raw) })?;
        Ok(raw)
    }
}

impl Drop for OneshotUnit {
    fn drop(&mut self) {
        unsafe { adc_oneshot_del_unit(self.handle) };
    }
}

unsafe impl Send for OneshotUnit {}

/// Calibration scheme for one (channel, attenuation, width) combination,
/// fitted from the factory efuse data.
pub(crate) struct CalScheme {
    #[cfg(not(any(esp32, esp32s2)))]
    handle: adc_cali_handle_t,
}

impl CalScheme {
    #[cfg(not(any(esp32, esp32s2)))]
    pub fn curve_fitting(
        unit_id: adc_unit_t,
        chan: adc_channel_t,
        atten: adc_atten_t,
        bitwidth: adc_bitwidth_t,
    ) -> Result<Self, EspError> {
        let config = adc_cali_curve_fitting_config_t {
            unit_id,
            chan,
            atten,
            bitwidth,
            ..Default::default()
        };
        let mut handle: adc_cali_handle_t = null_mut();
        esp!(unsafe { adc_cali_create_scheme_curve_fitting(&config, &mut handle) })?;
        Ok(Self { handle })
    }

    /// the original ESP32 and the S2 only ship the line-fitting scheme,
    /// which this crate does not use
    #[cfg(any(esp32, esp32s2))]
    pub fn curve_fitting(
        _unit_id: adc_unit_t,
        _chan: adc_channel_t,
        _atten: adc_atten_t,
        _bitwidth: adc_bitwidth_t,
    ) -> Result<Self, EspError> {
        Err(EspError::from_infallible::<ESP_ERR_NOT_SUPPORTED>())
    }

    #[cfg(not(any(esp32, esp32s2)))]
    pub fn raw_to_voltage(&self, raw: i32) -> Result<i32, EspError> {
        let mut mv: i32 = 0;
        esp!(unsafe { adc_cali_raw_to_voltage(self.handle, raw, &mut mv) })?;
        Ok(mv)
    }

    /// unreachable on these chips since `curve_fitting` never constructs one
    #[cfg(any(esp32, esp32s2))]
    pub fn raw_to_voltage(&self, _raw: i32) -> Result<i32, EspError> {
        Err(EspError::from_infallible::<ESP_ERR_NOT_SUPPORTED>())
    }
}

impl Drop for CalScheme {
    fn drop(&mut self) {
        #[cfg(not(any(esp32, esp32s2)))]
        unsafe {
            adc_cali_delete_scheme_curve_fitting(self.handle)
        };
    }
}

unsafe impl Send for CalScheme {}
