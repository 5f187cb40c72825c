//! Power Sensor Drivers
//!
//! Register-level drivers for the two current-monitor chip families found
//! on the board, behind one capability surface (bus voltage, current,
//! power). Which chip answers a channel address is decided by a boot-time
//! presence probe, not at compile time: channel 1 has shipped with either
//! family across board revisions.
//!
//! Generic over [`embedded_hal_async::i2c::I2c`], so the drivers work on
//! any shared-bus device wrapper.

use embedded_hal_async::i2c::I2c;

/// Sensor access failure; callers keep the previous reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorError;

const REG_CONFIG: u8 = 0x00;
const REG_BUS_VOLTAGE: u8 = 0x02;
const REG_POWER: u8 = 0x03;
const REG_CURRENT: u8 = 0x04;
const REG_CALIBRATION: u8 = 0x05;

// INA219, fixed 32 V / 2 A calibration (Adafruit breakout wiring):
// 12-bit conversions, /8 shunt gain, continuous shunt+bus mode.
const INA219_CONFIG: u16 = 0x399F;
const INA219_CALIBRATION: u16 = 4096;
const INA219_CURRENT_LSB_MA: f32 = 0.1;
const INA219_POWER_LSB_MW: f32 = 2.0;
const INA219_BUS_LSB_V: f32 = 0.004;

// INA226: 16-sample averaging, 1.1 ms conversions, continuous shunt+bus.
const INA226_CONFIG: u16 = 0x4527;
const INA226_REG_MANUFACTURER_ID: u8 = 0xFE;
const INA226_REG_DIE_ID: u8 = 0xFF;
const INA226_MANUFACTURER_TI: u16 = 0x5449;
const INA226_DIE_INA226: u16 = 0x2260;
const INA226_BUS_LSB_V: f32 = 0.00125;

/// Full-scale current the INA226 calibration is scaled for (A)
const MAX_EXPECTED_CURRENT_A: f32 = 10.0;

/// Bus voltage register to volts, INA219 (13-bit value, 4 mV/bit)
pub fn ina219_bus_voltage_v(raw: u16) -> f32 {
    ((raw >> 3) as f32) * INA219_BUS_LSB_V
}

/// Bus voltage register to volts, INA226 (1.25 mV/bit)
pub fn ina226_bus_voltage_v(raw: u16) -> f32 {
    raw as f32 * INA226_BUS_LSB_V
}

/// Current register LSB in mA for a given full-scale current
pub fn ina226_current_lsb_ma(max_current_a: f32) -> f32 {
    max_current_a / 32768.0 * 1000.0
}

/// Calibration register value for shunt resistance and current LSB
pub fn ina226_calibration(shunt_ohms: f32, current_lsb_ma: f32) -> u16 {
    (0.00512 / (current_lsb_ma / 1000.0 * shunt_ohms)) as u16
}

async fn read_u16<I2C: I2c>(i2c: &mut I2C, address: u8, register: u8) -> Result<u16, SensorError> {
    let mut bytes = [0u8; 2];
    i2c.write_read(address, &[register], &mut bytes)
        .await
        .map_err(|_| SensorError)?;
    Ok(u16::from_be_bytes(bytes))
}

async fn write_u16<I2C: I2c>(
    i2c: &mut I2C,
    address: u8,
    register: u8,
    value: u16,
) -> Result<(), SensorError> {
    let bytes = value.to_be_bytes();
    i2c.write(address, &[register, bytes[0], bytes[1]])
        .await
        .map_err(|_| SensorError)
}

/// INA219 in its fixed 32 V / 2 A configuration
pub struct Ina219<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ina219<I2C> {
    pub async fn new(mut i2c: I2C, address: u8) -> Result<Self, SensorError> {
        write_u16(&mut i2c, address, REG_CONFIG, INA219_CONFIG).await?;
        write_u16(&mut i2c, address, REG_CALIBRATION, INA219_CALIBRATION).await?;
        Ok(Self { i2c, address })
    }

    pub async fn bus_voltage_v(&mut self) -> Result<f32, SensorError> {
        Ok(ina219_bus_voltage_v(
            read_u16(&mut self.i2c, self.address, REG_BUS_VOLTAGE).await?,
        ))
    }

    pub async fn current_ma(&mut self) -> Result<f32, SensorError> {
        let raw = read_u16(&mut self.i2c, self.address, REG_CURRENT).await? as i16;
        Ok(raw as f32 * INA219_CURRENT_LSB_MA)
    }

    pub async fn power_mw(&mut self) -> Result<f32, SensorError> {
        let raw = read_u16(&mut self.i2c, self.address, REG_POWER).await?;
        Ok(raw as f32 * INA219_POWER_LSB_MW)
    }
}

/// INA226 calibrated for the channel's shunt resistor
pub struct Ina226<I2C> {
    i2c: I2C,
    address: u8,
    current_lsb_ma: f32,
}

impl<I2C: I2c> Ina226<I2C> {
    pub async fn new(mut i2c: I2C, address: u8, shunt_ohms: f32) -> Result<Self, SensorError> {
        let current_lsb_ma = ina226_current_lsb_ma(MAX_EXPECTED_CURRENT_A);
        write_u16(&mut i2c, address, REG_CONFIG, INA226_CONFIG).await?;
        write_u16(
            &mut i2c,
            address,
            REG_CALIBRATION,
            ina226_calibration(shunt_ohms, current_lsb_ma),
        )
        .await?;
        Ok(Self {
            i2c,
            address,
            current_lsb_ma,
        })
    }

    pub async fn bus_voltage_v(&mut self) -> Result<f32, SensorError> {
        Ok(ina226_bus_voltage_v(
            read_u16(&mut self.i2c, self.address, REG_BUS_VOLTAGE).await?,
        ))
    }

    pub async fn current_ma(&mut self) -> Result<f32, SensorError> {
        let raw = read_u16(&mut self.i2c, self.address, REG_CURRENT).await? as i16;
        Ok(raw as f32 * self.current_lsb_ma)
    }

    pub async fn power_mw(&mut self) -> Result<f32, SensorError> {
        // power LSB is 25x the current LSB
        let raw = read_u16(&mut self.i2c, self.address, REG_POWER).await?;
        Ok(raw as f32 * 25.0 * self.current_lsb_ma)
    }
}

/// Either chip family behind the one capability surface
pub enum AnyPowerSensor<I2C> {
    Ina219(Ina219<I2C>),
    Ina226(Ina226<I2C>),
}

impl<I2C: I2c> AnyPowerSensor<I2C> {
    /// Boot-time presence probe and chip identification
    ///
    /// `None` means nothing acknowledged the address; the channel stays
    /// offline for the process lifetime.
    pub async fn detect(mut i2c: I2C, address: u8, shunt_ohms: f32) -> Option<Self> {
        let manufacturer = read_u16(&mut i2c, address, INA226_REG_MANUFACTURER_ID)
            .await
            .ok()?;
        let die = read_u16(&mut i2c, address, INA226_REG_DIE_ID).await.ok()?;
        if manufacturer == INA226_MANUFACTURER_TI && die == INA226_DIE_INA226 {
            Ina226::new(i2c, address, shunt_ohms)
                .await
                .ok()
                .map(Self::Ina226)
        } else {
            Ina219::new(i2c, address).await.ok().map(Self::Ina219)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ina219(_) => "INA219",
            Self::Ina226(_) => "INA226",
        }
    }

    pub async fn bus_voltage_v(&mut self) -> Result<f32, SensorError> {
        match self {
            Self::Ina219(sensor) => sensor.bus_voltage_v().await,
            Self::Ina226(sensor) => sensor.bus_voltage_v().await,
        }
    }

    pub async fn current_ma(&mut self) -> Result<f32, SensorError> {
        match self {
            Self::Ina219(sensor) => sensor.current_ma().await,
            Self::Ina226(sensor) => sensor.current_ma().await,
        }
    }

    pub async fn power_mw(&mut self) -> Result<f32, SensorError> {
        match self {
            Self::Ina219(sensor) => sensor.power_mw().await,
            Self::Ina226(sensor) => sensor.power_mw().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ina219_bus_voltage_conversion() {
        // 13-bit value in bits 15..3, 4 mV per bit
        assert_eq!(ina219_bus_voltage_v(1000 << 3), 4.0);
        assert_eq!(ina219_bus_voltage_v(0), 0.0);
    }

    #[test]
    fn ina226_bus_voltage_conversion() {
        assert_eq!(ina226_bus_voltage_v(1000), 1.25);
    }

    #[test]
    fn ina226_calibration_for_ten_amps_ten_milliohms() {
        let lsb = ina226_current_lsb_ma(10.0);
        assert!((lsb - 0.3052).abs() < 1e-3);
        assert_eq!(ina226_calibration(0.01, lsb), 1677);
    }
}
