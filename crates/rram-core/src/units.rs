// rram-core/src/units.rs

use uom::si::f64::{
    ElectricCurrent as UomElectricCurrent, Length as UomLength,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Current = UomElectricCurrent;
pub type Length = UomLength;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn nm(v: f64) -> Length {
    use uom::si::length::nanometer;
    Length::new::<nanometer>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn ns(v: f64) -> Time {
    use uom::si::time::nanosecond;
    Time::new::<nanosecond>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

/// Raw SI magnitudes, for the f64 hot loop.
#[inline]
pub fn length_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn temperature_k(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn time_s(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn current_a(i: Current) -> f64 {
    use uom::si::electric_current::ampere;
    i.get::<ampere>()
}

pub mod constants {
    /// Boltzmann constant (J/K), as used by the published model card.
    pub const KB_J_PER_K: f64 = 1.380_650_3e-23;
    /// Elementary charge (C), as used by the published model card.
    pub const Q_C: f64 = 1.6e-19;
    /// Reference length for the gamma power law.
    pub const NANOMETER_M: f64 = 1e-9;
    /// 25 degC in kelvin, with the model card's 273 offset.
    pub const ROOM_TEMPERATURE_K: f64 = 273.0 + 25.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0e-10);
        let _t = k(300.0);
        let _dt = s(1e-9);
        let _i = amps(1e-3);
    }

    #[test]
    fn nanometer_and_nanosecond_scale() {
        assert!((length_m(nm(1.7)) - 1.7e-9).abs() < 1e-24);
        assert!((time_s(ns(1.0)) - 1e-9).abs() < 1e-24);
    }

    #[test]
    fn raw_magnitudes_round_trip() {
        assert_eq!(temperature_k(k(298.0)), 298.0);
        assert_eq!(current_a(amps(0.5)), 0.5);
    }
}
