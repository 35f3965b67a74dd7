//! Unit-carrying quantities that cross crate boundaries.
//!
//! Hot loops (friction factor, Newton residuals) work on plain `f64` in
//! m³/h and metres; geometry, fluid properties and power keep their units.

use uom::si::f64::{
    DiffusionCoefficient as UomKinematicViscosity, Length as UomLength,
    MassDensity as UomMassDensity, Power as UomPower,
};

pub type Density = UomMassDensity;
/// m²/s; uom files kinematic viscosity under diffusion coefficient.
pub type KinVisc = UomKinematicViscosity;
pub type Length = UomLength;
pub type Power = UomPower;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn m2ps(v: f64) -> KinVisc {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    KinVisc::new::<square_meter_per_second>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

/// Read a length back in millimetres.
#[inline]
pub fn to_mm(l: Length) -> f64 {
    use uom::si::length::millimeter;
    l.get::<millimeter>()
}

/// Read a power back in kilowatts.
#[inline]
pub fn to_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

pub mod constants {
    /// Gravitational acceleration used by every head and power calculation.
    pub const G_MPS2: f64 = 9.81;

    /// Seconds per hour, for m³/h <-> m³/s.
    pub const S_PER_H: f64 = 3600.0;
}
