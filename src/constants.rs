/// Physical and numerical constants used in ballistics calculations.
///
/// The integrator works internally in imperial units (feet, feet per second,
/// grains) because the reference drag tables are scaled for them.

/// Gravitational acceleration in ft/s² (negative: points down)
pub const GRAVITY_FPS2: f64 = -32.17405;

/// Drag coefficient to deceleration conversion constant
///
/// Converts a reference-table drag coefficient into a retardation factor:
/// `decel = cd * DRAG_DECELERATION_FACTOR / bc * v²` with `v` in ft/s and
/// the ballistic coefficient in lb/in².
///
/// Physical meaning: `ρ₀ · π / (8 · 144)` for the standard air density
/// `ρ₀ = 0.076474 lb/ft³`, i.e. the cross-section/mass scaling of a projectile
/// with sectional density 1 lb/in².
pub const DRAG_DECELERATION_FACTOR: f64 = 2.08551e-4;

/// Reference constant for form-factor coefficients
///
/// A custom drag function declared as a form factor `i` flies like a
/// projectile with ballistic coefficient `i / FORM_FACTOR_REFERENCE`.
///
/// Empirical calibration, not derived from the projectile's dimensions:
/// it reproduces measured custom-drag trajectories with the drag scale
/// above and carries no physical unit of its own.
pub const FORM_FACTOR_REFERENCE: f64 = 0.105;

/// Conversion factor: grains per pound
pub const GRAINS_PER_POUND: f64 = 7000.0;

/// Kinetic energy divisor: `E[ft·lb] = w[gr] · v[ft/s]² / ENERGY_DIVISOR`
///
/// Equals `2 · |g| · GRAINS_PER_POUND` (450 436.7) truncated to whole units.
pub const ENERGY_DIVISOR: f64 = 450_436.0;

/// Optimal game weight scale: `OGW[lb] = w[gr]² · v[ft/s]³ · OGW_FACTOR`
pub const OGW_FACTOR: f64 = 1.5e-12;

// Atmosphere constants (imperial, ICAO)

/// Standard air density at sea level (lb/ft³)
pub const STANDARD_DENSITY_LB_FT3: f64 = 0.076474;

/// ICAO standard temperature at sea level (°R)
pub const ICAO_STANDARD_TEMPERATURE_R: f64 = 518.67;

/// Offset between Rankine and Fahrenheit
pub const ICAO_FREEZING_POINT_R: f64 = 459.67;

/// Temperature lapse rate (°F per ft)
pub const TEMPERATURE_GRADIENT_F_PER_FT: f64 = -3.56616e-3;

/// ICAO standard relative humidity
pub const ICAO_STANDARD_HUMIDITY: f64 = 0.0;

/// Barometric pressure exponent for the troposphere
pub const PRESSURE_EXPONENT: f64 = -5.255876;

/// Speed of sound factor: `c[ft/s] = sqrt(T[°R]) · SPEED_OF_SOUND_FACTOR`
pub const SPEED_OF_SOUND_FACTOR: f64 = 49.0223;

/// Standard sea-level pressure (inHg)
pub const STANDARD_PRESSURE_INHG: f64 = 29.92;

/// Default station pressure used by `Atmosphere::default` (inHg)
pub const DEFAULT_PRESSURE_INHG: f64 = 29.95;

/// Default station temperature used by `Atmosphere::default` (°F)
pub const DEFAULT_TEMPERATURE_F: f64 = 59.0;

/// Default relative humidity used by `Atmosphere::default` (fraction)
pub const DEFAULT_HUMIDITY: f64 = 0.78;

/// Saturated vapour pressure polynomial coefficients (°F → inHg)
pub const VAPOR_PRESSURE_COEFFICIENTS: [f64; 5] =
    [1.24871, 0.0988438, 0.00152907, -3.07031e-06, 4.21329e-07];

/// Scale applied to the vapour pressure polynomial
pub const VAPOR_PRESSURE_SCALE: f64 = 0.01;

/// Station values are reused within this altitude band (ft)
pub const ATMOSPHERE_REUSE_BAND_FT: f64 = 30.0;

// Integration constants

/// Default integration step measured along the flight path (ft)
pub const DEFAULT_CALCULATION_STEP_FT: f64 = 0.1;

/// Below this speed the bullet is no longer considered in stable flight (ft/s)
pub const MINIMUM_VELOCITY_FPS: f64 = 50.0;

/// Integration stops once the bullet falls this far below the bore line (ft)
pub const MAXIMUM_DROP_FT: f64 = -15_000.0;

/// Default step-count safety bound for a single integration run
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

/// Zero solver miss tolerance at the zero distance (ft)
pub const ZERO_FINDING_ACCURACY_FT: f64 = 5e-6;

/// Zero solver iteration cap
pub const ZERO_MAX_ITERATIONS: usize = 20;
