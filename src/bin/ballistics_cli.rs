use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use exterior_ballistics::units::{
    Angular, AngularUnit, Distance, DistanceUnit, EnergyUnit, Pressure, PressureUnit, Temperature,
    TemperatureUnit, Velocity, VelocityUnit, Weight, WeightUnit,
};
use exterior_ballistics::{
    load_scenario, Ammunition, Atmosphere, BallisticCoefficient, BallisticsError, DragModel,
    Projectile, ShotParameters, TrajectoryCalculator, TrajectoryPoint, Weapon, WindInfo,
};

#[derive(Parser)]
#[command(name = "ballistics-cli")]
#[command(author = "Ballistics Engine Team")]
#[command(version)]
#[command(about = "Exterior ballistics trajectory and sight-zero calculator", long_about = None)]
struct Cli {
    /// Unit system for inputs and outputs
    #[arg(short = 'u', long, global = true, value_enum, default_value = "imperial")]
    units: UnitSystem,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Unit for sight angle and drop/windage adjustments
    #[arg(long, global = true, value_enum, default_value = "moa")]
    adjustment: AdjustmentUnit,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the sight angle for a zero distance
    Zero {
        #[command(flatten)]
        load: LoadArgs,

        #[command(flatten)]
        atmosphere: AtmosphereArgs,
    },

    /// Calculate a range card
    Trajectory {
        #[command(flatten)]
        load: LoadArgs,

        #[command(flatten)]
        atmosphere: AtmosphereArgs,

        /// Maximum range (yards or meters)
        #[arg(long, default_value = "1000")]
        max_range: f64,

        /// Range card step (yards or meters)
        #[arg(long, default_value = "100")]
        step: f64,

        /// Sight angle in the adjustment unit; solved from the zero when omitted
        #[arg(long, allow_hyphen_values = true)]
        sight_angle: Option<f64>,

        /// Line of sight inclination (degrees, uphill positive)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        shot_angle: f64,

        /// Weapon cant (degrees)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        cant: f64,

        /// Wind speed (mph or m/s)
        #[arg(long, default_value = "0")]
        wind_speed: f64,

        /// Wind direction (degrees, 0 = tailwind, 90 = from the left)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        wind_direction: f64,

        /// Integration step (inches or centimeters)
        #[arg(long)]
        calculation_step: Option<f64>,
    },

    /// Run a TOML scenario file
    Scenario {
        /// Path to the scenario file
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Muzzle velocity (fps or m/s)
    #[arg(short = 'v', long)]
    velocity: f64,

    /// Ballistic coefficient
    #[arg(short = 'b', long)]
    bc: f64,

    /// Drag model (G1, G2, G5, G6, G7, G8, GI, GS)
    #[arg(long, default_value = "G1", value_parser = parse_drag_model)]
    drag_model: DragModel,

    /// Bullet weight (grains or grams)
    #[arg(short = 'm', long)]
    weight: f64,

    /// Sight height above bore (inches or centimeters) [default: 1.5 in / 3.8 cm]
    #[arg(long)]
    sight_height: Option<f64>,

    /// Zero distance (yards or meters)
    #[arg(long, default_value = "100")]
    zero_distance: f64,
}

#[derive(Args, Debug)]
struct AtmosphereArgs {
    /// Station altitude (feet or meters)
    #[arg(long, allow_hyphen_values = true)]
    altitude: Option<f64>,

    /// Station pressure (inHg or hPa)
    #[arg(long)]
    pressure: Option<f64>,

    /// Temperature (°F or °C)
    #[arg(long, allow_hyphen_values = true)]
    temperature: Option<f64>,

    /// Relative humidity in percent (0-100)
    #[arg(long)]
    humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitSystem {
    Imperial,
    Metric,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AdjustmentUnit {
    Moa,
    Mil,
    Mrad,
    Deg,
}

impl AdjustmentUnit {
    fn angular(self) -> AngularUnit {
        match self {
            AdjustmentUnit::Moa => AngularUnit::Moa,
            AdjustmentUnit::Mil => AngularUnit::Mil,
            AdjustmentUnit::Mrad => AngularUnit::Mrad,
            AdjustmentUnit::Deg => AngularUnit::Degree,
        }
    }
}

impl UnitSystem {
    fn range(self) -> DistanceUnit {
        match self {
            UnitSystem::Imperial => DistanceUnit::Yard,
            UnitSystem::Metric => DistanceUnit::Meter,
        }
    }

    fn offset(self) -> DistanceUnit {
        match self {
            UnitSystem::Imperial => DistanceUnit::Inch,
            UnitSystem::Metric => DistanceUnit::Centimeter,
        }
    }

    fn altitude(self) -> DistanceUnit {
        match self {
            UnitSystem::Imperial => DistanceUnit::Foot,
            UnitSystem::Metric => DistanceUnit::Meter,
        }
    }

    fn velocity(self) -> VelocityUnit {
        match self {
            UnitSystem::Imperial => VelocityUnit::Fps,
            UnitSystem::Metric => VelocityUnit::Mps,
        }
    }

    fn wind(self) -> VelocityUnit {
        match self {
            UnitSystem::Imperial => VelocityUnit::Mph,
            UnitSystem::Metric => VelocityUnit::Mps,
        }
    }

    fn weight(self) -> WeightUnit {
        match self {
            UnitSystem::Imperial => WeightUnit::Grain,
            UnitSystem::Metric => WeightUnit::Gram,
        }
    }

    fn game_weight(self) -> WeightUnit {
        match self {
            UnitSystem::Imperial => WeightUnit::Pound,
            UnitSystem::Metric => WeightUnit::Kilogram,
        }
    }

    fn energy(self) -> EnergyUnit {
        match self {
            UnitSystem::Imperial => EnergyUnit::FootPound,
            UnitSystem::Metric => EnergyUnit::Joule,
        }
    }

    fn temperature(self) -> TemperatureUnit {
        match self {
            UnitSystem::Imperial => TemperatureUnit::Fahrenheit,
            UnitSystem::Metric => TemperatureUnit::Celsius,
        }
    }

    fn pressure(self) -> PressureUnit {
        match self {
            UnitSystem::Imperial => PressureUnit::InHg,
            UnitSystem::Metric => PressureUnit::HPa,
        }
    }

    fn default_sight_height(self) -> f64 {
        match self {
            UnitSystem::Imperial => 1.5,
            UnitSystem::Metric => 3.8,
        }
    }
}

fn parse_drag_model(s: &str) -> Result<DragModel, BallisticsError> {
    s.parse()
}

/// Range card row in the selected unit system
#[derive(Debug, Serialize)]
struct RangeCardRow {
    range: f64,
    time: f64,
    velocity: f64,
    mach: f64,
    drop: f64,
    drop_adjustment: f64,
    windage: f64,
    windage_adjustment: f64,
    energy: f64,
    optimal_game_weight: f64,
}

impl RangeCardRow {
    fn new(point: &TrajectoryPoint, units: UnitSystem, adjustment: AngularUnit) -> Self {
        Self {
            range: point.distance().get_in(units.range()),
            time: point.time(),
            velocity: point.velocity().get_in(units.velocity()),
            mach: point.mach(),
            drop: point.drop().get_in(units.offset()),
            drop_adjustment: point.drop_adjustment_in(adjustment),
            windage: point.windage().get_in(units.offset()),
            windage_adjustment: point.windage_adjustment_in(adjustment),
            energy: point.energy().get_in(units.energy()),
            optimal_game_weight: point.optimal_game_weight().get_in(units.game_weight()),
        }
    }
}

#[derive(Debug, Serialize)]
struct RangeCard {
    units: &'static str,
    adjustment_unit: &'static str,
    sight_angle: f64,
    points: Vec<RangeCardRow>,
}

#[derive(Debug, Serialize)]
struct ZeroResult {
    sight_angle: f64,
    adjustment_unit: &'static str,
    sight_angle_rad: f64,
}

struct OutputOptions {
    units: UnitSystem,
    format: OutputFormat,
    adjustment: AngularUnit,
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let options = OutputOptions {
        units: cli.units,
        format: cli.output,
        adjustment: cli.adjustment.angular(),
    };

    match cli.command {
        Commands::Zero { load, atmosphere } => {
            let (ammo, weapon) = build_load(&load, cli.units)?;
            let atmosphere = build_atmosphere(&atmosphere, cli.units)?;
            let angle = TrajectoryCalculator::new().sight_angle(&ammo, &weapon, &atmosphere)?;
            display_zero(angle, &options)?;
        }

        Commands::Trajectory {
            load,
            atmosphere,
            max_range,
            step,
            sight_angle,
            shot_angle,
            cant,
            wind_speed,
            wind_direction,
            calculation_step,
        } => {
            let (ammo, weapon) = build_load(&load, cli.units)?;
            let atmosphere = build_atmosphere(&atmosphere, cli.units)?;

            let mut calculator = TrajectoryCalculator::new();
            if let Some(step) = calculation_step {
                calculator = calculator.with_calculation_step(Distance::new(step, cli.units.offset()));
            }

            let sight_angle = match sight_angle {
                Some(value) => Angular::new(value, options.adjustment),
                None => calculator.sight_angle(&ammo, &weapon, &atmosphere)?,
            };
            let shot = ShotParameters::new(
                sight_angle,
                Distance::new(max_range, cli.units.range()),
                Distance::new(step, cli.units.range()),
            )?
            .with_shot_angle(Angular::degrees(shot_angle))?
            .with_cant_angle(Angular::degrees(cant))?;

            let winds = if wind_speed != 0.0 {
                vec![WindInfo::new(
                    Velocity::new(wind_speed, cli.units.wind()),
                    Angular::degrees(wind_direction),
                )]
            } else {
                Vec::new()
            };

            let points = calculator.trajectory(&ammo, &weapon, &atmosphere, &shot, &winds)?;
            display_range_card(sight_angle, &points, &options)?;
        }

        Commands::Scenario { file } => {
            let scenario = load_scenario(&file)?;
            let outcome = scenario.run(&TrajectoryCalculator::new())?;
            display_range_card(outcome.sight_angle, &outcome.points, &options)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // Diagnostics go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_load(load: &LoadArgs, units: UnitSystem) -> Result<(Ammunition, Weapon), BallisticsError> {
    let bc = BallisticCoefficient::new(load.bc, load.drag_model)?;
    let projectile = Projectile::new(bc, Weight::new(load.weight, units.weight()))?;
    let ammo = Ammunition::new(projectile, Velocity::new(load.velocity, units.velocity()))?;
    let sight_height = load.sight_height.unwrap_or_else(|| units.default_sight_height());
    let weapon = Weapon::with_zero_distance(
        Distance::new(sight_height, units.offset()),
        Distance::new(load.zero_distance, units.range()),
    )?;
    Ok((ammo, weapon))
}

fn build_atmosphere(args: &AtmosphereArgs, units: UnitSystem) -> Result<Atmosphere, BallisticsError> {
    let defaults = Atmosphere::default();
    if let Some(humidity) = args.humidity {
        if !(0.0..=100.0).contains(&humidity) {
            return Err(BallisticsError::InvalidConfiguration(format!(
                "humidity must be a percentage between 0 and 100, got {humidity}"
            )));
        }
    }
    if args.altitude.is_none() && args.pressure.is_none() && args.temperature.is_none() && args.humidity.is_none() {
        return Ok(defaults);
    }
    Atmosphere::new(
        args.altitude
            .map_or(defaults.altitude(), |v| Distance::new(v, units.altitude())),
        args.pressure
            .map_or(defaults.pressure(), |v| Pressure::new(v, units.pressure())),
        args.temperature
            .map_or(defaults.temperature(), |v| Temperature::new(v, units.temperature())),
        args.humidity.map_or(defaults.humidity(), |h| h / 100.0),
    )
}

fn unit_system_name(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Imperial => "imperial",
        UnitSystem::Metric => "metric",
    }
}

fn display_zero(angle: Angular, options: &OutputOptions) -> Result<(), Box<dyn Error>> {
    let result = ZeroResult {
        sight_angle: angle.get_in(options.adjustment),
        adjustment_unit: options.adjustment.symbol(),
        sight_angle_rad: angle.get_in(AngularUnit::Radian),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match options.format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.serialize(&result)?;
            writer.flush()?;
        }
        OutputFormat::Table => {
            writeln!(out, "╔════════════════════════════════════════╗")?;
            writeln!(out, "║             SIGHT ZERO                 ║")?;
            writeln!(out, "╠════════════════════════════════════════╣")?;
            writeln!(out, "║ Sight angle:   {:>12.4} {:<11} ║", result.sight_angle, result.adjustment_unit)?;
            writeln!(out, "║ Sight angle:   {:>12.7} {:<11} ║", result.sight_angle_rad, "rad")?;
            writeln!(out, "╚════════════════════════════════════════╝")?;
        }
    }
    Ok(())
}

fn display_range_card(
    sight_angle: Angular,
    points: &[TrajectoryPoint],
    options: &OutputOptions,
) -> Result<(), Box<dyn Error>> {
    let rows: Vec<RangeCardRow> = points
        .iter()
        .map(|p| RangeCardRow::new(p, options.units, options.adjustment))
        .collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match options.format {
        OutputFormat::Json => {
            let card = RangeCard {
                units: unit_system_name(options.units),
                adjustment_unit: options.adjustment.symbol(),
                sight_angle: sight_angle.get_in(options.adjustment),
                points: rows,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&card)?)?;
        }

        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        OutputFormat::Table => {
            let units = options.units;
            let adj = options.adjustment.symbol();
            writeln!(
                out,
                "Sight angle: {:.3} {adj}",
                sight_angle.get_in(options.adjustment)
            )?;
            writeln!(out, "┌──────────┬──────────┬──────────┬────────┬──────────┬──────────┬──────────┬──────────┬──────────┐")?;
            writeln!(
                out,
                "│ {:>8} │ {:>8} │ {:>8} │ {:>6} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │",
                format!("Rng {}", units.range().symbol()),
                "Time s",
                format!("V {}", units.velocity().symbol()),
                "Mach",
                format!("Drop {}", units.offset().symbol()),
                format!("Drop {adj}"),
                format!("Wind {}", units.offset().symbol()),
                format!("Wind {adj}"),
                format!("E {}", units.energy().symbol()),
            )?;
            writeln!(out, "├──────────┼──────────┼──────────┼────────┼──────────┼──────────┼──────────┼──────────┼──────────┤")?;
            for row in &rows {
                writeln!(
                    out,
                    "│ {:>8.1} │ {:>8.3} │ {:>8.1} │ {:>6.3} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>8.1} │",
                    row.range,
                    row.time,
                    row.velocity,
                    row.mach,
                    row.drop,
                    row.drop_adjustment,
                    row.windage,
                    row.windage_adjustment,
                    row.energy,
                )?;
            }
            writeln!(out, "└──────────┴──────────┴──────────┴────────┴──────────┴──────────┴──────────┴──────────┴──────────┘")?;
        }
    }
    Ok(())
}
