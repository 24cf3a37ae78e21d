//! End-to-end trajectories checked against published reference values.

use approx::assert_abs_diff_eq;
use exterior_ballistics::units::{
    Angular, AngularUnit, Distance, DistanceUnit, EnergyUnit, Velocity, VelocityUnit, Weight,
    WeightUnit,
};
use exterior_ballistics::{
    Ammunition, Atmosphere, BallisticCoefficient, BallisticsError, CustomDragMode, DragCurve,
    DragModel, DragTable, Projectile, ShotParameters, TrajectoryCalculator, TrajectoryPoint,
    Weapon, WindInfo,
};

fn standard_ammo(bc: f64, model: DragModel, grains: f64, fps: f64) -> Ammunition {
    let bc = BallisticCoefficient::new(bc, model).unwrap();
    let projectile = Projectile::new(bc, Weight::grains(grains)).unwrap();
    Ammunition::new(projectile, Velocity::fps(fps)).unwrap()
}

fn rifle(sight_height_in: f64) -> Weapon {
    Weapon::with_zero_distance(Distance::inches(sight_height_in), Distance::yards(100.0)).unwrap()
}

#[test]
fn test_zero_g1() {
    let ammo = standard_ammo(0.365, DragModel::G1, 69.0, 2600.0);
    let angle = TrajectoryCalculator::new()
        .sight_angle(&ammo, &rifle(3.2), &Atmosphere::default())
        .unwrap();
    assert_abs_diff_eq!(angle.get_in(AngularUnit::Radian), 0.001651, epsilon = 1e-6);
}

#[test]
fn test_zero_g7() {
    let ammo = standard_ammo(0.223, DragModel::G7, 168.0, 2750.0);
    let angle = TrajectoryCalculator::new()
        .sight_angle(&ammo, &rifle(2.0), &Atmosphere::default())
        .unwrap();
    assert_abs_diff_eq!(angle.get_in(AngularUnit::Radian), 0.001228, epsilon = 1e-6);
}

fn g1_reference_path() -> Vec<TrajectoryPoint> {
    let ammo = standard_ammo(0.223, DragModel::G1, 168.0, 2750.0);
    let shot = ShotParameters::new(
        Angular::radians(0.001228),
        Distance::yards(1000.0),
        Distance::yards(100.0),
    )
    .unwrap();
    let wind = [WindInfo::new(Velocity::new(5.0, VelocityUnit::Mph), Angular::degrees(-45.0))];
    TrajectoryCalculator::new()
        .trajectory(&ammo, &rifle(2.0), &Atmosphere::default(), &shot, &wind)
        .unwrap()
}

/// One row of a published range card, imperial units
struct RangeCardRow {
    distance_yd: f64,
    velocity_fps: f64,
    mach: f64,
    energy_ftlb: f64,
    path_in: f64,
    hold_moa: f64,
    windage_in: f64,
    wind_adjustment_moa: f64,
    time_s: f64,
    ogw_lb: f64,
}

fn check_row(point: &TrajectoryPoint, row: &RangeCardRow) {
    let d = row.distance_yd;
    assert_abs_diff_eq!(point.distance().get_in(DistanceUnit::Yard), d, epsilon = 0.001);
    assert_abs_diff_eq!(point.velocity().get_in(VelocityUnit::Fps), row.velocity_fps, epsilon = 5.0);
    assert_abs_diff_eq!(point.mach(), row.mach, epsilon = 0.005);
    assert_abs_diff_eq!(point.energy().get_in(EnergyUnit::FootPound), row.energy_ftlb, epsilon = 5.0);
    assert_abs_diff_eq!(point.time(), row.time_s, epsilon = 0.06);
    assert_abs_diff_eq!(point.optimal_game_weight().get_in(WeightUnit::Pound), row.ogw_lb, epsilon = 1.0);

    // Drop and drift tolerances widen with range
    let path_tolerance = if d >= 800.0 {
        4.0
    } else if d >= 500.0 {
        1.0
    } else {
        0.5
    };
    let windage_tolerance = if d >= 800.0 {
        1.5
    } else if d >= 500.0 {
        1.0
    } else {
        0.5
    };
    assert_abs_diff_eq!(point.drop().get_in(DistanceUnit::Inch), row.path_in, epsilon = path_tolerance);
    assert_abs_diff_eq!(point.windage().get_in(DistanceUnit::Inch), row.windage_in, epsilon = windage_tolerance);

    if d > 1.0 {
        assert_abs_diff_eq!(point.drop_adjustment_in(AngularUnit::Moa), row.hold_moa, epsilon = 0.5);
        assert_abs_diff_eq!(
            point.windage_adjustment_in(AngularUnit::Moa),
            row.wind_adjustment_moa,
            epsilon = 0.5
        );
    }
}

#[test]
fn test_g1_path_with_wind() {
    let points = g1_reference_path();
    assert_eq!(points.len(), 11);

    let rows = [
        (0, RangeCardRow {
            distance_yd: 0.0,
            velocity_fps: 2750.0,
            mach: 2.463,
            energy_ftlb: 2820.6,
            path_in: -2.0,
            hold_moa: 0.0,
            windage_in: 0.0,
            wind_adjustment_moa: 0.0,
            time_s: 0.0,
            ogw_lb: 880.0,
        }),
        (1, RangeCardRow {
            distance_yd: 100.0,
            velocity_fps: 2351.2,
            mach: 2.106,
            energy_ftlb: 2061.0,
            path_in: 0.0,
            hold_moa: 0.0,
            windage_in: -0.6,
            wind_adjustment_moa: -0.6,
            time_s: 0.118,
            ogw_lb: 550.0,
        }),
        (5, RangeCardRow {
            distance_yd: 500.0,
            velocity_fps: 1169.1,
            mach: 1.047,
            energy_ftlb: 509.8,
            path_in: -87.9,
            hold_moa: -16.8,
            windage_in: -19.5,
            wind_adjustment_moa: -3.7,
            time_s: 0.857,
            ogw_lb: 67.0,
        }),
        (10, RangeCardRow {
            distance_yd: 1000.0,
            velocity_fps: 776.4,
            mach: 0.695,
            energy_ftlb: 224.9,
            path_in: -823.9,
            hold_moa: -78.7,
            windage_in: -87.5,
            wind_adjustment_moa: -8.4,
            time_s: 2.495,
            ogw_lb: 20.0,
        }),
    ];
    for (index, row) in &rows {
        check_row(&points[*index], row);
    }

    let muzzle = &points[0];
    assert_abs_diff_eq!(muzzle.velocity().get_in(VelocityUnit::Fps), 2750.0, epsilon = 1e-9);
    assert_abs_diff_eq!(muzzle.energy().get_in(EnergyUnit::FootPound), 2820.6, epsilon = 0.05);
    assert_abs_diff_eq!(muzzle.drop().get_in(DistanceUnit::Inch), -2.0, epsilon = 1e-9);
}

#[test]
fn test_path_is_deterministic() {
    let first = g1_reference_path();
    let second = g1_reference_path();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.time().to_bits(), b.time().to_bits());
        assert_eq!(a.drop().value().to_bits(), b.drop().value().to_bits());
        assert_eq!(a.windage().value().to_bits(), b.windage().value().to_bits());
        assert_eq!(a.velocity().value().to_bits(), b.velocity().value().to_bits());
    }
}

#[test]
fn test_drop_grows_monotonically_past_the_zero() {
    let points = g1_reference_path();
    for pair in points[2..].windows(2) {
        assert!(pair[1].drop().value() < pair[0].drop().value());
        assert!(pair[1].velocity().value() < pair[0].velocity().value());
        assert!(pair[1].time() > pair[0].time());
    }
}

fn check_metric(point: &TrajectoryPoint, distance_m: f64, drop_cm: f64, velocity_mps: f64, time_s: f64) {
    assert_abs_diff_eq!(point.distance().get_in(DistanceUnit::Meter), distance_m, epsilon = 0.1);
    // Within a third of a MOA
    let tolerance = Angular::moa(0.3).get_in(AngularUnit::CmPer100M) * distance_m / 100.0;
    assert_abs_diff_eq!(point.drop().get_in(DistanceUnit::Centimeter), drop_cm, epsilon = tolerance);
    assert_abs_diff_eq!(point.velocity().get_in(VelocityUnit::Mps), velocity_mps, epsilon = 5.0);
    assert_abs_diff_eq!(point.time(), time_s, epsilon = 0.05);
}

#[test]
fn test_custom_drag_curve() {
    let table = DragTable::new(vec![
        (0.0, 0.119),
        (0.7, 0.119),
        (0.85, 0.12),
        (0.87, 0.122),
        (0.9, 0.126),
        (0.93, 0.148),
        (0.95, 0.182),
    ])
    .unwrap();
    let bc = BallisticCoefficient::for_drag_curve(1.0, CustomDragMode::FormFactor, DragCurve::fit(&table))
        .unwrap();
    let projectile = Projectile::with_dimensions(
        bc,
        Weight::new(13585.0, WeightUnit::Gram),
        Distance::new(119.56, DistanceUnit::Millimeter),
        Distance::inches(20.0),
    )
    .unwrap();
    let ammo = Ammunition::new(projectile, Velocity::mps(555.0)).unwrap();
    let weapon = Weapon::with_zero_distance(
        Distance::new(40.0, DistanceUnit::Millimeter),
        Distance::meters(100.0),
    )
    .unwrap();
    let atmosphere = Atmosphere::default();

    let calc = TrajectoryCalculator::new();
    let sight_angle = calc.sight_angle(&ammo, &weapon, &atmosphere).unwrap();
    let shot = ShotParameters::new(sight_angle, Distance::meters(1500.0), Distance::meters(100.0)).unwrap();
    let points = calc.trajectory(&ammo, &weapon, &atmosphere, &shot, &[]).unwrap();

    assert_eq!(points.len(), 16);
    check_metric(&points[1], 100.0, 0.0, 550.0, 0.182);
    check_metric(&points[2], 200.0, -28.4, 544.0, 0.364);
    check_metric(&points[15], 1500.0, -3627.8, 486.0, 2.892);
}

fn level_shot(shot: &ShotParameters) -> Vec<TrajectoryPoint> {
    let ammo = standard_ammo(0.223, DragModel::G1, 168.0, 2750.0);
    TrajectoryCalculator::new()
        .trajectory(&ammo, &rifle(2.0), &Atmosphere::default(), shot, &[])
        .unwrap()
}

#[test]
fn test_inclined_shots_drop_less_than_level() {
    let sight_angle = Angular::radians(0.001228);
    let level = level_shot(
        &ShotParameters::new(sight_angle, Distance::yards(1000.0), Distance::yards(500.0)).unwrap(),
    );

    // Compare at equal line-of-sight range: the grid is horizontal distance
    let cos = 30f64.to_radians().cos();
    for degrees in [30.0, -30.0] {
        let shot = ShotParameters::new(sight_angle, Distance::yards(1000.0 * cos), Distance::yards(500.0 * cos))
            .unwrap()
            .with_shot_angle(Angular::degrees(degrees))
            .unwrap();
        let inclined = level_shot(&shot);
        assert_eq!(inclined.len(), 3);
        for i in 1..3 {
            let level_drop = level[i].drop().get_in(DistanceUnit::Inch);
            let inclined_drop = inclined[i].drop().get_in(DistanceUnit::Inch);
            assert!(inclined_drop > level_drop, "{degrees}°: {inclined_drop} vs level {level_drop}");
        }
        // Rifleman's rule: roughly 15 % less drop at 30°
        let ratio = inclined[2].drop().value() / level[2].drop().value();
        assert!(ratio > 0.8 && ratio < 0.9, "{degrees}°: ratio {ratio}");
    }
}

#[test]
fn test_full_cant_turns_elevation_into_windage() {
    let max = Distance::yards(1000.0);
    let step = Distance::yards(500.0);
    let upright = level_shot(&ShotParameters::new(Angular::radians(0.001228), max, step).unwrap());
    let flat = level_shot(&ShotParameters::new(Angular::zero(), max, step).unwrap());
    let canted = level_shot(
        &ShotParameters::new(Angular::radians(0.001228), max, step)
            .unwrap()
            .with_cant_angle(Angular::degrees(90.0))
            .unwrap(),
    );

    let lift = upright[2].drop().get_in(DistanceUnit::Inch) - flat[2].drop().get_in(DistanceUnit::Inch);
    assert!(lift > 40.0, "{lift}");
    assert!(upright[2].windage().value().abs() < 1e-9);

    // The sight-angle lift now points right, less the bore's sideways offset
    let windage = canted[2].windage().get_in(DistanceUnit::Inch);
    assert_abs_diff_eq!(windage, lift - 2.0, epsilon = 0.5);
    // The bore sits level with the sight, so the drop is the unlifted one shifted by the sight height
    assert_abs_diff_eq!(
        canted[2].drop().get_in(DistanceUnit::Inch),
        flat[2].drop().get_in(DistanceUnit::Inch) + 2.0,
        epsilon = 0.5
    );
}

#[test]
fn test_huge_grid_reports_divergence() {
    let ammo = standard_ammo(0.223, DragModel::G1, 168.0, 2750.0);
    let shot = ShotParameters::new(Angular::zero(), Distance::feet(1e12), Distance::feet(1.0)).unwrap();
    let result = TrajectoryCalculator::new()
        .with_max_steps(1000)
        .trajectory(&ammo, &rifle(2.0), &Atmosphere::default(), &shot, &[]);
    assert!(
        matches!(result, Err(BallisticsError::IntegrationDivergence { steps: 1000 })),
        "{result:?}"
    );
}

#[test]
fn test_step_cap_reports_divergence() {
    let ammo = standard_ammo(0.223, DragModel::G1, 168.0, 2750.0);
    let shot = ShotParameters::new(Angular::zero(), Distance::yards(1000.0), Distance::yards(100.0)).unwrap();
    let result = TrajectoryCalculator::new()
        .with_max_steps(1000)
        .trajectory(&ammo, &rifle(2.0), &Atmosphere::default(), &shot, &[]);
    assert!(
        matches!(result, Err(BallisticsError::IntegrationDivergence { steps: 1000 })),
        "{result:?}"
    );
}

#[test]
fn test_slow_bullet_stops_early() {
    let ammo = standard_ammo(0.223, DragModel::G1, 168.0, 60.0);
    let shot = ShotParameters::new(Angular::zero(), Distance::feet(3000.0), Distance::feet(300.0)).unwrap();
    let points = TrajectoryCalculator::new()
        .trajectory(&ammo, &rifle(0.0), &Atmosphere::default(), &shot, &[])
        .unwrap();
    // Drops below the stable-flight speed well short of the maximum distance
    assert!(points.len() > 1 && points.len() < 11, "{} points", points.len());
}

#[test]
fn test_calculator_is_shareable_between_threads() {
    let calc = TrajectoryCalculator::new();
    let ammo = standard_ammo(0.365, DragModel::G1, 69.0, 2600.0);
    let weapon = rifle(3.2);
    let atmosphere = Atmosphere::default();

    let (calc, ammo, weapon, atmosphere) = (&calc, &ammo, &weapon, &atmosphere);
    let angles: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || calc.sight_angle(ammo, weapon, atmosphere).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().get_in(AngularUnit::Radian))
            .collect()
    });
    assert!(angles.windows(2).all(|w| w[0] == w[1]));
}
