use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use exterior_ballistics::units::{AngularUnit, DistanceUnit, PressureUnit, TemperatureUnit};
use exterior_ballistics::{
    load_scenario, BallisticsError, ConfigError, CustomDragMode, TrajectoryCalculator,
};
use tempfile::TempDir;

const G1_WINDY: &str = r#"
[projectile]
drag_model = "G1"
ballistic_coefficient = 0.223
weight = { value = 168.0, unit = "grain" }

[ammunition]
muzzle_velocity = { value = 2750.0, unit = "fps" }

[weapon]
sight_height = { value = 2.0, unit = "inch" }
zero_distance = { value = 100.0, unit = "yard" }

[atmosphere]
altitude = { value = 0.0, unit = "foot" }
pressure = { value = 29.95, unit = "inhg" }
temperature = { value = 59.0, unit = "fahrenheit" }
humidity = 78.0

[[wind]]
velocity = { value = 5.0, unit = "mph" }
direction = { value = -45.0, unit = "degree" }

[shot]
maximum_distance = { value = 1000.0, unit = "yard" }
step = { value = 100.0, unit = "yard" }
sight_angle = { value = 0.001228, unit = "radian" }
"#;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_load_full_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "windy.toml", G1_WINDY);

    let scenario = load_scenario(&path).unwrap();
    assert_eq!(scenario.wind.len(), 1);
    assert_abs_diff_eq!(scenario.atmosphere.humidity(), 0.78, epsilon = 1e-12);
    assert_abs_diff_eq!(
        scenario.atmosphere.pressure().get_in(PressureUnit::InHg),
        29.95,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        scenario.atmosphere.temperature().get_in(TemperatureUnit::Fahrenheit),
        59.0,
        epsilon = 1e-12
    );

    let outcome = scenario.run(&TrajectoryCalculator::new()).unwrap();
    assert_abs_diff_eq!(outcome.sight_angle.get_in(AngularUnit::Radian), 0.001228, epsilon = 1e-12);
    assert_eq!(outcome.points.len(), 11);
    let last = &outcome.points[10];
    assert_abs_diff_eq!(last.drop().get_in(DistanceUnit::Inch), -823.9, epsilon = 4.0);
    assert!(last.windage().get_in(DistanceUnit::Inch) < 0.0);
}

#[test]
fn test_custom_drag_table_file_is_relative_to_scenario() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "shell.csv",
        "# measured drag\nmach,cd\n0.0,0.119\n0.7,0.119\n0.85,0.12\n0.87,0.122\n0.9,0.126\n0.93,0.148\n0.95,0.182\n",
    );
    let path = write(
        dir.path(),
        "shell.toml",
        r#"
[projectile]
ballistic_coefficient = 1.0
custom_drag = { mode = "form_factor", table_file = "shell.csv" }
weight = { value = 13585.0, unit = "gram" }
diameter = { value = 119.56, unit = "millimeter" }
length = { value = 20.0, unit = "inch" }

[ammunition]
muzzle_velocity = { value = 555.0, unit = "mps" }

[weapon]
sight_height = { value = 40.0, unit = "millimeter" }
zero_distance = { value = 100.0, unit = "meter" }

[shot]
maximum_distance = { value = 200.0, unit = "meter" }
step = { value = 100.0, unit = "meter" }
"#,
    );

    let scenario = load_scenario(&path).unwrap();
    let bc = scenario.ballistic_coefficient().unwrap();
    assert_eq!(bc.custom_mode(), Some(CustomDragMode::FormFactor));
    assert_abs_diff_eq!(bc.coefficient(0.9), 0.126, epsilon = 1e-9);

    let outcome = scenario.run(&TrajectoryCalculator::new()).unwrap();
    assert_eq!(outcome.points.len(), 3);
    assert_abs_diff_eq!(outcome.points[1].drop().get_in(DistanceUnit::Centimeter), 0.0, epsilon = 0.1);
    assert_abs_diff_eq!(outcome.points[2].drop().get_in(DistanceUnit::Centimeter), -28.4, epsilon = 1.8);
}

#[test]
fn test_missing_table_file() {
    let dir = TempDir::new().unwrap();
    let text = G1_WINDY.replace(
        "drag_model = \"G1\"",
        "custom_drag = { mode = \"bc\", table_file = \"missing.csv\" }",
    );
    let path = write(dir.path(), "missing.toml", &text);

    let scenario = load_scenario(&path).unwrap();
    let err = scenario.ballistic_coefficient().unwrap_err();
    match err {
        BallisticsError::Scenario(ConfigError::Io { path, .. }) => {
            assert!(path.ends_with("missing.csv"));
            assert!(path.starts_with(dir.path()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

fn table_file_error(dir: &Path, csv: &str) -> BallisticsError {
    write(dir, "bad.csv", csv);
    let text = G1_WINDY.replace(
        "drag_model = \"G1\"",
        "custom_drag = { mode = \"bc\", table_file = \"bad.csv\" }",
    );
    let path = write(dir, "bad.toml", &text);
    load_scenario(&path).unwrap().ballistic_coefficient().unwrap_err()
}

#[test]
fn test_malformed_table_file() {
    let dir = TempDir::new().unwrap();

    let err = table_file_error(dir.path(), "0.0,0.2\n0.5,0.3,0.9\n");
    assert!(matches!(err, BallisticsError::Scenario(ConfigError::Csv { .. })), "{err:?}");

    let err = table_file_error(dir.path(), "0.0,0.2\n0.5,abc\n");
    assert!(matches!(err, BallisticsError::InvalidConfiguration(_)), "{err:?}");

    let err = table_file_error(dir.path(), "0.5,0.2\n0.4,0.3\n");
    assert!(err.to_string().contains("increasing"), "{err}");
}

#[test]
fn test_invalid_toml_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "broken.toml", "[projectile\nballistic_coefficient = ");

    let err = load_scenario(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"), "{err}");
    assert!(matches!(err, BallisticsError::Scenario(ConfigError::Toml { .. })));
}

#[test]
fn test_invalid_atmosphere_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "humid.toml", &G1_WINDY.replace("humidity = 78.0", "humidity = 140.0"));
    assert!(load_scenario(&path).is_err());
}
