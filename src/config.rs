//! Program configuration loading
//!
//! Resolution chain: explicit path > `FORZUDO_CONFIG` env var > built-in
//! default program. `FORZUDO_PROGRAM_START` (YYYY-MM-DD) then overrides the
//! start date of whichever program was picked. The result is always validated.

use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};

use crate::models::{Lift, ProgramConfig};

pub const CONFIG_PATH_ENV: &str = "FORZUDO_CONFIG";
pub const PROGRAM_START_ENV: &str = "FORZUDO_PROGRAM_START";

/// ---------------------------------------------------------------------------
/// Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config file {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config file: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("Invalid FORZUDO_PROGRAM_START value {value:?}: expected YYYY-MM-DD")]
  InvalidStartDate { value: String },

  #[error("Lift {lift} is used by day {day} but has no training max configured")]
  MissingLift { lift: Lift, day: u8 },

  #[error("No set scheme configured for week type {0}")]
  MissingWeek(u8),

  #[error("No configuration for day {0}")]
  MissingDay(u8),

  #[error("Duplicate {what}: {key}")]
  Duplicate { what: &'static str, key: String },

  #[error("Day index out of range: {0} (expected 1-4)")]
  DayOutOfRange(u8),

  #[error("Week type out of range: {0} (expected 1-4)")]
  WeekOutOfRange(u8),

  #[error("Week type {0} has no sets")]
  EmptyWeek(u8),

  #[error("Invalid value for {field}: {reason}")]
  InvalidValue { field: String, reason: String },
}

/// ---------------------------------------------------------------------------
/// Loading
/// ---------------------------------------------------------------------------

/// Parse and validate a program from TOML text
pub fn parse_program(contents: &str) -> Result<ProgramConfig, ConfigError> {
  let program: ProgramConfig = toml::from_str(contents)?;
  program.validate()?;
  Ok(program)
}

pub fn load_program_file(path: &Path) -> Result<ProgramConfig, ConfigError> {
  let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  tracing::debug!(path = %path.display(), "Loading program config");
  parse_program(&contents)
}

/// Resolve the program: `path` if given, else `FORZUDO_CONFIG`, else the
/// built-in default. Env overrides are applied last.
pub fn load_program(path: Option<&Path>) -> Result<ProgramConfig, ConfigError> {
  let from_env = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

  let mut program = match path.map(Path::to_path_buf).or(from_env) {
    Some(p) => load_program_file(&p)?,
    None => {
      tracing::debug!("No config file given, using built-in program");
      ProgramConfig::default()
    }
  };

  apply_env_overrides(&mut program)?;
  program.validate()?;
  Ok(program)
}

fn apply_env_overrides(program: &mut ProgramConfig) -> Result<(), ConfigError> {
  if let Ok(value) = env::var(PROGRAM_START_ENV) {
    let start = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
      .map_err(|_| ConfigError::InvalidStartDate { value: value.clone() })?;
    tracing::debug!(%start, "Program start overridden from environment");
    program.program_start = start;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::io::Write;

  const SAMPLE: &str = include_str!("../config/program.toml");

  #[test]
  fn test_sample_config_matches_builtin_program() {
    let parsed = parse_program(SAMPLE).expect("sample config should parse");
    assert_eq!(parsed, ProgramConfig::default());
  }

  #[test]
  fn test_parse_minimal_program_uses_default_thresholds() {
    let toml = r#"
program_start = "2026-01-05"

[[lifts]]
lift = "bench"
training_max = 100
increment = 2.5

[[lifts]]
lift = "squat"
training_max = 140
increment = 5

[[days]]
day = 1
name = "Bench A"
lift = "bench"
focus = "Bench"

[[days]]
day = 2
name = "Squat A"
lift = "squat"
focus = "Squat"

[[days]]
day = 3
name = "Bench B"
lift = "bench"
focus = "Bench"

[[days]]
day = 4
name = "Squat B"
lift = "squat"
focus = "Squat"

[[weeks]]
week_type = 1
name = "Fives"
sets = [{ pct = 0.65, reps = 5 }, { pct = 0.85, reps = "5+" }]

[[weeks]]
week_type = 2
name = "Threes"
sets = [{ pct = 0.9, reps = "3+" }]

[[weeks]]
week_type = 3
name = "Ones"
sets = [{ pct = 0.95, reps = "1+" }]

[[weeks]]
week_type = 4
name = "Deload"
sets = [{ pct = 0.5, reps = 5 }]
"#;
    let program = parse_program(toml).expect("minimal config should parse");
    assert_eq!(program.lift(Lift::Bench).unwrap().increment, 2.5);
    assert_eq!(program.alerts.inactivity_hours, 48.0);
    assert_eq!(program.alerts.deload_warning_week, 5);
    assert!(program.lift(Lift::Ohp).is_none());
  }

  #[test]
  fn test_parse_rejects_invariant_violation() {
    let broken = SAMPLE.replace("lift = \"squat\"\ntraining_max", "lift = \"bench\"\ntraining_max");
    match parse_program(&broken) {
      Err(ConfigError::Duplicate { what, .. }) => assert_eq!(what, "lift"),
      other => panic!("Expected duplicate lift error, got {:?}", other),
    }
  }

  #[test]
  fn test_parse_rejects_bad_toml() {
    assert!(matches!(parse_program("program_start = "), Err(ConfigError::Parse(_))));
  }

  #[test]
  #[serial]
  fn test_load_program_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    temp_env::with_vars(
      [(CONFIG_PATH_ENV, None::<&str>), (PROGRAM_START_ENV, None)],
      || {
        let program = load_program(Some(file.path())).unwrap();
        assert_eq!(program, ProgramConfig::default());
      },
    );
  }

  #[test]
  #[serial]
  fn test_load_program_from_env_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let custom = SAMPLE.replace("training_max = 76", "training_max = 90");
    file.write_all(custom.as_bytes()).unwrap();
    let path = file.path().to_string_lossy().to_string();

    temp_env::with_vars(
      [(CONFIG_PATH_ENV, Some(path.as_str())), (PROGRAM_START_ENV, None)],
      || {
        let program = load_program(None).unwrap();
        assert_eq!(program.lift(Lift::Bench).unwrap().training_max, 90.0);
      },
    );
  }

  #[test]
  #[serial]
  fn test_load_program_defaults_without_config() {
    temp_env::with_vars(
      [(CONFIG_PATH_ENV, None::<&str>), (PROGRAM_START_ENV, None)],
      || {
        assert_eq!(load_program(None).unwrap(), ProgramConfig::default());
      },
    );
  }

  #[test]
  #[serial]
  fn test_program_start_env_override() {
    temp_env::with_vars(
      [(CONFIG_PATH_ENV, None::<&str>), (PROGRAM_START_ENV, Some("2026-05-04"))],
      || {
        let program = load_program(None).unwrap();
        assert_eq!(program.program_start, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap());
      },
    );
  }

  #[test]
  #[serial]
  fn test_invalid_program_start_env() {
    temp_env::with_vars(
      [(CONFIG_PATH_ENV, None::<&str>), (PROGRAM_START_ENV, Some("04/05/2026"))],
      || {
        let err = load_program(None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStartDate { .. }));
        assert!(err.to_string().contains("YYYY-MM-DD"));
      },
    );
  }

  #[test]
  #[serial]
  fn test_missing_config_file() {
    temp_env::with_vars(
      [(CONFIG_PATH_ENV, None::<&str>), (PROGRAM_START_ENV, None)],
      || {
        let err = load_program(Some(Path::new("/nonexistent/forzudo.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
      },
    );
  }
}
