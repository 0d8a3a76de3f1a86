//! `forzudo check-config` command: print a summary of the loaded program.

use anyhow::Result;
use std::fmt::Write;

use crate::models::ProgramConfig;

/// Run the check-config command. Loading already validated the program.
pub fn run_check_config(program: &ProgramConfig) -> Result<()> {
  print!("{}", summarize(program)?);
  Ok(())
}

pub fn summarize(program: &ProgramConfig) -> Result<String> {
  let mut out = String::new();
  writeln!(out, "Program OK")?;
  writeln!(out, "Start: {}", program.program_start)?;
  writeln!(out)?;

  writeln!(out, "{:<10} {:>8} {:>10}", "LIFT", "TM", "INCREMENT")?;
  for lift in &program.lifts {
    writeln!(
      out,
      "{:<10} {:>8.1} {:>10.1}",
      lift.lift.as_str(),
      lift.training_max,
      lift.increment
    )?;
  }
  writeln!(out)?;

  for day in &program.days {
    writeln!(out, "Day {}: {} ({}, {})", day.day, day.name, day.lift, day.focus)?;
  }
  writeln!(out)?;

  for week in &program.weeks {
    let sets: Vec<String> = week
      .sets
      .iter()
      .map(|s| format!("{:.0}%x{}", s.pct * 100.0, s.reps))
      .collect();
    writeln!(out, "Week {}: {} [{}]", week.week_type, week.name, sets.join(", "))?;
  }
  writeln!(out)?;

  writeln!(
    out,
    "Alerts: inactivity after {}h, deload warning from week {}",
    program.alerts.inactivity_hours, program.alerts.deload_warning_week
  )?;
  Ok(out)
}
