//! Commands for cycle position, day plans and weight projections

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::models::{Lift, ProgramConfig};
use crate::periodization::{
    effective_training_max, expected_weights, next_day, CycleState, EngineError, NextSessionPlan,
    WorkingSet,
};
use crate::session_count::{CalendarEstimate, SessionCountSource};

/// Projected sets for one lift in one week type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsReport {
    pub lift: Lift,
    pub week_type: u8,
    pub week_name: String,
    pub bumps: u64,
    pub training_max: f64,
    pub sets: Vec<WorkingSet>,
}

/// Print the cycle position after `sessions_count` sessions
pub fn run_cycle(program: &ProgramConfig, sessions_count: i64) -> Result<()> {
    let cycle = CycleState::compute(sessions_count, program)
        .with_context(|| format!("Failed to compute cycle for {} sessions", sessions_count))?;
    super::print_json(&cycle)
}

/// Print the plan for `day`, or for the next day due
pub fn run_plan(
    program: &ProgramConfig,
    day: Option<u8>,
    sessions_count: Option<i64>,
    fallback_day: bool,
) -> Result<()> {
    let count = match sessions_count {
        Some(count) => count,
        None => CalendarEstimate {
            program_start: program.program_start,
        }
        .session_count(Utc::now())
        .context("Failed to estimate sessions from the calendar")?,
    };
    let plan = plan_for(program, day, count, fallback_day)?;
    if let Some(label) = top_set_label(&plan) {
        tracing::info!(day = plan.day, lift = %plan.main_lift, "Top set: {}", label);
    }
    super::print_json(&plan)
}

/// Plan `day` (or the next day due) after `sessions_count` sessions. With
/// `fallback_day`, an unconfigured day resolves to the first configured one.
pub fn plan_for(
    program: &ProgramConfig,
    day: Option<u8>,
    sessions_count: i64,
    fallback_day: bool,
) -> Result<NextSessionPlan> {
    let cycle = CycleState::compute(sessions_count, program)
        .with_context(|| format!("Failed to compute cycle for {} sessions", sessions_count))?;
    let completed = u64::try_from(sessions_count)
        .map_err(|_| EngineError::NegativeSessionCount(sessions_count))?;
    let mut day = day.unwrap_or_else(|| next_day(completed));
    if fallback_day {
        day = program
            .day_or_first(day)
            .map(|d| d.day)
            .ok_or(EngineError::UnknownDay(day))?;
    }

    NextSessionPlan::build(program, day, &cycle).with_context(|| format!("Failed to plan day {}", day))
}

/// e.g. "64kg x 5+ (AMRAP)"
pub fn top_set_label(plan: &NextSessionPlan) -> Option<String> {
    plan.top_set().map(|set| {
        let amrap = if set.reps.is_amrap() { " (AMRAP)" } else { "" };
        format!("{}kg x {}{}", set.weight, set.reps, amrap)
    })
}

/// Print projected working weights
pub fn run_weights(program: &ProgramConfig, lift: Lift, week_type: u8, bumps: u64) -> Result<()> {
    let report = weights_for(program, lift, week_type, bumps)?;
    super::print_json(&report)
}

pub fn weights_for(
    program: &ProgramConfig,
    lift: Lift,
    week_type: u8,
    bumps: u64,
) -> Result<WeightsReport> {
    let training_max = effective_training_max(program, lift, bumps)?;
    let sets = expected_weights(program, lift, week_type, bumps)?;
    let week_name = program
        .week(week_type)
        .map(|w| w.name.clone())
        .ok_or(EngineError::UnknownWeekType(week_type))?;

    Ok(WeightsReport {
        lift,
        week_type,
        week_name,
        bumps,
        training_max,
        sets,
    })
}
