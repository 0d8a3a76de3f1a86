//! Periodization State Engine
//!
//! Maps a count of completed training sessions onto a 5/3/1 macro-cycle and
//! turns that position into working weights:
//! - 4 sessions = 1 week, 7 weeks = 1 macro-cycle
//! - weeks 1-3 and 4-6 are two mini-cycles over the same week types (5s, 3s, 531)
//! - week 7 is the deload
//! - every finished mini-cycle bumps each lift's training max once
//!
//! Everything here is a pure function of its arguments. Missing configuration
//! is reported as an error, never papered over with zero or a default day.

use serde::{Deserialize, Serialize};

use crate::models::{Lift, ProgramConfig, Reps};

pub const SESSIONS_PER_WEEK: u64 = 4;
pub const MACRO_CYCLE_LENGTH: u64 = 7;
pub const MINI_CYCLE_LENGTH: u8 = 3;
pub const DELOAD_WEEK_TYPE: u8 = 4;

/// Smallest jump the bar can make with a pair of plates
pub const PLATE_INCREMENT: f64 = 2.0;

// ---------------------------------------------------------------------------
/// Engine Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineError {
    #[error("No training max configured for lift: {0}")]
    UnknownLift(Lift),

    #[error("No set scheme configured for week type: {0}")]
    UnknownWeekType(u8),

    #[error("No day configured with index: {0}")]
    UnknownDay(u8),

    #[error("Session count cannot be negative: {0}")]
    NegativeSessionCount(i64),

    #[error("Invalid session{}: {reason}", index_suffix(.index))]
    InvalidSession { index: Option<usize>, reason: String },
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" #{}", i)).unwrap_or_default()
}

// ---------------------------------------------------------------------------
/// Training Max
// ---------------------------------------------------------------------------

/// Training max for `lift` after `bumps` completed mini-cycles
pub fn effective_training_max(
    program: &ProgramConfig,
    lift: Lift,
    bumps: u64,
) -> Result<f64, EngineError> {
    let config = program.lift(lift).ok_or(EngineError::UnknownLift(lift))?;
    Ok(config.training_max + config.increment * bumps as f64)
}

/// Round to the nearest multiple of [`PLATE_INCREMENT`]; halves go to the even multiple
pub fn round_to_plate(weight: f64) -> f64 {
    (weight / PLATE_INCREMENT).round_ties_even() * PLATE_INCREMENT
}

// ---------------------------------------------------------------------------
/// Cycle State: Where are we in the macro-cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleState {
    /// 1..=7
    pub week_in_macro: u8,
    /// 1=5s, 2=3s, 3=531, 4=deload
    pub week_type: u8,
    pub week_name: String,
    /// 1 or 2; None during the deload week
    pub mini_cycle: Option<u8>,
    /// 1-based
    pub macro_num: u64,
    pub tm_bumps_completed: u64,
    pub completed_weeks: u64,
}

impl CycleState {
    /// Compute the cycle position after `total_sessions` completed sessions
    pub fn compute(total_sessions: i64, program: &ProgramConfig) -> Result<Self, EngineError> {
        let total = u64::try_from(total_sessions)
            .map_err(|_| EngineError::NegativeSessionCount(total_sessions))?;

        let completed_weeks = total / SESSIONS_PER_WEEK;
        let macro_num = completed_weeks / MACRO_CYCLE_LENGTH + 1;
        // Always < 8, fits in u8
        let week_in_macro = (completed_weeks % MACRO_CYCLE_LENGTH + 1) as u8;

        let (week_type, mini_cycle) = match week_in_macro {
            w if w <= MINI_CYCLE_LENGTH => (w, Some(1)),
            w if w <= 2 * MINI_CYCLE_LENGTH => (w - MINI_CYCLE_LENGTH, Some(2)),
            _ => (DELOAD_WEEK_TYPE, None),
        };

        // Two bumps per finished macro, plus one per finished mini-cycle in this one
        let mut tm_bumps_completed = 2 * (macro_num - 1);
        if week_in_macro > MINI_CYCLE_LENGTH {
            tm_bumps_completed += 1;
        }
        if week_in_macro > 2 * MINI_CYCLE_LENGTH {
            tm_bumps_completed += 1;
        }

        let week_name = program
            .week(week_type)
            .ok_or(EngineError::UnknownWeekType(week_type))?
            .name
            .clone();

        let state = Self {
            week_in_macro,
            week_type,
            week_name,
            mini_cycle,
            macro_num,
            tm_bumps_completed,
            completed_weeks,
        };
        tracing::debug!(
            total_sessions,
            macro_num = state.macro_num,
            week_in_macro = state.week_in_macro,
            week_type = state.week_type,
            bumps = state.tm_bumps_completed,
            "Computed cycle state"
        );
        Ok(state)
    }

    pub fn is_deload_week(&self) -> bool {
        self.week_type == DELOAD_WEEK_TYPE
    }

    /// Weeks left before the deload week (0 while in it)
    pub fn days_until_deload(&self) -> u8 {
        (MACRO_CYCLE_LENGTH as u8).saturating_sub(self.week_in_macro)
    }
}

/// Day of the microcycle that follows `total_sessions` completed sessions
pub fn next_day(total_sessions: u64) -> u8 {
    (total_sessions % SESSIONS_PER_WEEK) as u8 + 1
}

// ---------------------------------------------------------------------------
/// Working Sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingSet {
    pub weight: f64,
    pub reps: Reps,
    pub pct: f64,
}

/// Plate-rounded working sets for `lift` in `week_type`, lightest first
pub fn expected_weights(
    program: &ProgramConfig,
    lift: Lift,
    week_type: u8,
    bumps: u64,
) -> Result<Vec<WorkingSet>, EngineError> {
    let training_max = effective_training_max(program, lift, bumps)?;
    let scheme = program
        .week(week_type)
        .ok_or(EngineError::UnknownWeekType(week_type))?;

    Ok(scheme
        .sets
        .iter()
        .map(|s| WorkingSet {
            weight: round_to_plate(training_max * s.pct),
            reps: s.reps.clone(),
            pct: s.pct,
        })
        .collect())
}

// ---------------------------------------------------------------------------
/// Next Session Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSessionPlan {
    pub day: u8,
    pub day_name: String,
    pub focus: String,
    pub main_lift: Lift,
    pub week_name: String,
    pub week_type: u8,
    pub macro_num: u64,
    pub week_in_macro: u8,
    pub training_max: f64,
    pub working_sets: Vec<WorkingSet>,
}

impl NextSessionPlan {
    /// Plan `day` at the position described by `cycle`
    pub fn build(
        program: &ProgramConfig,
        day: u8,
        cycle: &CycleState,
    ) -> Result<Self, EngineError> {
        let day_config = program.day(day).ok_or(EngineError::UnknownDay(day))?;
        let lift = day_config.lift;
        let training_max = effective_training_max(program, lift, cycle.tm_bumps_completed)?;
        let working_sets =
            expected_weights(program, lift, cycle.week_type, cycle.tm_bumps_completed)?;

        Ok(Self {
            day: day_config.day,
            day_name: day_config.name.clone(),
            focus: day_config.focus.clone(),
            main_lift: lift,
            week_name: cycle.week_name.clone(),
            week_type: cycle.week_type,
            macro_num: cycle.macro_num,
            week_in_macro: cycle.week_in_macro,
            training_max,
            working_sets,
        })
    }

    /// The heaviest prescribed set
    pub fn top_set(&self) -> Option<&WorkingSet> {
        self.working_sets.last()
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeekScheme;

    fn program() -> ProgramConfig {
        ProgramConfig::default()
    }

    fn state(total_sessions: i64) -> CycleState {
        CycleState::compute(total_sessions, &program()).expect("Should compute cycle state")
    }

    #[test]
    fn test_zero_sessions_is_program_start() {
        let s = state(0);
        assert_eq!(s.macro_num, 1);
        assert_eq!(s.week_in_macro, 1);
        assert_eq!(s.week_type, 1);
        assert_eq!(s.tm_bumps_completed, 0);
        assert_eq!(s.completed_weeks, 0);
        assert_eq!(s.mini_cycle, Some(1));
        assert_eq!(s.week_name, "5s week");
    }

    #[test]
    fn test_full_macro_rolls_over() {
        // 7 weeks * 4 sessions
        let s = state(28);
        assert_eq!(s.macro_num, 2);
        assert_eq!(s.week_in_macro, 1);
        assert_eq!(s.week_type, 1);
        assert_eq!(s.tm_bumps_completed, 2);
    }

    #[test]
    fn test_week_type_mapping_within_macro() {
        let expected = [
            (1, 1, Some(1)),
            (2, 2, Some(1)),
            (3, 3, Some(1)),
            (4, 1, Some(2)),
            (5, 2, Some(2)),
            (6, 3, Some(2)),
            (7, 4, None),
        ];
        for (week, week_type, mini) in expected {
            let s = state((week as i64 - 1) * 4);
            assert_eq!(s.week_in_macro, week);
            assert_eq!(s.week_type, week_type, "week {}", week);
            assert_eq!(s.mini_cycle, mini, "week {}", week);
        }
        assert!(state(24).is_deload_week());
        assert_eq!(state(24).week_name, "Deload");
    }

    #[test]
    fn test_bumps_accumulate_per_mini_cycle() {
        assert_eq!(state(11).tm_bumps_completed, 0); // still week 3
        assert_eq!(state(12).tm_bumps_completed, 1); // week 4
        assert_eq!(state(23).tm_bumps_completed, 1); // week 6
        assert_eq!(state(24).tm_bumps_completed, 2); // deload
        assert_eq!(state(28 * 3 + 12).tm_bumps_completed, 7);
    }

    #[test]
    fn test_ranges_hold_for_many_counts() {
        let program = program();
        for n in 0..500 {
            let s = CycleState::compute(n, &program).unwrap();
            assert!((1..=7).contains(&s.week_in_macro), "n={}", n);
            assert!((1..=4).contains(&s.week_type), "n={}", n);
        }
    }

    #[test]
    fn test_macro_and_bumps_never_decrease() {
        let program = program();
        let mut prev = CycleState::compute(0, &program).unwrap();
        for n in 1..400 {
            let next = CycleState::compute(n, &program).unwrap();
            assert!(next.macro_num >= prev.macro_num, "n={}", n);
            assert!(next.tm_bumps_completed >= prev.tm_bumps_completed, "n={}", n);
            prev = next;
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        assert_eq!(state(61), state(61));
    }

    #[test]
    fn test_negative_sessions_rejected() {
        assert_eq!(
            CycleState::compute(-4, &program()),
            Err(EngineError::NegativeSessionCount(-4))
        );
    }

    #[test]
    fn test_missing_week_scheme_is_config_error() {
        let mut p = program();
        p.weeks.retain(|w: &WeekScheme| w.week_type != DELOAD_WEEK_TYPE);
        assert_eq!(
            CycleState::compute(24, &p),
            Err(EngineError::UnknownWeekType(4))
        );
        // Other weeks are unaffected
        assert!(CycleState::compute(0, &p).is_ok());
    }

    #[test]
    fn test_days_until_deload() {
        assert_eq!(state(0).days_until_deload(), 6);
        assert_eq!(state(20).days_until_deload(), 1);
        assert_eq!(state(24).days_until_deload(), 0);
    }

    #[test]
    fn test_next_day_rotation() {
        assert_eq!(next_day(0), 1);
        assert_eq!(next_day(3), 4);
        assert_eq!(next_day(4), 1);
        assert_eq!(next_day(29), 2);
    }

    #[test]
    fn test_effective_training_max() {
        let p = program();
        assert_eq!(effective_training_max(&p, Lift::Bench, 0).unwrap(), 76.0);
        assert_eq!(effective_training_max(&p, Lift::Bench, 2).unwrap(), 80.0);
        assert_eq!(effective_training_max(&p, Lift::Deadlift, 3).unwrap(), 152.0);
    }

    #[test]
    fn test_unknown_lift_is_error_not_zero() {
        let mut p = program();
        p.lifts.retain(|l| l.lift != Lift::Ohp);
        assert_eq!(
            effective_training_max(&p, Lift::Ohp, 1),
            Err(EngineError::UnknownLift(Lift::Ohp))
        );
        assert!(expected_weights(&p, Lift::Ohp, 1, 0).is_err());
    }

    #[test]
    fn test_round_to_plate() {
        assert_eq!(round_to_plate(56.9), 56.0);
        assert_eq!(round_to_plate(37.7), 38.0);
        assert_eq!(round_to_plate(60.0), 60.0);
        assert_eq!(round_to_plate(0.0), 0.0);
    }

    #[test]
    fn test_round_to_plate_ties_go_even() {
        // 28.5 and 27.5 plates-worth both land on 28
        assert_eq!(round_to_plate(57.0), 56.0);
        assert_eq!(round_to_plate(55.0), 56.0);
        assert_eq!(round_to_plate(59.0), 60.0);
        assert_eq!(round_to_plate(61.0), 60.0);
        assert_eq!(round_to_plate(55.5), 56.0);
    }

    #[test]
    fn test_expected_weights_five_week() {
        // Bench TM 76: 49.4, 57.0, 64.6
        let sets = expected_weights(&program(), Lift::Bench, 1, 0).unwrap();
        let weights: Vec<f64> = sets.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![50.0, 56.0, 64.0]);
        assert_eq!(sets[2].reps, Reps::Marker("5+".to_string()));
        assert_eq!(sets[0].reps, Reps::Count(5));
        crate::assert_approx_eq!(sets[1].pct, 0.75, 1e-9);
    }

    #[test]
    fn test_expected_weights_after_bumps() {
        // Deadlift TM 140 + 4*2 = 148, 531 week: 111 (tie), 125.8, 140.6
        let sets = expected_weights(&program(), Lift::Deadlift, 3, 2).unwrap();
        let weights: Vec<f64> = sets.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![112.0, 126.0, 140.0]);
        assert_eq!(sets[2].reps, Reps::Marker("1+".to_string()));
    }

    #[test]
    fn test_expected_weights_unknown_week() {
        assert_eq!(
            expected_weights(&program(), Lift::Squat, 9, 0),
            Err(EngineError::UnknownWeekType(9))
        );
    }

    #[test]
    fn test_next_session_plan() {
        let cycle = state(13); // week 4, one bump
        let plan = NextSessionPlan::build(&program(), 2, &cycle).unwrap();

        assert_eq!(plan.main_lift, Lift::Deadlift);
        assert_eq!(plan.day_name, "BBB Day 2 - Deadlift");
        assert_eq!(plan.week_name, "5s week");
        assert_eq!(plan.week_in_macro, 4);
        assert_eq!(plan.training_max, 144.0);
        assert_eq!(plan.working_sets.len(), 3);
        assert_eq!(plan.top_set().unwrap().reps, Reps::Marker("5+".to_string()));
    }

    #[test]
    fn test_next_session_unknown_day_is_error() {
        assert_eq!(
            NextSessionPlan::build(&program(), 5, &state(0)),
            Err(EngineError::UnknownDay(5))
        );
    }

    #[test]
    fn test_invalid_session_message() {
        let err = EngineError::InvalidSession {
            index: Some(3),
            reason: "missing timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid session #3: missing timestamp");

        let err = EngineError::InvalidSession {
            index: None,
            reason: "missing timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid session: missing timestamp");
    }
}
