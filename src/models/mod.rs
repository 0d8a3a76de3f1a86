pub mod program;
pub mod session;

pub use program::{
  AlertThresholds, DayConfig, Lift, LiftConfig, PrescribedSet, ProgramConfig, Reps, WeekScheme,
};
pub use session::{parse_timestamp, RawSession, Session};
