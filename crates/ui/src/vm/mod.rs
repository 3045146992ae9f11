mod menu_vm;
mod results_vm;
mod session_vm;
mod time_fmt;

pub use menu_vm::{BestScoreVm, GameCardVm, MenuVm};
pub use results_vm::{BreakdownRowVm, NO_ANSWER, ResultsVm};
pub use session_vm::{SessionVm, TIMER_WARNING_SECONDS};
pub use time_fmt::{format_date, format_seconds};
