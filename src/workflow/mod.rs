pub mod confirmation;
pub mod survey_flow;

pub use confirmation::{greeting_name, Countdown};
pub use survey_flow::{FlowState, SurveyFlow};
