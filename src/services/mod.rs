pub mod answer_store;
pub mod catalog;
pub mod registration;
pub mod review;
pub mod submission_gateway;

pub use answer_store::AnswerStore;
pub use registration::{prefill_form, register_participant, RegistrationForm};
pub use review::{load_review_records, summarize};
pub use submission_gateway::{Gateway, HttpGateway, LocalGateway, SubmissionGateway};
