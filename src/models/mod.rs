pub mod answer;
pub mod participant;
pub mod question;
pub mod submission;

pub use answer::{Answer, AnswerMap};
pub use participant::{Participant, SkillLevel, Track};
pub use question::{Question, QuestionKind};
pub use submission::{
    ReviewAnswer, ReviewRecord, ReviewSummary, StoredSubmission, SubmissionBundle, SubmitResponse,
};
