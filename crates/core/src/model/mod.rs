mod answer;
mod assessment;
mod ids;
mod question;
mod result;

pub use answer::{Answer, AnswerSheet};
pub use assessment::{Assessment, AssessmentError, AssessmentSummary};
pub use ids::{AssessmentId, AttemptId, OptionId, ParseIdError, QuestionId};
pub use question::{Question, QuestionError, QuestionOption, QuestionType};
pub use result::AttemptResult;
