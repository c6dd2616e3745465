// src/grading.rs

//! Answer validation and scoring of quiz submissions.
//!
//! Grading is a pure function of the question snapshot and the submitted
//! answers. The only thing that can make it fail is the structural absence
//! of questions or answers; answer content never does.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, models::question::Question};

/// User-caused failures detected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No questions for the quiz")]
    NoQuestions,

    #[error("No answers submitted")]
    NoAnswers,

    #[error("There must be at least 2 and at most 5 options")]
    OptionCountOutOfRange,

    #[error("Options include {0} invalid option(s)")]
    MalformedOption(usize),

    #[error("Question does not have a correct answer")]
    NoCorrectAnswer,
}

impl ValidationError {
    /// Stable tag exposed to clients as `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NoQuestions => "no_questions",
            ValidationError::NoAnswers => "no_answers",
            ValidationError::OptionCountOutOfRange => "option_count_out_of_range",
            ValidationError::MalformedOption(_) => "malformed_option",
            ValidationError::NoCorrectAnswer => "no_correct_answer",
        }
    }
}

/// Submitted answers: question id -> chosen option id.
///
/// Ids are kept as received. Entries that are not well-formed ids still count
/// as answers but can never match a question or option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AnswerMap(HashMap<String, String>);

impl AnswerMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parsed `(question, option)` pairs; `None` where an id is malformed.
    pub fn entries(&self) -> impl Iterator<Item = (Option<Uuid>, Option<Uuid>)> + '_ {
        self.0.iter().map(|(question, option)| {
            (
                Uuid::parse_str(question.trim()).ok(),
                Uuid::parse_str(option.trim()).ok(),
            )
        })
    }
}

impl FromIterator<(Uuid, Uuid)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (Uuid, Uuid)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(question, option)| (question.to_string(), option.to_string()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for AnswerMap {
    fn from(raw: HashMap<String, String>) -> Self {
        Self(raw)
    }
}

/// Result of grading one submission. `0 <= score <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Grade {
    /// Number of correctly answered questions.
    pub score: i32,
    /// Number of questions in the quiz at grading time.
    pub total: i32,
}

/// Checks that there is something to grade.
pub fn validate_answers(question_count: usize, answers: &AnswerMap) -> Result<(), ValidationError> {
    if question_count == 0 {
        return Err(ValidationError::NoQuestions);
    }
    if answers.is_empty() {
        return Err(ValidationError::NoAnswers);
    }
    Ok(())
}

/// Scores `answers` against the questions of `quiz_id`.
///
/// Answers to unknown questions, to questions of another quiz, or naming an
/// unknown or incorrect option contribute nothing. Option lookup is scoped to
/// the answered question. A question scores at most once, however many
/// spellings of its id the map carries.
pub fn grade(
    quiz_id: Uuid,
    questions: &[Question],
    answers: &AnswerMap,
) -> Result<Grade, ValidationError> {
    let total = questions.len();
    validate_answers(total, answers)?;

    let by_id: HashMap<Uuid, &Question> = questions
        .iter()
        .filter(|q| q.quiz_id == quiz_id)
        .map(|q| (q.id, q))
        .collect();

    let answered_correctly: HashSet<Uuid> = answers
        .entries()
        .filter_map(|(question_id, option_id)| {
            let question = by_id.get(&question_id?)?;
            let option_id = option_id?;
            question
                .options
                .iter()
                .any(|option| option.id == option_id && option.is_answer)
                .then_some(question.id)
        })
        .collect();
    let score = answered_correctly.len();

    Ok(Grade {
        score: clamp_count(score),
        total: clamp_count(total),
    })
}

fn clamp_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Read-only source of the question set a submission is graded against.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn questions_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<Question>, AppError>;
}

#[async_trait]
impl QuestionSource for PgPool {
    async fn questions_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<Question>, AppError> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, text, quiz_id, options, created_at
            FROM questions
            WHERE quiz_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(quiz_id)
        .fetch_all(self)
        .await
        .map_err(|e| AppError::persistence("get quiz questions", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;
    use sqlx::types::Json;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    const Z1: u128 = 0x100;
    const Z2: u128 = 0x200;
    const Q1: u128 = 0x1;
    const Q2: u128 = 0x2;
    const Q3: u128 = 0x3;
    const O1: u128 = 0x11;
    const O2: u128 = 0x12;
    const O3: u128 = 0x13;
    const O4: u128 = 0x14;

    fn question(q: u128, quiz: u128, options: &[(u128, bool)]) -> Question {
        Question {
            id: id(q),
            text: format!("Question {q}"),
            quiz_id: id(quiz),
            options: Json(
                options
                    .iter()
                    .map(|&(o, is_answer)| AnswerOption {
                        id: id(o),
                        text: format!("Option {o}"),
                        is_answer,
                    })
                    .collect(),
            ),
            created_at: chrono::Utc::now(),
        }
    }

    fn two_question_quiz() -> Vec<Question> {
        vec![
            question(Q1, Z1, &[(O1, true), (O2, false)]),
            question(Q2, Z1, &[(O3, false), (O4, true)]),
        ]
    }

    fn answers(pairs: &[(u128, u128)]) -> AnswerMap {
        pairs.iter().map(|&(q, o)| (id(q), id(o))).collect()
    }

    #[test]
    fn one_right_one_wrong() {
        let grade = grade(id(Z1), &two_question_quiz(), &answers(&[(Q1, O1), (Q2, O3)])).unwrap();
        assert_eq!(grade, Grade { score: 1, total: 2 });
    }

    #[test]
    fn stray_question_is_ignored() {
        let mut raw = HashMap::new();
        raw.insert(id(Q1).to_string(), id(O1).to_string());
        raw.insert(id(Q2).to_string(), id(O4).to_string());
        raw.insert(id(Q3).to_string(), "ox".to_string());

        let grade = grade(id(Z1), &two_question_quiz(), &AnswerMap::from(raw)).unwrap();
        assert_eq!(grade, Grade { score: 2, total: 2 });
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let questions: Vec<Question> = (0..5u128)
            .map(|n| question(n + 1, Z1, &[(0x50 + n, false), (0x60 + n, true)]))
            .collect();
        let all: Vec<(u128, u128)> = (0..5u128).map(|n| (n + 1, 0x60 + n)).collect();

        let grade = grade(id(Z1), &questions, &answers(&all)).unwrap();
        assert_eq!(grade, Grade { score: 5, total: 5 });
    }

    #[test]
    fn empty_answers_fail() {
        let err = grade(id(Z1), &two_question_quiz(), &AnswerMap::default()).unwrap_err();
        assert_eq!(err, ValidationError::NoAnswers);
    }

    #[test]
    fn no_questions_fail_regardless_of_answers() {
        assert_eq!(
            grade(id(Z1), &[], &answers(&[(Q1, O1)])).unwrap_err(),
            ValidationError::NoQuestions
        );
        assert_eq!(
            grade(id(Z1), &[], &AnswerMap::default()).unwrap_err(),
            ValidationError::NoQuestions
        );
    }

    #[test]
    fn question_from_other_quiz_never_scores() {
        let mut questions = two_question_quiz();
        questions.push(question(Q3, Z2, &[(0x21, true), (0x22, false)]));

        let grade = grade(id(Z1), &questions, &answers(&[(Q3, 0x21)])).unwrap();
        assert_eq!(grade, Grade { score: 0, total: 3 });
    }

    #[test]
    fn unknown_or_wrong_options_score_zero() {
        let grade = grade(
            id(Z1),
            &two_question_quiz(),
            &answers(&[(Q1, O2), (Q2, 0xdead)]),
        )
        .unwrap();
        assert_eq!(grade, Grade { score: 0, total: 2 });
    }

    #[test]
    fn option_lookup_is_scoped_to_the_question() {
        // O4 is correct, but for Q2, not Q1.
        let grade = grade(id(Z1), &two_question_quiz(), &answers(&[(Q1, O4)])).unwrap();
        assert_eq!(grade, Grade { score: 0, total: 2 });
    }

    #[test]
    fn malformed_ids_count_as_answers_but_score_zero() {
        let mut raw = HashMap::new();
        raw.insert("not-an-id".to_string(), "nope".to_string());

        let grade = grade(id(Z1), &two_question_quiz(), &AnswerMap::from(raw)).unwrap();
        assert_eq!(grade, Grade { score: 0, total: 2 });
    }

    #[test]
    fn aliased_question_ids_score_once() {
        let q = id(Q1);
        let o = id(O1).to_string();
        let mut raw = HashMap::new();
        for key in [
            q.to_string(),
            q.to_string().to_uppercase(),
            q.simple().to_string(),
            format!(" {q} "),
            q.urn().to_string(),
            q.braced().to_string(),
        ] {
            raw.insert(key, o.clone());
        }

        let grade = grade(id(Z1), &two_question_quiz(), &AnswerMap::from(raw)).unwrap();
        assert_eq!(grade, Grade { score: 1, total: 2 });
    }

    #[test]
    fn aliases_with_a_wrong_choice_still_count_the_right_one_once() {
        let mut raw = HashMap::new();
        raw.insert(id(Q1).to_string(), id(O2).to_string());
        raw.insert(id(Q1).to_string().to_uppercase(), id(O1).to_string());
        raw.insert(id(Q2).simple().to_string(), id(O4).to_string());
        raw.insert(id(Q2).to_string(), id(O4).to_string());

        let grade = grade(id(Z1), &two_question_quiz(), &AnswerMap::from(raw)).unwrap();
        assert_eq!(grade, Grade { score: 2, total: 2 });
    }

    #[test]
    fn score_never_exceeds_total() {
        let questions = two_question_quiz();
        for chosen in [O1, O2, O3, O4] {
            let mut raw = HashMap::new();
            for q in [Q1, Q2] {
                let q = id(q);
                raw.insert(q.to_string(), id(chosen).to_string());
                raw.insert(q.to_string().to_uppercase(), id(O1).to_string());
                raw.insert(q.simple().to_string(), id(O4).to_string());
                raw.insert(q.urn().to_string(), id(O4).to_string());
            }

            let grade = grade(id(Z1), &questions, &AnswerMap::from(raw)).unwrap();
            assert_eq!(grade.total, 2);
            assert!(
                (0..=grade.total).contains(&grade.score),
                "score {} out of range for total {}",
                grade.score,
                grade.total
            );
        }
    }

    #[test]
    fn validation_kinds_are_distinct() {
        assert_eq!(ValidationError::NoQuestions.kind(), "no_questions");
        assert_eq!(ValidationError::NoAnswers.kind(), "no_answers");
        assert_eq!(
            ValidationError::MalformedOption(2).to_string(),
            "Options include 2 invalid option(s)"
        );
    }
}
