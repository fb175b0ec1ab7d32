//! Test fixtures and factory functions.

use chrono::{DateTime, TimeZone, Utc};

use trainer_core::{Difficulty, QuestionId, QuestionMeta};
use trainer_study_service::SubmitAnswer;

pub const TOPIC_LAW: &str = "Recht";
pub const TOPIC_BUSINESS: &str = "Kaufmännische & finanzielle Führung";

/// A Wednesday afternoon, which earns no time-of-day badge.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 14, 0, 0).unwrap()
}

fn question(id: &str, topic: &str, correct: &[usize], difficulty: Difficulty) -> QuestionMeta {
    QuestionMeta::new(QuestionId::new(id).unwrap(), topic, correct.to_vec())
        .unwrap()
        .with_difficulty(difficulty)
}

/// Nine questions across five topics, in catalog order.
pub fn sample_questions() -> Vec<QuestionMeta> {
    vec![
        question("001", TOPIC_LAW, &[2], Difficulty::Easy),
        question("002", TOPIC_LAW, &[0], Difficulty::Medium),
        question("003", TOPIC_LAW, &[1], Difficulty::Hard),
        question("101", TOPIC_BUSINESS, &[0, 1, 2], Difficulty::Easy),
        question("102", TOPIC_BUSINESS, &[0, 1, 2], Difficulty::Medium),
        question("201", "Technische Normen & Betrieb", &[1], Difficulty::Medium),
        question("202", "Technische Normen & Betrieb", &[1], Difficulty::Easy),
        question(
            "301",
            "Straßenverkehrssicherheit, Unfallverhütung, Umweltschutz",
            &[2],
            Difficulty::Easy,
        ),
        question("401", "Grenzüberschreitender Personenverkehr", &[0, 1, 3], Difficulty::Hard),
    ]
}

pub fn catalog_ids() -> Vec<&'static str> {
    vec!["001", "002", "003", "101", "102", "201", "202", "301", "401"]
}

/// The correct selection for a sample question.
pub fn correct_answer(question_id: &str, time_spent_secs: i64) -> SubmitAnswer {
    let selected = sample_questions()
        .into_iter()
        .find(|q| q.id.as_str() == question_id)
        .map(|q| q.correct_answers)
        .expect("Unknown sample question");
    answer(question_id, selected, time_spent_secs)
}

/// A selection no sample question accepts.
pub fn wrong_answer(question_id: &str, time_spent_secs: i64) -> SubmitAnswer {
    answer(question_id, vec![3, 4], time_spent_secs)
}

pub fn answer(
    question_id: &str,
    selected_answers: Vec<usize>,
    time_spent_secs: i64,
) -> SubmitAnswer {
    SubmitAnswer {
        question_id: QuestionId::new(question_id).unwrap(),
        selected_answers,
        time_spent_secs,
    }
}
