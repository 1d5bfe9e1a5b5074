//! Mastery-weighted daily batch sampling.
//!
//! Pure over its inputs: the caller loads questions and history and supplies
//! the random source, so tests can seed it.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::{
    BACKFILL_MIN_APPROVED, CANDIDATE_POOL_SIZE, DAILY_BATCH_SIZE, DRAW_WINDOW_SIZE,
    FAILURE_WEIGHT, MASTERY_WEIGHT, RECENCY_BONUS, UNSEEN_SCORE,
};
use crate::{Question, QuestionHistory};

/// Priority of a question for re-exposure. Higher means more in need of practice.
#[must_use]
pub fn score_question(history: Option<&QuestionHistory>) -> f64 {
    let Some(h) = history else {
        return UNSEEN_SCORE;
    };
    let mastery_gap = 100.0 - f64::from(h.mastery_level);
    let failure = 100.0 * (1.0 - h.success_rate());
    MASTERY_WEIGHT * mastery_gap + FAILURE_WEIGHT * failure + RECENCY_BONUS
}

#[derive(Debug, Clone)]
pub struct ScoredQuestion<'a> {
    pub question: &'a Question,
    pub score: f64,
}

/// Score every question and order them by descending score.
#[must_use]
pub fn rank_questions<'a>(
    questions: &'a [Question],
    history: &HashMap<String, QuestionHistory>,
) -> Vec<ScoredQuestion<'a>> {
    let mut scored: Vec<ScoredQuestion<'a>> = questions
        .iter()
        .map(|q| ScoredQuestion { question: q, score: score_question(history.get(&q.id)) })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Draw today's batch of at most [`DAILY_BATCH_SIZE`] questions.
///
/// The top [`CANDIDATE_POOL_SIZE`] candidates form a pool; each draw picks
/// uniformly from the first [`DRAW_WINDOW_SIZE`] remaining entries. If the
/// pool runs dry and the certification has enough approved questions, the
/// rest is backfilled uniformly at random without duplicates.
pub fn select_batch<R: Rng + ?Sized>(
    questions: &[Question],
    history: &HashMap<String, QuestionHistory>,
    rng: &mut R,
) -> Vec<Question> {
    if questions.is_empty() {
        return Vec::new();
    }

    let mut pool = rank_questions(questions, history);
    pool.truncate(CANDIDATE_POOL_SIZE);

    let mut selected: Vec<Question> = Vec::with_capacity(DAILY_BATCH_SIZE);
    while selected.len() < DAILY_BATCH_SIZE && !pool.is_empty() {
        let window = DRAW_WINDOW_SIZE.min(pool.len());
        let picked = pool.remove(rng.gen_range(0..window));
        selected.push(picked.question.clone());
    }

    if selected.len() < DAILY_BATCH_SIZE && questions.len() >= BACKFILL_MIN_APPROVED {
        let taken: HashSet<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        let remaining: Vec<&Question> =
            questions.iter().filter(|q| !taken.contains(q.id.as_str())).collect();
        let need = DAILY_BATCH_SIZE - selected.len();
        let fill: Vec<Question> =
            remaining.choose_multiple(rng, need).map(|q| (*q).clone()).collect();
        selected.extend(fill);
    }

    selected.truncate(DAILY_BATCH_SIZE);
    selected
}
