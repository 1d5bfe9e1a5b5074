//! Tests for scoring and batch sampling.

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::{
        AnswerOption, Question, QuestionHistory, UNSEEN_SCORE, rank_questions, score_question,
        select_batch,
    };

    fn question(id: &str) -> Question {
        Question {
            id: id.to_owned(),
            certification_id: "cert-1".to_owned(),
            question_text: format!("Question {id}?"),
            option_a: "a".to_owned(),
            option_b: "b".to_owned(),
            option_c: "c".to_owned(),
            option_d: "d".to_owned(),
            correct_answer: AnswerOption::B,
            explanation: "because".to_owned(),
            difficulty_level: 2,
            topic: "networking".to_owned(),
            source_url: None,
            approved: true,
            times_answered: 0,
            times_correct: 0,
            created_at: Utc::now(),
        }
    }

    fn questions(prefix: &str, n: usize) -> Vec<Question> {
        (0..n).map(|i| question(&format!("{prefix}-{i}"))).collect()
    }

    fn seen(question_id: &str, times_seen: i32, times_correct: i32) -> QuestionHistory {
        let mut h = QuestionHistory::unseen("user-1", question_id, Utc::now());
        for i in 0..times_seen {
            h.record_answer(i < times_correct, Utc::now());
        }
        h
    }

    fn ids(batch: &[Question]) -> HashSet<String> {
        batch.iter().map(|q| q.id.clone()).collect()
    }

    #[test]
    fn unseen_question_gets_maximum_score() {
        assert!((score_question(None) - UNSEEN_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn seen_question_blends_mastery_and_failure() {
        // 4 seen, 2 correct: mastery = 50 + 8 = 58, success = 0.5
        let h = seen("q", 4, 2);
        assert_eq!(h.mastery_level, 58);
        let expected = 0.6 * 42.0 + 0.3 * 50.0 + 20.0;
        assert!((score_question(Some(&h)) - expected).abs() < 1e-9);
    }

    #[test]
    fn mastered_question_scores_only_the_flat_bonus() {
        let h = seen("q", 5, 5);
        assert!((score_question(Some(&h)) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn ranking_orders_by_need() {
        let qs = vec![question("strong"), question("weak"), question("new")];
        let mut history = HashMap::new();
        history.insert("strong".to_owned(), seen("strong", 6, 6));
        history.insert("weak".to_owned(), seen("weak", 3, 0));

        let ranked = rank_questions(&qs, &history);
        let order: Vec<&str> = ranked.iter().map(|s| s.question.id.as_str()).collect();
        // A repeatedly failed question (106.4) outranks an unseen one (100).
        assert_eq!(order, vec!["weak", "new", "strong"]);
    }

    #[test]
    fn empty_certification_yields_empty_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_batch(&[], &HashMap::new(), &mut rng).is_empty());
    }

    #[test]
    fn fewer_than_ten_questions_returns_all_of_them() {
        let qs = questions("q", 5);
        let mut rng = StdRng::seed_from_u64(7);
        let batch = select_batch(&qs, &HashMap::new(), &mut rng);
        assert_eq!(batch.len(), 5);
        assert_eq!(ids(&batch), ids(&qs));
    }

    #[test]
    fn batch_is_capped_and_free_of_duplicates() {
        let qs = questions("q", 60);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = select_batch(&qs, &HashMap::new(), &mut rng);
            assert_eq!(batch.len(), 10);
            assert_eq!(ids(&batch).len(), 10, "duplicate in batch for seed {seed}");
        }
    }

    #[test]
    fn exactly_ten_questions_are_all_selected() {
        let qs = questions("q", 10);
        let mut rng = StdRng::seed_from_u64(3);
        let batch = select_batch(&qs, &HashMap::new(), &mut rng);
        assert_eq!(ids(&batch), ids(&qs));
    }

    #[test]
    fn new_user_batch_contains_only_unseen_scores() {
        let qs = questions("q", 40);
        let history = HashMap::new();
        let mut rng = StdRng::seed_from_u64(11);
        let batch = select_batch(&qs, &history, &mut rng);
        assert!(batch.iter().all(|q| {
            (score_question(history.get(&q.id)) - UNSEEN_SCORE).abs() < f64::EPSILON
        }));
    }

    #[test]
    fn unseen_questions_crowd_out_mastered_ones() {
        let mut qs = questions("new", 24);
        let mastered = questions("old", 20);
        let mut history = HashMap::new();
        for q in &mastered {
            history.insert(q.id.clone(), seen(&q.id, 8, 8));
        }
        qs.extend(mastered);

        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = select_batch(&qs, &history, &mut rng);
            assert_eq!(batch.len(), 10);
            assert!(batch.iter().all(|q| q.id.starts_with("new-")), "seed {seed}");
        }
    }

    #[test]
    fn draws_stay_inside_the_candidate_pool() {
        // 30 weak questions outrank 30 mastered ones, so the pool is exactly the weak set.
        let weak = questions("weak", 30);
        let strong = questions("strong", 30);
        let mut history = HashMap::new();
        for q in &weak {
            history.insert(q.id.clone(), seen(&q.id, 2, 0));
        }
        for q in &strong {
            history.insert(q.id.clone(), seen(&q.id, 9, 9));
        }
        let mut qs = strong;
        qs.extend(weak);

        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = select_batch(&qs, &history, &mut rng);
            assert!(batch.iter().all(|q| q.id.starts_with("weak-")), "seed {seed}");
        }
    }

    #[test]
    fn sampling_varies_between_days() {
        let qs = questions("q", 40);
        let mut distinct = HashSet::new();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut batch: Vec<String> =
                select_batch(&qs, &HashMap::new(), &mut rng).into_iter().map(|q| q.id).collect();
            batch.sort();
            distinct.insert(batch);
        }
        assert!(distinct.len() > 1, "every seed produced the same batch");
    }

    #[test]
    fn same_seed_reproduces_the_batch() {
        let qs = questions("q", 40);
        let a = select_batch(&qs, &HashMap::new(), &mut StdRng::seed_from_u64(99));
        let b = select_batch(&qs, &HashMap::new(), &mut StdRng::seed_from_u64(99));
        let a: Vec<&str> = a.iter().map(|q| q.id.as_str()).collect();
        let b: Vec<&str> = b.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(a, b);
    }
}
