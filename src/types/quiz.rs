use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, de};

use handle_errors::Error;

use crate::types::{category::CategoryId, question::{Question, QuestionId}};

/// Which questions a quiz draws from. Id `0` on the wire means every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(CategoryId),
}

impl From<i32> for CategoryFilter {
    fn from(id: i32) -> Self {
        match id {
            0 => CategoryFilter::All,
            id => CategoryFilter::Category(CategoryId(id)),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Clients send the id either as a number or as a numeric string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i32),
            Text(String),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Number(id) => id,
            RawId::Text(id) => id
                .trim()
                .parse::<i32>()
                .map_err(|_| de::Error::custom(format!("invalid category id: {:?}", id)))?,
        };
        Ok(CategoryFilter::from(id))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizCategory {
    pub id: CategoryFilter,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct QuizRequest {
    pub previous_questions: Option<Vec<QuestionId>>,
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    /// Split the request into the category to draw from and the ids already shown.
    pub fn validate(self) -> Result<(CategoryFilter, HashSet<QuestionId>), Error> {
        let previous = self
            .previous_questions
            .ok_or(Error::MissingQuizField("previous_questions"))?;
        let category = self
            .quiz_category
            .ok_or(Error::MissingQuizField("quiz_category"))?;
        Ok((category.id, previous.into_iter().collect()))
    }
}

/// Outcome of drawing the next quiz question.
#[derive(Debug, PartialEq)]
pub enum Selection<'a> {
    Next(&'a Question),
    /// Every candidate has already been shown in this session.
    Exhausted,
}

impl<'a> Selection<'a> {
    pub fn question(&self) -> Option<&'a Question> {
        match self {
            Selection::Next(question) => Some(*question),
            Selection::Exhausted => None,
        }
    }
}

/// Pick one candidate uniformly at random among those not in `excluded`.
///
/// The candidates are filtered first and drawn from once, so a fully
/// excluded set terminates with [`Selection::Exhausted`].
pub fn select_next<'a, R>(
    candidates: &'a [Question],
    excluded: &HashSet<QuestionId>,
    rng: &mut R,
) -> Selection<'a>
where
    R: Rng + ?Sized,
{
    let eligible: Vec<&Question> = candidates
        .iter()
        .filter(|q| !excluded.contains(&q.id))
        .collect();

    match eligible.choose(rng) {
        Some(question) => Selection::Next(*question),
        None => Selection::Exhausted,
    }
}

#[cfg(test)]
mod quiz_tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn question(id: i32, category: i32) -> Question {
        Question {
            id: QuestionId(id),
            text: format!("Question {}", id),
            answer: format!("Answer {}", id),
            category: CategoryId(category),
            difficulty: 1,
        }
    }

    fn ids(ids: &[i32]) -> HashSet<QuestionId> {
        ids.iter().map(|id| QuestionId(*id)).collect()
    }

    #[test]
    fn never_returns_an_excluded_question() {
        let candidates = vec![question(1, 5), question(2, 5), question(3, 5)];
        let excluded = ids(&[2]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let picked = select_next(&candidates, &excluded, &mut rng)
                .question()
                .expect("one question should remain");
            assert_ne!(picked.id, QuestionId(2));
            assert_eq!(picked.category, CategoryId(5));
        }
    }

    #[test]
    fn every_eligible_question_can_be_drawn() {
        let candidates: Vec<Question> = (1..=6).map(|id| question(id, 1)).collect();
        let excluded = ids(&[1, 4]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashMap<QuestionId, u32> = HashMap::new();

        for _ in 0..1000 {
            if let Selection::Next(q) = select_next(&candidates, &excluded, &mut rng) {
                *seen.entry(q.id).or_default() += 1;
            }
        }

        let mut drawn: Vec<i32> = seen.keys().map(|id| id.0).collect();
        drawn.sort();
        assert_eq!(drawn, vec![2, 3, 5, 6]);
        // 250 expected per question
        assert!(seen.values().all(|count| *count > 150));
    }

    #[test]
    fn fully_excluded_candidates_are_exhausted() {
        let candidates = vec![question(1, 1), question(2, 1)];
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            select_next(&candidates, &ids(&[1, 2]), &mut rng),
            Selection::Exhausted
        );
        assert_eq!(
            select_next(&candidates, &ids(&[1, 2, 99]), &mut rng),
            Selection::Exhausted
        );
    }

    #[test]
    fn no_candidates_are_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            select_next(&[], &HashSet::new(), &mut rng),
            Selection::Exhausted
        );
    }

    #[test]
    fn randomized_exclusion_trials() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..100 {
            let len = rng.gen_range(1..20);
            let candidates: Vec<Question> = (1..=len).map(|id| question(id, 3)).collect();
            let excluded: HashSet<QuestionId> = (1..=len)
                .filter(|_| rng.gen_bool(0.5))
                .map(QuestionId)
                .collect();

            match select_next(&candidates, &excluded, &mut rng) {
                Selection::Next(q) => assert!(!excluded.contains(&q.id)),
                Selection::Exhausted => assert_eq!(excluded.len(), len as usize),
            }
        }
    }

    #[test]
    fn same_seed_gives_same_question() {
        let candidates: Vec<Question> = (1..=10).map(|id| question(id, 2)).collect();
        let excluded = ids(&[3]);

        let first = select_next(&candidates, &excluded, &mut StdRng::seed_from_u64(9));
        let second = select_next(&candidates, &excluded, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn category_id_accepts_numbers_and_strings() {
        let all: QuizCategory = serde_json::from_str(r#"{"id": 0, "type": "click"}"#).unwrap();
        let by_number: QuizCategory = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        let by_string: QuizCategory =
            serde_json::from_str(r#"{"type": "Entertainment", "id": "5"}"#).unwrap();

        assert_eq!(all.id, CategoryFilter::All);
        assert_eq!(by_number.id, CategoryFilter::Category(CategoryId(5)));
        assert_eq!(by_string.id, by_number.id);
        assert!(serde_json::from_str::<QuizCategory>(r#"{"id": "five"}"#).is_err());
    }

    #[test]
    fn request_requires_both_fields() {
        let missing_previous: QuizRequest =
            serde_json::from_str(r#"{"quiz_category": {"id": 1}}"#).unwrap();
        let missing_category: QuizRequest =
            serde_json::from_str(r#"{"previous_questions": []}"#).unwrap();

        assert!(matches!(
            missing_previous.validate(),
            Err(Error::MissingQuizField("previous_questions"))
        ));
        assert!(matches!(
            missing_category.validate(),
            Err(Error::MissingQuizField("quiz_category"))
        ));
    }

    #[test]
    fn valid_request_builds_exclusion_set() {
        let request: QuizRequest = serde_json::from_str(
            r#"{"previous_questions": [2, 9, 2], "quiz_category": {"type": "Science", "id": 1}}"#,
        )
        .unwrap();
        let (filter, excluded) = request.validate().unwrap();

        assert_eq!(filter, CategoryFilter::Category(CategoryId(1)));
        assert_eq!(excluded, ids(&[2, 9]));
    }
}
