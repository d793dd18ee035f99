//! Questions and question banks
//!
//! A bank is a static, validated list of questions. Games draw their
//! questions from a bank through the [`QuestionSource`] trait.

use crate::game::QUESTIONS_PER_GAME;
use crate::QuizError;
use anyhow::Context;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Every question offers exactly this many answers
pub const ANSWERS_PER_QUESTION: usize = 4;

/// A single trivia question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub answers: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub correct_answer: usize,
}

impl Question {
    pub fn new(id: u32, question: &str, answers: [&str; ANSWERS_PER_QUESTION], correct_answer: usize) -> Self {
        Self {
            id,
            question: question.to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct_answer,
        }
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer
    }

    /// Letter shown next to an answer: A, B, C, D
    pub fn answer_label(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    pub fn validate(&self) -> std::result::Result<(), QuizError> {
        let invalid = |reason: String| QuizError::InvalidQuestion { id: self.id, reason };

        if self.question.trim().is_empty() {
            return Err(invalid("question text is empty".to_string()));
        }
        if self.answers.len() != ANSWERS_PER_QUESTION {
            return Err(invalid(format!(
                "expected {} answers, found {}",
                ANSWERS_PER_QUESTION,
                self.answers.len()
            )));
        }
        if let Some(pos) = self.answers.iter().position(|a| a.trim().is_empty()) {
            return Err(invalid(format!("answer {} is empty", Self::answer_label(pos))));
        }
        if self.correct_answer >= self.answers.len() {
            return Err(invalid(format!(
                "correct answer index {} is out of range",
                self.correct_answer
            )));
        }
        Ok(())
    }
}

/// Anything that can hand out the full list of questions
pub trait QuestionSource {
    fn questions(&self) -> &[Question];
}

/// A validated, immutable list of questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

/// On-disk shape of a question bank file
#[derive(Debug, Deserialize)]
struct BankFile {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting invalid questions, duplicate ids and banks
    /// too small to fill a game
    pub fn new(questions: Vec<Question>) -> std::result::Result<Self, QuizError> {
        let mut seen = HashSet::new();
        for q in &questions {
            q.validate()?;
            if !seen.insert(q.id) {
                return Err(QuizError::DuplicateQuestionId(q.id));
            }
        }
        if questions.len() < QUESTIONS_PER_GAME {
            return Err(QuizError::NotEnoughQuestions {
                available: questions.len(),
                required: QUESTIONS_PER_GAME,
            });
        }
        Ok(Self { questions })
    }

    /// The bank shipped with the game
    pub fn builtin() -> Self {
        Self { questions: builtin_questions() }
    }

    /// Load a bank from a `.toml` or `.json` file with a top-level
    /// `questions` list
    pub fn load(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading question bank {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let bank = Self::parse(&raw, &ext)
            .with_context(|| format!("parsing question bank {}", path.display()))?;
        tracing::info!(path = %path.display(), questions = bank.len(), "loaded question bank");
        Ok(bank)
    }

    /// Parse bank contents given a format name (`toml` or `json`)
    pub fn parse(raw: &str, format: &str) -> crate::Result<Self> {
        let file: BankFile = match format {
            "toml" => toml::from_str(raw)?,
            "json" => serde_json::from_str(raw)?,
            other => return Err(QuizError::UnsupportedBankFormat(other.to_string()).into()),
        };
        Ok(Self::new(file.questions)?)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Draw `count` distinct questions uniformly at random, in random order
pub fn sample_questions<S, R>(
    source: &S,
    count: usize,
    rng: &mut R,
) -> std::result::Result<Vec<Question>, QuizError>
where
    S: QuestionSource + ?Sized,
    R: Rng + ?Sized,
{
    let pool = source.questions();
    if pool.len() < count {
        return Err(QuizError::NotEnoughQuestions {
            available: pool.len(),
            required: count,
        });
    }

    let mut picked: Vec<Question> = pool.choose_multiple(rng, count).cloned().collect();
    picked.shuffle(rng);
    Ok(picked)
}

fn builtin_questions() -> Vec<Question> {
    vec![
        Question::new(1, "What is the capital of Indonesia?", ["Jakarta", "Bandung", "Surabaya", "Medan"], 0),
        Question::new(2, "What is 15 + 27?", ["41", "42", "43", "44"], 1),
        Question::new(3, "Who invented the light bulb?", ["Nikola Tesla", "Thomas Edison", "Benjamin Franklin", "Alexander Bell"], 1),
        Question::new(4, "Which is the largest planet in the solar system?", ["Saturn", "Jupiter", "Uranus", "Neptune"], 1),
        Question::new(5, "Which programming language was developed at Google?", ["Python", "Java", "Go", "Rust"], 2),
        Question::new(6, "How many provinces does Indonesia have today?", ["34", "35", "36", "38"], 3),
        Question::new(7, "What is the largest organ of the human body?", ["Liver", "Lungs", "Skin", "Heart"], 2),
        Question::new(8, "Who was the first president of Indonesia?", ["Soekarno", "Soeharto", "Habibie", "Megawati"], 0),
        Question::new(9, "What is the chemical formula of water?", ["H2O", "CO2", "NaCl", "O2"], 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn numbered(count: u32) -> Vec<Question> {
        (1..=count)
            .map(|id| Question::new(id, &format!("Question {id}?"), ["a", "b", "c", "d"], 0))
            .collect()
    }

    #[test]
    fn builtin_bank_is_valid() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.len(), 9);
        assert!(QuestionBank::new(bank.questions().to_vec()).is_ok());
    }

    #[test]
    fn rejects_wrong_answer_count() {
        let mut q = Question::new(1, "Q?", ["a", "b", "c", "d"], 0);
        q.answers.pop();
        assert!(matches!(q.validate(), Err(QuizError::InvalidQuestion { id: 1, .. })));
    }

    #[test]
    fn rejects_out_of_range_correct_answer() {
        let q = Question::new(7, "Q?", ["a", "b", "c", "d"], 4);
        assert!(matches!(q.validate(), Err(QuizError::InvalidQuestion { id: 7, .. })));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut questions = numbered(6);
        questions[5].id = 2;
        assert_eq!(QuestionBank::new(questions), Err(QuizError::DuplicateQuestionId(2)));
    }

    #[test]
    fn rejects_banks_too_small_for_a_game() {
        assert_eq!(
            QuestionBank::new(numbered(5)),
            Err(QuizError::NotEnoughQuestions { available: 5, required: 6 })
        );
    }

    #[test]
    fn parses_toml_bank() {
        let raw = (1..=6)
            .map(|id| {
                format!(
                    "[[questions]]\nid = {id}\nquestion = \"Q{id}?\"\nanswers = [\"a\", \"b\", \"c\", \"d\"]\ncorrect_answer = 2\n"
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let bank = QuestionBank::parse(&raw, "toml").expect("toml bank");
        assert_eq!(bank.len(), 6);
        assert_eq!(bank.questions()[0].correct_answer, 2);
    }

    #[test]
    fn parses_json_bank_with_camel_case_answer_field() {
        let items: Vec<String> = (1..=6)
            .map(|id| {
                format!(r#"{{"id": {id}, "question": "Q{id}?", "answers": ["a","b","c","d"], "correctAnswer": 3}}"#)
            })
            .collect();
        let raw = format!(r#"{{"questions": [{}]}}"#, items.join(","));
        let bank = QuestionBank::parse(&raw, "json").expect("json bank");
        assert_eq!(bank.questions()[5].correct_answer, 3);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = QuestionBank::parse("", "yaml").unwrap_err();
        assert_eq!(
            err.downcast_ref::<QuizError>(),
            Some(&QuizError::UnsupportedBankFormat("yaml".to_string()))
        );
    }

    #[test]
    fn sample_is_distinct_and_sized() {
        let bank = QuestionBank::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = sample_questions(&bank, 6, &mut rng).expect("sample");
            assert_eq!(picked.len(), 6);
            let ids: HashSet<u32> = picked.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 6);
        }
    }

    #[test]
    fn sample_is_deterministic_for_a_seed() {
        let bank = QuestionBank::builtin();
        let a = sample_questions(&bank, 6, &mut StdRng::seed_from_u64(42)).expect("sample");
        let b = sample_questions(&bank, 6, &mut StdRng::seed_from_u64(42)).expect("sample");
        assert_eq!(a, b);
    }

    #[test]
    fn sample_refuses_small_pool() {
        let bank = QuestionBank::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            sample_questions(&bank, 10, &mut rng),
            Err(QuizError::NotEnoughQuestions { available: 9, required: 10 })
        );
    }

    #[test]
    fn answer_labels() {
        assert_eq!(Question::answer_label(0), 'A');
        assert_eq!(Question::answer_label(3), 'D');
    }
}
