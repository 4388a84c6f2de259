//! Psychological profile quiz
//!
//! A quiz is a list of multiple-choice questions. Each answer adds points to
//! one or more outcomes; the outcome with the highest total is the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    #[error("unable to read quiz: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid quiz: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("quiz has no outcomes")]
    NoOutcomes,
    #[error("question {0} needs at least two answers")]
    TooFewAnswers(usize),
    #[error("question {question} scores unknown outcome '{outcome}'")]
    UnknownOutcome { question: usize, outcome: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub scores: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub trait_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub outcomes: Vec<Outcome>,
}

impl Quiz {
    pub fn load(path: &Path) -> Result<Self, QuizError> {
        let json = fs::read_to_string(path)?;
        let quiz: Quiz = serde_json::from_str(&json)?;
        quiz.validate()?;
        Ok(quiz)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.outcomes.is_empty() {
            return Err(QuizError::NoOutcomes);
        }

        for (index, question) in self.questions.iter().enumerate() {
            if question.answers.len() < 2 {
                return Err(QuizError::TooFewAnswers(index));
            }
            for answer in &question.answers {
                if let Some(unknown) = answer.scores.keys().find(|key| self.outcome(key).is_none()) {
                    return Err(QuizError::UnknownOutcome {
                        question: index,
                        outcome: unknown.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn outcome(&self, trait_id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.trait_id == trait_id)
    }
}

/// One run through a quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: Vec<usize>,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        QuizSession {
            quiz,
            answers: Vec::new(),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// The question awaiting an answer, `None` once complete
    pub fn current(&self) -> Option<&Question> {
        self.quiz.questions.get(self.answers.len())
    }

    /// Zero-based index of the current question
    pub fn position(&self) -> usize {
        self.answers.len()
    }

    /// Records `choice` for the current question
    ///
    /// Returns `false` when the quiz is complete or `choice` is out of range.
    pub fn answer(&mut self, choice: usize) -> bool {
        match self.current() {
            Some(question) if choice < question.answers.len() => {
                self.answers.push(choice);
                true
            }
            _ => false,
        }
    }

    /// Undoes the last answer
    pub fn back(&mut self) -> bool {
        self.answers.pop().is_some()
    }

    /// Fraction of questions answered, 0.0..=1.0
    pub fn progress(&self) -> f32 {
        self.answers.len() as f32 / self.quiz.questions.len().max(1) as f32
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.quiz.questions.len()
    }

    /// Totals per outcome in outcome order
    pub fn totals(&self) -> Vec<(&Outcome, i32)> {
        self.quiz
            .outcomes
            .iter()
            .map(|outcome| {
                let total = self
                    .answers
                    .iter()
                    .zip(&self.quiz.questions)
                    .filter_map(|(&choice, question)| question.answers[choice].scores.get(&outcome.trait_id))
                    .sum();
                (outcome, total)
            })
            .collect()
    }

    /// The winning outcome once every question is answered
    ///
    /// Ties go to the outcome listed first.
    pub fn result(&self) -> Option<&Outcome> {
        if !self.is_complete() {
            return None;
        }

        let mut best: Option<(&Outcome, i32)> = None;
        for (outcome, total) in self.totals() {
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((outcome, total)),
            }
        }
        best.map(|(outcome, _)| outcome)
    }
}
