//! A short linear quiz: one question at a time, each answered exactly once, then a results screen.
//!
//! [`QuizSession`] doesn't touch any UI itself. Each transition returns a list of [`Effect`]s,
//! which the host applies to a [`QuizView`] (see [`apply_effects`]). Delays are left to the host
//! as well, since how to wait depends on where we're running.

use std::path::Path;
use std::time::Duration;

use log::debug;
use log::info;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;
use crate::scroll::ProgressBar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(prompt: &str, options: &[(&str, bool)]) -> Self {
        Self {
            prompt: prompt.to_owned(),
            options: options
                .iter()
                .map(|&(label, correct)| AnswerOption {
                    label: label.to_owned(),
                    correct,
                })
                .collect(),
        }
    }

    /// The first option flagged as correct, if there is one.
    pub fn correct_option(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        QuestionBank {
            questions: vec![
                Question::new(
                    "What does a particle do when it drifts off the right edge?",
                    &[
                        ("Bounces back", false),
                        ("Reappears on the left", true),
                        ("Disappears for good", false),
                    ],
                ),
                Question::new(
                    "How close do two particles need to be before they're linked?",
                    &[
                        ("Under 20 units", false),
                        ("Under 80 units", true),
                        ("Under 200 units", false),
                    ],
                ),
                Question::new(
                    "What leaves the fading trails behind each particle?",
                    &[
                        ("A motion blur shader", false),
                        ("Storing old positions", false),
                        ("Painting a translucent background each frame", true),
                    ],
                ),
                Question::new(
                    "Which colours can a particle be?",
                    &[
                        ("Neon blue or neon pink", true),
                        ("Any colour of the rainbow", false),
                        ("Only white", false),
                    ],
                ),
                Question::new(
                    "What happens to the particles when the window is resized?",
                    &[
                        ("They're stretched to fit", false),
                        ("They keep their positions", false),
                        ("They're all thrown away and reseeded", true),
                    ],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Question `n` (1-based) is on screen and its options are enabled.
    AwaitingAnswer(usize),
    /// Question `n` has been answered; waiting for the delay before moving on.
    Transitioning(usize),
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    HideQuestions,
    ShowQuestion(usize),
    SetProgress(f64),
    DisableOptions(usize),
    MarkOption {
        question: usize,
        option: usize,
        mark: Mark,
    },
    /// The host should call [`QuizSession::advance`] once this has elapsed.
    ScheduleAdvance(Duration),
    ShowResults {
        score: usize,
        total: usize,
    },
}

/// The visible side of the quiz. Missing panels or options should be ignored, not panicked on.
pub trait QuizView: ProgressBar {
    fn hide_questions(&mut self);
    fn show_question(&mut self, question: usize);
    fn disable_options(&mut self, question: usize);
    fn mark_option(&mut self, question: usize, option: usize, mark: Mark);
    fn show_results(&mut self, score: usize, total: usize);
}

/// Applies everything except the delay, which is returned for the host to schedule.
pub fn apply_effects<V: QuizView>(view: &mut V, effects: &[Effect]) -> Option<Duration> {
    let mut delay = None;
    for effect in effects {
        match *effect {
            Effect::HideQuestions => view.hide_questions(),
            Effect::ShowQuestion(question) => view.show_question(question),
            Effect::SetProgress(percent) => view.set_percent(percent),
            Effect::DisableOptions(question) => view.disable_options(question),
            Effect::MarkOption {
                question,
                option,
                mark,
            } => view.mark_option(question, option, mark),
            Effect::ScheduleAdvance(d) => delay = Some(d),
            Effect::ShowResults { score, total } => view.show_results(score, total),
        }
    }
    delay
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    total: usize,
    delay: Duration,

    current: usize,
    score: usize,
    phase: Phase,
}

impl QuizSession {
    /// `total` is how many questions the quiz runs for; it's allowed to disagree with
    /// `questions.len()`, in which case the extra questions just can't be answered.
    pub fn new(questions: Vec<Question>, total: usize, delay: Duration) -> Self {
        if questions.len() != total {
            warn!(
                "quiz has {} questions but is configured for {}",
                questions.len(),
                total
            );
        }

        Self {
            questions,
            total,
            delay,

            current: 1,
            score: 0,
            phase: if total == 0 {
                Phase::Results
            } else {
                Phase::AwaitingAnswer(1)
            },
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question(&self, n: usize) -> Option<&Question> {
        n.checked_sub(1).and_then(|i| self.questions.get(i))
    }

    /// Completed questions as a percentage of the total.
    pub fn progress_percent(&self) -> f64 {
        if self.phase == Phase::Results || self.total == 0 {
            100.0
        } else {
            (self.current - 1) as f64 / self.total as f64 * 100.0
        }
    }

    /// Effects which bring a fresh view in line with the session.
    pub fn start(&self) -> Vec<Effect> {
        match self.phase {
            Phase::Results => self.results(),
            _ => vec![
                Effect::HideQuestions,
                Effect::ShowQuestion(self.current),
                Effect::SetProgress(self.progress_percent()),
            ],
        }
    }

    /// The user picked `option` (0-based) on question `question` (1-based).
    ///
    /// Anything other than the first answer to the question on screen is ignored.
    pub fn select(&mut self, question: usize, option: usize) -> Vec<Effect> {
        if self.phase != Phase::AwaitingAnswer(question) {
            debug!(
                "ignoring answer to question {} while {:?}",
                question, self.phase
            );
            return Vec::new();
        }

        let Some(q) = self.question(question) else {
            warn!("no data for question {}, can't check the answer", question);
            return Vec::new();
        };
        let Some(chosen) = q.options.get(option) else {
            debug!("question {} has no option {}", question, option);
            return Vec::new();
        };

        let mut effects = vec![Effect::DisableOptions(question)];

        if chosen.correct {
            effects.push(Effect::MarkOption {
                question,
                option,
                mark: Mark::Correct,
            });
            self.score += 1;
        } else {
            effects.push(Effect::MarkOption {
                question,
                option,
                mark: Mark::Wrong,
            });
            // Show them what they should have picked.
            if let Some(correct) = q.correct_option() {
                effects.push(Effect::MarkOption {
                    question,
                    option: correct,
                    mark: Mark::Correct,
                });
            }
        }

        // Nothing stays on screen while the delay runs out.
        effects.push(Effect::HideQuestions);
        effects.push(Effect::ScheduleAdvance(self.delay));
        self.phase = Phase::Transitioning(question);
        effects
    }

    /// Move on once the post-answer delay has elapsed.
    pub fn advance(&mut self) -> Vec<Effect> {
        let Phase::Transitioning(question) = self.phase else {
            debug!("nothing to advance from while {:?}", self.phase);
            return Vec::new();
        };

        self.current = question + 1;

        if self.current <= self.total {
            self.phase = Phase::AwaitingAnswer(self.current);
            vec![
                Effect::HideQuestions,
                Effect::ShowQuestion(self.current),
                Effect::SetProgress(self.progress_percent()),
            ]
        } else {
            self.phase = Phase::Results;
            info!("quiz finished with {}/{}", self.score, self.total);
            let mut effects = vec![Effect::HideQuestions];
            effects.extend(self.results());
            effects
        }
    }

    fn results(&self) -> Vec<Effect> {
        vec![
            Effect::SetProgress(100.0),
            Effect::ShowResults {
                score: self.score,
                total: self.total,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    /// Records what's visible, roughly like the DOM would.
    #[derive(Debug, Default)]
    struct FakeView {
        visible: Option<usize>,
        progress: f64,
        disabled: Vec<usize>,
        marks: Vec<(usize, usize, Mark)>,
        results: Option<(usize, usize)>,
    }

    impl ProgressBar for FakeView {
        fn set_percent(&mut self, percent: f64) {
            self.progress = percent;
        }
    }

    impl QuizView for FakeView {
        fn hide_questions(&mut self) {
            self.visible = None;
        }

        fn show_question(&mut self, question: usize) {
            self.visible = Some(question);
        }

        fn disable_options(&mut self, question: usize) {
            self.disabled.push(question);
        }

        fn mark_option(&mut self, question: usize, option: usize, mark: Mark) {
            self.marks.push((question, option, mark));
        }

        fn show_results(&mut self, score: usize, total: usize) {
            self.results = Some((score, total));
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(QuestionBank::default().questions, 5, DELAY)
    }

    fn pick(session: &QuizSession, correct: bool) -> usize {
        let q = session.question(session.current()).unwrap();
        q.options.iter().position(|o| o.correct == correct).unwrap()
    }

    fn answer(session: &mut QuizSession, view: &mut FakeView, correct: bool) {
        let question = session.current();
        let option = pick(session, correct);
        let delay = apply_effects(view, &session.select(question, option));
        assert_eq!(delay, Some(DELAY));
        apply_effects(view, &session.advance());
    }

    #[test]
    fn starts_on_the_first_question() {
        let session = session();
        assert_eq!(session.current(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::AwaitingAnswer(1));

        let mut view = FakeView::default();
        assert_eq!(apply_effects(&mut view, &session.start()), None);
        assert_eq!(view.visible, Some(1));
        assert_eq!(view.progress, 0.0);
    }

    #[test]
    fn full_run_scores_correct_answers() {
        let mut session = session();
        let mut view = FakeView::default();
        apply_effects(&mut view, &session.start());

        for (i, correct) in [true, true, false, true, false].into_iter().enumerate() {
            assert_eq!(view.visible, Some(i + 1));
            assert_eq!(view.progress, i as f64 / 5.0 * 100.0);
            answer(&mut session, &mut view, correct);
        }

        assert_eq!(session.score(), 3);
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(view.visible, None);
        assert_eq!(view.progress, 100.0);
        assert_eq!(view.results, Some((3, 5)));
        assert_eq!(view.disabled, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn answering_twice_changes_nothing() {
        let mut session = session();
        let right = pick(&session, true);
        let wrong = pick(&session, false);

        assert!(!session.select(1, wrong).is_empty());
        let phase = session.phase();

        assert!(session.select(1, right).is_empty());
        assert!(session.select(1, wrong).is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), phase);

        // Still locked after moving on.
        session.advance();
        assert!(session.select(1, right).is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::AwaitingAnswer(2));
    }

    #[test]
    fn wrong_answer_reveals_the_right_one() {
        let mut session = QuizSession::new(
            vec![Question::new("?", &[("a", false), ("b", true), ("c", false)])],
            1,
            DELAY,
        );
        let mut view = FakeView::default();
        apply_effects(&mut view, &session.select(1, 2));

        assert_eq!(view.marks, vec![(1, 2, Mark::Wrong), (1, 1, Mark::Correct)]);
        assert_eq!(view.disabled, vec![1]);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), Phase::Transitioning(1));
    }

    #[test]
    fn answered_question_is_hidden_while_waiting() {
        let mut session = session();
        let mut view = FakeView::default();
        apply_effects(&mut view, &session.start());
        assert_eq!(view.visible, Some(1));

        let option = pick(&session, true);
        let delay = apply_effects(&mut view, &session.select(1, option));

        assert_eq!(delay, Some(DELAY));
        assert_eq!(session.phase(), Phase::Transitioning(1));
        assert_eq!(view.visible, None);
        assert_eq!(view.marks, vec![(1, option, Mark::Correct)]);

        apply_effects(&mut view, &session.advance());
        assert_eq!(view.visible, Some(2));
    }

    #[test]
    fn right_answer_only_marks_itself() {
        let mut session = QuizSession::new(
            vec![Question::new("?", &[("a", true), ("b", false)])],
            1,
            DELAY,
        );
        let mut view = FakeView::default();
        apply_effects(&mut view, &session.select(1, 0));

        assert_eq!(view.marks, vec![(1, 0, Mark::Correct)]);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn missing_correct_option_is_tolerated() {
        let mut session = QuizSession::new(
            vec![Question::new("?", &[("a", false), ("b", false)])],
            1,
            DELAY,
        );
        let effects = session.select(1, 0);
        assert_eq!(
            effects,
            vec![
                Effect::DisableOptions(1),
                Effect::MarkOption {
                    question: 1,
                    option: 0,
                    mark: Mark::Wrong,
                },
                Effect::HideQuestions,
                Effect::ScheduleAdvance(DELAY),
            ]
        );
    }

    #[test]
    fn out_of_turn_events_are_ignored() {
        let mut session = session();

        // Not transitioning yet.
        assert!(session.advance().is_empty());
        // Wrong question, and an option that doesn't exist.
        assert!(session.select(2, 0).is_empty());
        assert!(session.select(1, 99).is_empty());

        assert_eq!(session.phase(), Phase::AwaitingAnswer(1));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn results_are_terminal() {
        let mut session = QuizSession::new(
            vec![Question::new("?", &[("a", true)])],
            1,
            DELAY,
        );
        session.select(1, 0);
        let effects = session.advance();
        assert_eq!(
            effects,
            vec![
                Effect::HideQuestions,
                Effect::SetProgress(100.0),
                Effect::ShowResults { score: 1, total: 1 },
            ]
        );

        assert!(session.advance().is_empty());
        assert!(session.select(1, 0).is_empty());
        assert!(session.select(2, 0).is_empty());
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn empty_quiz_goes_straight_to_results() {
        let session = QuizSession::new(Vec::new(), 0, DELAY);
        assert_eq!(session.phase(), Phase::Results);

        let mut view = FakeView::default();
        apply_effects(&mut view, &session.start());
        assert_eq!(view.results, Some((0, 0)));
        assert_eq!(view.progress, 100.0);
    }

    #[test]
    fn questions_without_data_cannot_be_answered() {
        // Configured for more questions than we actually have.
        let mut session = QuizSession::new(
            vec![Question::new("?", &[("a", true)])],
            2,
            DELAY,
        );
        session.select(1, 0);
        let effects = session.advance();
        assert!(effects.contains(&Effect::ShowQuestion(2)));
        assert!(effects.contains(&Effect::SetProgress(50.0)));

        assert!(session.select(2, 0).is_empty());
        assert_eq!(session.phase(), Phase::AwaitingAnswer(2));
    }

    #[test]
    fn question_bank_parses_from_json() {
        let bank = QuestionBank::from_json(
            r#"[
                { "prompt": "2 + 2?", "options": [
                    { "label": "3" },
                    { "label": "4", "correct": true }
                ] }
            ]"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 1);
        assert_eq!(bank.questions[0].correct_option(), Some(1));
        assert!(!bank.questions[0].options[0].correct);
    }

    #[test]
    fn default_bank_has_one_right_answer_per_question() {
        let bank = QuestionBank::default();
        assert_eq!(bank.len(), 5);
        for q in bank.questions.iter() {
            assert_eq!(q.options.iter().filter(|o| o.correct).count(), 1);
        }
    }
}
