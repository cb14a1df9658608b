use std::time::Duration;

use log::info;
use rand::Rng;

use crate::error::Result;
use crate::field::Field;
use crate::quiz::apply_effects;
use crate::quiz::Question;
use crate::quiz::QuizSession;
use crate::quiz::QuizView;
use crate::scroll::ProgressBar;
use crate::scroll::ScrollIndicator;
use crate::scroll::ScrollMetrics;
use crate::settings::Settings;
use crate::surface::Surface;

/// Everything running on the page: the background field, the reading progress bar and the quiz.
///
/// None of the three know about each other; this just routes host events to the right one.
pub struct Page<R> {
    pub field: Field,
    pub scroll: ScrollIndicator,
    pub quiz: QuizSession,
    rng: R,
}

impl<R: Rng> Page<R> {
    pub fn new(settings: Settings, questions: Vec<Question>, rng: R) -> Result<Self> {
        settings.validate()?;

        let quiz = QuizSession::new(
            questions,
            settings.total_questions,
            settings.answer_delay(),
        );

        Ok(Self {
            field: Field::new(settings),
            scroll: ScrollIndicator::new(),
            quiz,
            rng,
        })
    }

    /// The one-time setup once the page has finished loading.
    pub fn on_load<B, V>(
        &mut self,
        size: (f64, f64),
        metrics: &ScrollMetrics,
        scroll_bar: &mut B,
        quiz_view: &mut V,
    ) where
        B: ProgressBar,
        V: QuizView,
    {
        self.on_resize(size);
        self.scroll.update(metrics, scroll_bar);
        quiz_view.set_percent(self.quiz.progress_percent());
        apply_effects(quiz_view, &self.quiz.start());

        info!(
            "page loaded at {}x{} with {} particles and {} questions",
            size.0,
            size.1,
            self.field.particles.len(),
            self.quiz.total()
        );
    }

    pub fn on_resize(&mut self, (width, height): (f64, f64)) {
        self.field.resize(width, height, &mut self.rng);
    }

    pub fn on_frame<S: Surface>(&mut self, surface: &mut S) {
        self.field.frame(surface);
    }

    pub fn on_scroll<B: ProgressBar>(&mut self, metrics: &ScrollMetrics, bar: &mut B) -> f64 {
        self.scroll.update(metrics, bar)
    }

    /// Returns how long to wait before calling [`Page::on_advance`], if the answer was accepted.
    pub fn on_select<V: QuizView>(
        &mut self,
        question: usize,
        option: usize,
        view: &mut V,
    ) -> Option<Duration> {
        apply_effects(view, &self.quiz.select(question, option))
    }

    pub fn on_advance<V: QuizView>(&mut self, view: &mut V) {
        apply_effects(view, &self.quiz.advance());
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;
    use crate::quiz::Mark;
    use crate::quiz::Phase;
    use crate::quiz::QuestionBank;
    use crate::surface::CommandBuffer;

    #[derive(Default)]
    struct Bar(f64);

    impl ProgressBar for Bar {
        fn set_percent(&mut self, percent: f64) {
            self.0 = percent;
        }
    }

    #[derive(Default)]
    struct View {
        progress: Vec<f64>,
        shown: Vec<usize>,
        hidden: usize,
        results: Option<(usize, usize)>,
    }

    impl ProgressBar for View {
        fn set_percent(&mut self, percent: f64) {
            self.progress.push(percent);
        }
    }

    impl QuizView for View {
        fn hide_questions(&mut self) {
            self.hidden += 1;
        }

        fn show_question(&mut self, question: usize) {
            self.shown.push(question);
        }

        fn disable_options(&mut self, _question: usize) {}

        fn mark_option(&mut self, _question: usize, _option: usize, _mark: Mark) {}

        fn show_results(&mut self, score: usize, total: usize) {
            self.results = Some((score, total));
        }
    }

    fn page() -> Page<StdRng> {
        Page::new(
            Settings::default(),
            QuestionBank::default().questions,
            StdRng::seed_from_u64(9),
        )
        .unwrap()
    }

    #[test]
    fn load_sets_everything_up() {
        let mut page = page();
        let mut bar = Bar(-1.0);
        let mut view = View::default();
        let metrics = ScrollMetrics {
            scroll_height: 2000.0,
            client_height: 1000.0,
            offset: 0.0,
        };

        page.on_load((1280.0, 720.0), &metrics, &mut bar, &mut view);

        assert_eq!(page.field.particles.len(), 100);
        assert_eq!((page.field.width, page.field.height), (1280.0, 720.0));
        assert_eq!(bar.0, 0.0);
        assert_eq!(view.progress, vec![0.0, 0.0]);
        assert_eq!(view.shown, vec![1]);
        assert_eq!(view.hidden, 1);
        assert_eq!(view.results, None);
        assert_eq!(page.quiz.phase(), Phase::AwaitingAnswer(1));
    }

    #[test]
    fn events_reach_the_right_subsystem() {
        let mut page = page();
        let mut bar = Bar::default();
        let mut view = View::default();
        page.on_load((800.0, 600.0), &ScrollMetrics::default(), &mut bar, &mut view);

        let metrics = ScrollMetrics {
            scroll_height: 3000.0,
            client_height: 1000.0,
            offset: 1000.0,
        };
        assert_eq!(page.on_scroll(&metrics, &mut bar), 50.0);
        assert_eq!(bar.0, 50.0);

        let mut surface = CommandBuffer::new();
        page.on_frame(&mut surface);
        assert_eq!(surface.circles().count(), 100);

        let correct = page.quiz.question(1).unwrap().correct_option().unwrap();
        let delay = page.on_select(1, correct, &mut view);
        assert_eq!(delay, Some(Duration::from_millis(1000)));
        assert_eq!(page.on_select(1, correct, &mut view), None);

        page.on_advance(&mut view);
        assert_eq!(view.shown, vec![1, 2]);
        assert_eq!(page.quiz.score(), 1);

        page.on_resize((1920.0, 1080.0));
        assert_eq!(page.field.particles.len(), 100);
        assert!(page
            .field
            .particles
            .iter()
            .all(|p| p.x < 1920.0 && p.y < 1080.0));
    }

    #[test]
    fn select_hands_back_the_configured_delay() {
        let settings = Settings {
            answer_delay_ms: 250,
            ..Settings::default()
        };
        let mut page = Page::new(
            settings,
            QuestionBank::default().questions,
            StdRng::seed_from_u64(4),
        )
        .unwrap();
        let mut view = View::default();
        page.on_load((800.0, 600.0), &ScrollMetrics::default(), &mut Bar::default(), &mut view);

        assert_eq!(page.on_select(1, 0, &mut view), Some(Duration::from_millis(250)));
    }

    #[test]
    fn invalid_settings_are_refused() {
        let settings = Settings {
            max_radius: -1.0,
            ..Settings::default()
        };
        let result = Page::new(settings, Vec::new(), StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(Error::InvalidSetting {
                name: "max_radius",
                ..
            })
        ));
    }
}
