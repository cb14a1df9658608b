//! Runs the page in a terminal: a short headless preview of the background, then the quiz.
//!
//! Usage: `backdrop [settings.json] [questions.json]`

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::BufRead;
    use std::io::Write;
    use std::time::Duration;

    use backdrop::error::Result;
    use backdrop::frames::run_until_stopped;
    use backdrop::frames::IntervalFrames;
    use backdrop::frames::StopHandle;
    use backdrop::page::Page;
    use backdrop::quiz::Mark;
    use backdrop::quiz::Phase;
    use backdrop::quiz::Question;
    use backdrop::quiz::QuestionBank;
    use backdrop::quiz::QuizView;
    use backdrop::scroll::ProgressBar;
    use backdrop::scroll::ScrollMetrics;
    use backdrop::settings::Settings;
    use backdrop::surface::CommandBuffer;
    use log::error;
    use log::info;
    use log::warn;
    use rand::rngs::OsRng;

    /// The size of the pretend canvas the preview draws onto.
    const PREVIEW_SIZE: (f64, f64) = (800.0, 600.0);
    const PREVIEW_FRAMES: u64 = 60;
    const BAR_WIDTH: usize = 20;

    pub fn text_bar(percent: f64) -> String {
        let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            percent
        )
    }

    /// Reading progress. A terminal never scrolls, so this only reports once.
    struct LogBar;

    impl ProgressBar for LogBar {
        fn set_percent(&mut self, percent: f64) {
            info!("reading progress {}", text_bar(percent));
        }
    }

    struct TerminalQuiz {
        questions: Vec<Question>,
    }

    impl TerminalQuiz {
        fn question(&self, n: usize) -> Option<&Question> {
            n.checked_sub(1).and_then(|i| self.questions.get(i))
        }
    }

    impl ProgressBar for TerminalQuiz {
        fn set_percent(&mut self, percent: f64) {
            println!("{}", text_bar(percent));
        }
    }

    impl QuizView for TerminalQuiz {
        fn hide_questions(&mut self) {
            println!();
        }

        fn show_question(&mut self, question: usize) {
            let Some(q) = self.question(question) else {
                return;
            };
            println!("Q{}. {}", question, q.prompt);
            for (i, option) in q.options.iter().enumerate() {
                println!("  {}) {}", i + 1, option.label);
            }
        }

        // Answers are read one line at a time, so there's nothing to switch off.
        fn disable_options(&mut self, _question: usize) {}

        fn mark_option(&mut self, question: usize, option: usize, mark: Mark) {
            let label = self
                .question(question)
                .and_then(|q| q.options.get(option))
                .map(|o| o.label.as_str())
                .unwrap_or("?");
            match mark {
                Mark::Correct => println!("  \u{2713} {}", label),
                Mark::Wrong => println!("  \u{2717} {}", label),
            }
        }

        fn show_results(&mut self, score: usize, total: usize) {
            println!("You scored {} out of {}.", score, total);
        }
    }

    /// Runs the field for about a second against a recording surface and logs what got drawn.
    fn preview(page: &mut Page<OsRng>) {
        let stop = StopHandle::new();
        let handle = stop.clone();
        let mut surface = CommandBuffer::new();
        let (mut lines, mut dots, mut ran) = (0, 0, 0);

        let frames = futures::executor::block_on(run_until_stopped(
            IntervalFrames::sixty_hz(),
            &stop,
            |_| {
                surface.clear();
                page.on_frame(&mut surface);
                lines += surface.lines().count();
                dots += surface.circles().count();

                ran += 1;
                if ran == PREVIEW_FRAMES {
                    handle.stop();
                }
            },
        ));

        if frames > 0 {
            info!(
                "previewed {} frames: {:.1} links and {:.1} particles per frame",
                frames,
                lines as f64 / frames as f64,
                dots as f64 / frames as f64
            );
        }
    }

    /// Reads a 1-based option number, returning it 0-based. `None` means stdin is closed.
    pub fn read_choice(input: &mut impl BufRead) -> Result<Option<usize>> {
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<usize>() {
                Ok(n) if n > 0 => return Ok(Some(n - 1)),
                _ => println!("Pick an option by its number."),
            }
        }
    }

    fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let bank = match args.next() {
            Some(path) => QuestionBank::load(path)?,
            None => QuestionBank::default(),
        };

        let mut view = TerminalQuiz {
            questions: bank.questions.clone(),
        };
        let mut page = Page::new(settings, bank.questions, OsRng)?;

        page.on_load(PREVIEW_SIZE, &ScrollMetrics::default(), &mut LogBar, &mut view);
        preview(&mut page);

        let stdin = std::io::stdin();
        let mut input = stdin.lock();

        while let Phase::AwaitingAnswer(question) = page.quiz.phase() {
            if page.quiz.question(question).is_none() {
                warn!("question {} is missing, stopping here", question);
                break;
            }

            let Some(option) = read_choice(&mut input)? else {
                return Ok(());
            };

            match page.on_select(question, option, &mut view) {
                Some(delay) => {
                    std::thread::sleep(delay.min(Duration::from_secs(5)));
                    page.on_advance(&mut view);
                }
                None => println!("That isn't one of the options."),
            }
        }

        Ok(())
    }

    pub fn main() {
        pretty_env_logger::init();

        if let Err(e) = run() {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    terminal::main();
}
