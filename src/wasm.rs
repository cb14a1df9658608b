use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::time::Duration;

use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;
use rand::rngs::OsRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::CanvasRenderingContext2d;
use web_sys::Document;
use web_sys::Element;
use web_sys::HtmlButtonElement;
use web_sys::HtmlCanvasElement;
use web_sys::HtmlElement;
use web_sys::Window;

use crate::error::Error;
use crate::error::Result;
use crate::frames::run_until_stopped;
use crate::frames::AnimationFrames;
use crate::frames::StopHandle;
use crate::page::Page;
use crate::quiz::AnswerOption;
use crate::quiz::Mark;
use crate::quiz::Question;
use crate::quiz::QuizView;
use crate::scroll::ProgressBar;
use crate::scroll::ScrollMetrics;
use crate::settings::Settings;
use crate::surface::css;
use crate::surface::Color;
use crate::surface::Surface;

type SharedPage = Rc<RefCell<Page<OsRng>>>;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style(&JsValue::from_str(&css(color)));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ctx.set_stroke_style(&JsValue::from_str(&css(color)));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        // This only fails for negative radii, which just means there's nothing to draw.
        if self.ctx.arc(x, y, radius, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }
}

/// A bar whose CSS width tracks a percentage. Does nothing if the element is missing.
pub struct ElementBar(Option<HtmlElement>);

impl ElementBar {
    fn find(document: &Document, id: &str) -> Self {
        Self(
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
        )
    }
}

impl ProgressBar for ElementBar {
    fn set_percent(&mut self, percent: f64) {
        if let Some(el) = &self.0 {
            let _ = el.style().set_property("width", &format!("{}%", percent));
        }
    }
}

/// The quiz markup: panels `#q1`..`#qN` of class `question-block`, each holding `.option-btn`
/// buttons, plus a progress bar, the quiz container and a results screen.
pub struct DomQuiz {
    document: Document,
    progress: ElementBar,
}

impl DomQuiz {
    fn new(document: Document) -> Self {
        let progress = ElementBar::find(&document, "quiz-progress-bar");
        Self { document, progress }
    }

    fn elements(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn buttons(&self, question: usize) -> Vec<HtmlButtonElement> {
        self.elements(&format!("#q{} .option-btn", question))
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlButtonElement>().ok())
            .collect()
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Reads the questions out of the markup, stopping at the first missing panel.
    ///
    /// An option is correct if its button has `data-correct="true"`.
    fn read_questions(&self, total: usize) -> Vec<Question> {
        let mut questions = Vec::with_capacity(total);
        for n in 1..=total {
            let Some(block) = self.document.get_element_by_id(&format!("q{}", n)) else {
                break;
            };

            let prompt = block
                .query_selector("h3, .question-text")
                .ok()
                .flatten()
                .and_then(|el| el.text_content())
                .unwrap_or_default();

            let options = self
                .buttons(n)
                .iter()
                .map(|button| AnswerOption {
                    label: button.text_content().unwrap_or_default().trim().to_owned(),
                    correct: button.get_attribute("data-correct").as_deref() == Some("true"),
                })
                .collect();

            questions.push(Question {
                prompt: prompt.trim().to_owned(),
                options,
            });
        }
        questions
    }
}

impl ProgressBar for DomQuiz {
    fn set_percent(&mut self, percent: f64) {
        self.progress.set_percent(percent);
    }
}

impl QuizView for DomQuiz {
    fn hide_questions(&mut self) {
        for block in self.elements(".question-block") {
            let _ = block.class_list().add_1("hidden");
        }
    }

    fn show_question(&mut self, question: usize) {
        self.set_hidden(&format!("q{}", question), false);
    }

    fn disable_options(&mut self, question: usize) {
        for button in self.buttons(question) {
            button.set_disabled(true);
        }
    }

    fn mark_option(&mut self, question: usize, option: usize, mark: Mark) {
        if let Some(button) = self.buttons(question).get(option) {
            let class = match mark {
                Mark::Correct => "correct",
                Mark::Wrong => "wrong",
            };
            let _ = button.class_list().add_1(class);
        }
    }

    fn show_results(&mut self, score: usize, _total: usize) {
        self.set_hidden("quiz-container", true);
        self.set_hidden("result-screen", false);
        if let Some(el) = self.document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
    }
}

fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64());
    let height = window.inner_height().ok().and_then(|v| v.as_f64());
    (width.unwrap_or(0.0), height.unwrap_or(0.0))
}

fn scroll_metrics(window: &Window, document: &Document) -> ScrollMetrics {
    let (scroll_height, client_height) = document
        .document_element()
        .map(|el| (el.scroll_height() as f64, el.client_height() as f64))
        .unwrap_or_default();

    ScrollMetrics {
        scroll_height,
        client_height,
        offset: window.scroll_y().unwrap_or(0.0),
    }
}

fn size_canvas(canvas: &HtmlCanvasElement, (width, height): (f64, f64)) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut() + 'static,
) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // The page lives as long as the listener does, so there's nothing to ever free this.
    closure.forget();
    Ok(())
}

/// `setTimeout` takes a signed 32-bit millisecond count.
fn timeout_ms(delay: Duration) -> i32 {
    delay.as_millis().min(i32::MAX as u128) as i32
}

/// Waits out the post-answer delay, then moves the quiz on.
fn schedule_advance(
    window: &Window,
    delay: Duration,
    page: SharedPage,
    view: Rc<RefCell<DomQuiz>>,
) {
    let callback = Closure::once_into_js(move || {
        page.borrow_mut().on_advance(&mut *view.borrow_mut());
    });
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            timeout_ms(delay),
        )
    {
        log::warn!("couldn't schedule the next question: {:?}", e);
    }
}

fn start(window: Window) -> Result<()> {
    let document = window
        .document()
        .ok_or_else(|| Error::Js("no document".into()))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("bg-canvas")
        .ok_or_else(|| Error::Js("no #bg-canvas element".into()))?
        .dyn_into()
        .map_err(|_| Error::Js("#bg-canvas isn't a canvas".into()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| Error::Js("no 2d context".into()))?
        .dyn_into()
        .map_err(|_| Error::Js("unexpected context type".into()))?;

    let settings = Settings::default();

    let view = Rc::new(RefCell::new(DomQuiz::new(document.clone())));
    let questions = view.borrow().read_questions(settings.total_questions);
    let scroll_bar = Rc::new(RefCell::new(ElementBar::find(&document, "scroll-progress")));
    let page: SharedPage = Rc::new(RefCell::new(Page::new(settings, questions, OsRng)?));

    let size = viewport_size(&window);
    size_canvas(&canvas, size);
    page.borrow_mut().on_load(
        size,
        &scroll_metrics(&window, &document),
        &mut *scroll_bar.borrow_mut(),
        &mut *view.borrow_mut(),
    );

    {
        let page = page.clone();
        let window2 = window.clone();
        listen(&window, "resize", move || {
            let size = viewport_size(&window2);
            size_canvas(&canvas, size);
            page.borrow_mut().on_resize(size);
        })?;
    }

    {
        let page = page.clone();
        let window2 = window.clone();
        let document = document.clone();
        listen(&window, "scroll", move || {
            let metrics = scroll_metrics(&window2, &document);
            page.borrow_mut()
                .on_scroll(&metrics, &mut *scroll_bar.borrow_mut());
        })?;
    }

    let total = page.borrow().quiz.total();
    for question in 1..=total {
        let buttons = view.borrow().buttons(question);
        for (option, button) in buttons.iter().enumerate() {
            let page = page.clone();
            let view = view.clone();
            let window2 = window.clone();
            listen(button, "click", move || {
                let delay = page
                    .borrow_mut()
                    .on_select(question, option, &mut *view.borrow_mut());
                if let Some(delay) = delay {
                    schedule_advance(&window2, delay, page.clone(), view.clone());
                }
            })?;
        }
    }

    let mut surface = CanvasSurface { ctx };
    let frames = AnimationFrames::new(window);
    wasm_bindgen_futures::spawn_local(async move {
        // Nothing ever stops the background; it runs for as long as the page is open.
        let stop = StopHandle::new();
        run_until_stopped(frames, &stop, |_timestamp| {
            page.borrow_mut().on_frame(&mut surface);
        })
        .await;
    });

    Ok(())
}

#[wasm_bindgen]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "complete" {
        start(window)?;
    } else {
        let window2 = window.clone();
        let onload = Closure::once_into_js(move || {
            if let Err(e) = start(window2) {
                log::error!("{}", e);
            }
        });
        window.add_event_listener_with_callback("load", onload.unchecked_ref())?;
    }

    Ok(())
}
