//! An animated particle background, a reading progress bar and a small quiz, for a single page.
//!
//! The pieces are host-agnostic: drawing goes through [`surface::Surface`], the quiz through
//! [`quiz::QuizView`] and the bars through [`scroll::ProgressBar`]. On `wasm32` the [`wasm`] module
//! binds them to the DOM; elsewhere they can be driven headlessly.

pub mod error;
pub mod field;
pub mod frames;
pub mod page;
pub mod particle;
pub mod quiz;
pub mod scroll;
pub mod settings;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::Error;
pub use field::Field;
pub use page::Page;
pub use quiz::QuizSession;
pub use settings::Settings;
