pub mod answer;
pub mod error;
pub mod focus;
pub mod policy;
pub mod selection;

pub use answer::{Analysis, extract_answer};
pub use error::GlimpseError;
pub use focus::Foreground;
pub use policy::{Presentation, choose_presentation};
pub use selection::{SelectionInput, SelectionSession, Stage, Transition};
