//! Core domain types, input normalization and graph layout for turning a
//! JSON slide outline into a visual deck.

pub mod error;
pub mod graph;
pub mod normalize;
pub mod types;

pub use error::{Error, Result};
pub use graph::{Graph, Layout, LayoutError, SpringLayout};
pub use types::{BarSeries, Deck, SlideBody, SlideDescriptor, SlideKind, TimelineEvent};
