//! The built-in representation modes.

pub mod collapsible_concepts;
pub mod color_coded;
pub mod knowledge_graph;
pub mod plain_text;
pub mod puzzle_based;
pub mod summary;
pub mod timeline;

use std::sync::Arc;

use prism_extraction::Toolkit;

use crate::error::Result;
use crate::mode::Representation;

pub use collapsible_concepts::CollapsibleConcepts;
pub use color_coded::ColorCoded;
pub use knowledge_graph::KnowledgeGraph;
pub use plain_text::PlainText;
pub use puzzle_based::PuzzleBased;
pub use summary::Summary;
pub use timeline::Timeline;

/// Build one instance of every built-in mode, in [`ModeId::ALL`] order.
///
/// [`ModeId::ALL`]: crate::ModeId::ALL
pub fn builtin_modes(toolkit: Arc<Toolkit>) -> Result<Vec<Box<dyn Representation>>> {
    Ok(vec![
        Box::new(PlainText::new()?),
        Box::new(ColorCoded::new()?),
        Box::new(CollapsibleConcepts::new()?),
        Box::new(KnowledgeGraph::new(Arc::clone(&toolkit))?),
        Box::new(Summary::new(Arc::clone(&toolkit))?),
        Box::new(Timeline::new(Arc::clone(&toolkit))?),
        Box::new(PuzzleBased::new()?),
    ])
}
