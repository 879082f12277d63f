//! Output formats
//!
//! - `text` - movement model back to the line grammar
//! - `meta` - metadata entry text, both directions
//! - `treeviz` - box-drawing view of a parse tree

pub mod meta;
pub mod text;
pub mod treeviz;

pub use meta::{parse_meta, serialize_meta};
pub use text::{measure_line, serialize_movement};
pub use treeviz::to_treeviz_str;
