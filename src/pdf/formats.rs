//! Output format implementations for typed trees
//!
//! - surface: canonical surface text
//! - treeviz: one node per line with box connectors
//! - json / yaml: serialized [AstSnapshot](crate::pdf::ast::AstSnapshot)

pub mod registry;
pub mod structured;
pub mod surface;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use structured::{JsonFormatter, YamlFormatter};
pub use surface::SurfaceFormatter;
pub use treeviz::{to_treeviz_str, TreevizFormatter};
