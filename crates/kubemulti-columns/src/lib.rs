//! Tabular projection of schema-less Kubernetes records
//!
//! [`ColumnRegistry`] decides which columns a resource type prints,
//! [`ExtractorTable`] turns one record and one column into a display
//! string, and [`Projector`] ties both together into rows.

pub mod extract;
pub mod format;
pub mod registry;

pub use extract::{
    ExtractContext, ExtractFn, ExtractorTable, Projector, default_projector, extract, extract_at,
};
pub use format::{
    NodeStatus, abbreviate_access_mode, format_label_map, format_labels, human_duration,
    node_role, node_status,
};
pub use registry::{ColumnRegistry, columns_for, default_registry};

pub use kubemulti_types::{ColumnDefinition, Record};
