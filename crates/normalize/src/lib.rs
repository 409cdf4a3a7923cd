pub mod color;
pub mod error_flag;
pub mod logs;
pub mod resolve;
pub mod row;
pub mod shape;
pub mod trace;
pub mod tree;

pub use color::{SERVICE_PALETTE, generate_color_map};
pub use error_flag::{hit_has_error, is_span_error};
pub use logs::normalize_log_response;
pub use shape::ResponseShape;
pub use trace::normalize_trace_response;
pub use tree::{SpanNode, WaterfallRow, build_span_tree, waterfall_rows};
