//! Presentation Components
//!
//! Pure view models and text layouts shared by the CLI renderers and the
//! terminal UI. Nothing here performs I/O.

pub mod bar_chart;
pub mod funnel_chart;
pub mod metric_card;
pub mod status;
pub mod table;

pub use bar_chart::{bar_heights, text_bar, BarChart, BarSeries};
pub use funnel_chart::{drop_off_lines, funnel_lines, funnel_rows, stage_width, FunnelRow};
pub use metric_card::MetricCard;
pub use status::{loading_line, spinner, ErrorPanel, RETRY_LABEL};
pub use table::TextTable;
