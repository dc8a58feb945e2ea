pub mod activity;
pub mod exec;
pub mod output;
pub mod scatter;

pub use activity::{bin_series, weekly_activity, ActivityOptions};
pub use exec::{exec_activity, exec_scatter};
pub use output::{output_activity, output_json, output_scatter};
pub use scatter::{auto_title, scatter_chart, scatter_points, Column};
