//! American Community Survey 2017 5-year tables.

pub mod acs;
pub mod topic;

pub use acs::{AcsPaths, AcsTract, compile_acs, load_topic};
pub use topic::{Topic, TopicRow, TopicTable};
