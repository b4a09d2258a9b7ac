pub mod junit_path;
pub mod model;
pub mod parser;
pub mod summary;

pub use model::{TestCase, TestProblem, TestStatus, TestSuite};
pub use parser::{parse_file, JunitParseError, JunitParser};
