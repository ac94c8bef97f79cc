pub mod clock;
pub mod extractor;
pub mod test_utils;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use extractor::{parse_path_id, ValidatedJson, ValidatedQuery};
