pub mod observation;
pub mod series;
pub mod tally;
pub mod variable;

pub use observation::{ObservationRecord, ObservationRecordBuilder};
pub use series::{present_gt, SeriesTable};
pub use tally::{CheckKind, TallyRow, TallyTable};
pub use variable::Variable;
