mod model_record;

pub use model_record::{ModelRecord, NewModelRecord};
