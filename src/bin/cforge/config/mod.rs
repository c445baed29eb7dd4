mod field;

pub use field::{build_field_config, describe_field_config};
