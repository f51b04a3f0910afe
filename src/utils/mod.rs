pub mod convert;
pub mod json_path;

pub use convert::{
    extract_nested_value, parse_datetime, parse_datetime_or_now, safe_bool, safe_float,
    safe_int, safe_str,
};
pub use json_path::PathMapper;
