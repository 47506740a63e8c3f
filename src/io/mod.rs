//! File I/O for compliance requests and results.

pub mod json;

pub use json::{
    read_config, read_json, read_parameters, read_request, request_from_str, to_json_string,
    write_json,
};
