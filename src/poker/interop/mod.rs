pub mod bind_info_ffi;
pub mod chunk;
pub mod scalar;
pub mod string;
