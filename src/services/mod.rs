pub mod compile_service;
