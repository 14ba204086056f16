pub mod jdoodle_client;
