pub mod form_reader;
