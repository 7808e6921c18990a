pub mod code_writer;
pub mod emitters;
pub mod generator;

pub use code_writer::CodeWriter;
pub use emitters::render_element;
pub use generator::RubyGenerator;
