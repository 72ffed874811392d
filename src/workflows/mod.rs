pub mod linker;
pub mod matchers;
pub mod organizer;
pub mod scanner;
