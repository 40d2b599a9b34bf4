mod clipboard;

pub use clipboard::copy_text;
