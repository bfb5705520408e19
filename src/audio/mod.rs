pub mod inspect;

pub use inspect::{inspect_mp3, inspect_mp3_async, Mp3Info};
