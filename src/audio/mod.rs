//! Audio files, resampling and playback

pub mod io;
pub mod playback;
pub mod resample;

pub use io::{load_mono, read_wav, write_wav};
pub use playback::{create_player, CommandPlayer, NullPlayer, Player};
