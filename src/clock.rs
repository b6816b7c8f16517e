pub(crate) mod playback;
pub(crate) mod source;
