pub(crate) mod host;
pub(crate) mod preview;
pub(crate) mod telemetry;
pub(crate) mod transport;
