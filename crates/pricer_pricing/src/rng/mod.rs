//! Random number generation.
//!
//! - [`LaneStream`]: one keyed generator per device lane
//! - [`StreamPool`]: the device buffer of lane streams, seeded by a compute pass
//! - [`BoxMuller`]: polar-form normal generator used by the serial reference
//!
//! Lane streams and the reference generator are seeded independently, so the
//! parallel and serial estimates are statistically independent.

mod box_muller;
mod pool;
mod stream;

pub use box_muller::BoxMuller;
pub use pool::StreamPool;
pub use stream::LaneStream;
