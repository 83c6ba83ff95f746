//! Testing utilities and harness for Mosaic

pub mod clock;
pub mod fake_sensor;
pub mod fixtures;
pub mod test_rule;

pub use clock::ManualClock;
pub use fake_sensor::FakeViewportSensor;
pub use test_rule::*;

pub mod prelude {
    pub use crate::clock::ManualClock;
    pub use crate::fake_sensor::FakeViewportSensor;
    pub use crate::fixtures::*;
    pub use crate::test_rule::MasonryTestRule;
}
