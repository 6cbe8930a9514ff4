pub mod driver_profile;
pub mod order_snapshot;
