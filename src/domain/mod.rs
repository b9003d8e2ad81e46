pub mod parcel;
pub mod types;
