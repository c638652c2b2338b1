pub mod java_unit;
