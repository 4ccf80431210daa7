
mod store_tests;
mod transport_tests;
