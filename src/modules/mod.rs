pub mod city;

mod router;
pub use router::get_router;
