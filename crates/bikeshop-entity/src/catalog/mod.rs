//! Workshop catalog: brands, models, services and customer bicycles.

pub mod bicycle;
pub mod brand;
pub mod service;

pub use bicycle::{Bicycle, BicycleDetails, CreateBicycle};
pub use brand::{BikeModel, Brand};
pub use service::{ServiceInput, ServiceOffering};
