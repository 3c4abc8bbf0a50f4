pub mod geo;
pub mod jwt;

pub use geo::GeoPoint;
pub use jwt::encode_access_token;
