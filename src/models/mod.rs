pub mod stock;
pub mod currency;
pub mod joined;
