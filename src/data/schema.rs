//! Column names of the listings file.

pub const PROPERTY_TYPE: &str = "property_type";
pub const PLACES: &str = "places";
pub const CURRENCY: &str = "currency";
pub const PRICE: &str = "price";
pub const PRICE_PER_M2: &str = "price_per_m2";
pub const SURFACE_TOTAL: &str = "surface_total_in_m2";
pub const PRICE_LOCAL: &str = "price_aprox_local_currency";
pub const PRICE_USD: &str = "price_aprox_usd";
pub const PRICE_USD_PER_M2: &str = "price_usd_per_m2";
pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const LAT_LON: &str = "lat-lon";

/// Every column the input file must provide.
pub const INPUT_COLUMNS: &[&str] = &[
    PROPERTY_TYPE,
    PLACES,
    CURRENCY,
    PRICE,
    PRICE_PER_M2,
    SURFACE_TOTAL,
    PRICE_LOCAL,
    PRICE_USD,
    PRICE_USD_PER_M2,
    LAT,
    LON,
    LAT_LON,
];

/// Geocoordinates followed by the USD-denominated duplicates.
pub const PRUNED_COLUMNS: &[&str] = &[LAT, LON, LAT_LON, PRICE_USD, PRICE_USD_PER_M2];

/// Outlier filter order. Swapping the entries can change the result.
pub const OUTLIER_COLUMNS: &[&str] = &[PRICE_PER_M2, SURFACE_TOTAL];

pub const LOCAL_CURRENCY: &str = "MXN";
