pub mod caching;
pub mod exchangerate_api;
pub mod util;
