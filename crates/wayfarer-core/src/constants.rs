/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

/// Path component under a collection's API route that selects slug lookup.
pub const SLUG_ROUTE_COMPONENT: &str = "slug";

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

/// Collection monitored when no `collections` are configured.
pub const DEFAULT_COLLECTION: &str = "hotels";

/// Slug used when neither a record's name nor its id normalize to anything.
pub const DEFAULT_FALLBACK_SLUG: &str = "hotel";

/// Length of backend-generated record identifiers.
pub const GENERATED_ID_LEN: usize = 20;

pub const DEFAULT_MAX_SUFFIX_ATTEMPTS: u32 = 50;

/// `s-maxage` for slug lookups, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 120;
/// `stale-while-revalidate` for slug lookups, in seconds.
pub const DEFAULT_CACHE_SWR: u32 = 300;

pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2000;
