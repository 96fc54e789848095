/// Cache statistics shown on the admin page and by `waypost geo stats`.
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    pub cities_loaded: bool,
    pub cities_count: usize,
    pub index_built: bool,
    pub admin1_count: usize,
    pub slugs_count: usize,
    pub venues_count: usize,
    pub hidden_count: usize,
}
