/// Runtime configuration, read once at startup and passed around explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// External base URL, used when building magic sign-in links.
    pub public_base_url: String,
    /// When set, OGP metadata is fetched through this trusted endpoint
    /// instead of the public proxy chain.
    pub ogp_fetch_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            database_url: dotenv::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:linkrooms.db?mode=rwc".to_owned()),
            bind_addr: dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned()),
            public_base_url: dotenv::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_owned()),
            ogp_fetch_endpoint: dotenv::var("OGP_FETCH_ENDPOINT").ok(),
        }
    }
}
