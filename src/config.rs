use url::Url;
use validator::Validate;

/// Every setting is read from an environment variable prefixed with `GAMIFICATION_`,
/// e.g. `db_host` comes from `GAMIFICATION_DB_HOST`.
#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    #[validate(length(min = 1))]
    db_host: String,
    db_port: Option<u16>,
    #[validate(length(min = 1))]
    db_user: String,
    #[serde(default)]
    db_password: String,
    #[validate(length(min = 1))]
    db_name: String,
    /// maximum amount of pooled database connections
    #[serde(default = "default_pool_size")]
    #[validate(range(min = 1, max = 100))]
    db_pool_size: u32,
    /// seconds to wait for a free pooled connection
    #[serde(default = "default_connection_timeout")]
    #[validate(range(min = 1))]
    db_connection_timeout: u64,
    api_host: Option<String>,
    api_port: Option<u16>,
    questions_path: Option<String>,
}

/// Settings that platforms hand out under their conventional name, e.g. `PORT`
#[derive(Deserialize, Debug)]
struct Platform {
    port: Option<u16>,
}

fn default_pool_size() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    5
}

lazy_static! {
    static ref CONFIG: Config = match envy::prefixed("GAMIFICATION_").from_env::<Config>() {
        Ok(config) => {
            match config.validate() {
                Ok(()) => config,
                Err(e) => panic!("invalid environment variable: {}", e),
            }
        }
        Err(error) => panic!("Missing or incorrect environment variable: {}", error),
    };
    static ref PLATFORM: Platform = match envy::from_env::<Platform>() {
        Ok(platform) => platform,
        Err(error) => panic!("Incorrect environment variable: {}", error),
    };
}

impl Config {
    /// Forces the environment to be read, so a bad setup fails at boot
    /// instead of on the first request.
    pub fn init() {
        lazy_static::initialize(&CONFIG);
        lazy_static::initialize(&PLATFORM);
    }

    pub fn database_url() -> Result<String, url::ParseError> {
        build_database_url(
            &CONFIG.db_host,
            CONFIG.db_port.unwrap_or(5432),
            &CONFIG.db_user,
            &CONFIG.db_password,
            &CONFIG.db_name,
        )
    }

    pub fn db_pool_size() -> u32 {
        CONFIG.db_pool_size
    }

    pub fn db_connection_timeout() -> u64 {
        CONFIG.db_connection_timeout
    }

    pub fn api_host() -> &'static str {
        match &CONFIG.api_host {
            Some(host) => host.as_ref(),
            None => "0.0.0.0",
        }
    }

    /// `GAMIFICATION_API_PORT`, falling back to `PORT` and then 3000
    pub fn api_port() -> u16 {
        listen_port(CONFIG.api_port, PLATFORM.port)
    }

    pub fn questions_path() -> &'static str {
        match &CONFIG.questions_path {
            Some(path) => path.as_ref(),
            None => "data/preguntas.json",
        }
    }
}

fn listen_port(configured: Option<u16>, platform: Option<u16>) -> u16 {
    configured.or(platform).unwrap_or(3000)
}

/// Assembles a postgres connection url, percent-encoding the credentials
fn build_database_url(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    name: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(&format!("postgres://{}", host))?;

    // these only fail for urls that cannot have a host, which postgres:// always has
    let _ = url.set_port(Some(port));
    let _ = url.set_username(user);
    if !password.is_empty() {
        let _ = url.set_password(Some(password));
    }
    url.set_path(&format!("/{}", name));

    Ok(url.to_string())
}
